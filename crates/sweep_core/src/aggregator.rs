use std::cmp::Ordering;
use std::collections::HashSet;

use crate::address::sort_for_export;
use crate::candidate::normalize_address;
use crate::layout::DisplayOrder;
use crate::result::CheckResult;

/// Append-only collection of successful checks, unique by normalized address.
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    results: Vec<CheckResult>,
    seen: HashSet<String>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append in input order, skipping addresses already present.
    /// Returns how many results were added.
    pub fn add(&mut self, results: impl IntoIterator<Item = CheckResult>) -> usize {
        let before = self.results.len();
        for result in results {
            if self.seen.insert(normalize_address(&result.address)) {
                self.results.push(result);
            }
        }
        self.results.len() - before
    }

    pub fn contains(&self, address: &str) -> bool {
        self.seen.contains(&normalize_address(address))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results in arrival order.
    pub fn snapshot(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn sorted_for_export(&self) -> Vec<String> {
        sort_for_export(self.results.iter().map(|r| r.address.as_str()))
    }
}

/// Order results for display.
///
/// Sorting is stable and keys never change once a result exists, so the
/// relative order of already-rendered entries survives every re-render.
pub fn display_order(results: &[CheckResult], order: DisplayOrder) -> Vec<&CheckResult> {
    let mut ordered: Vec<&CheckResult> = results.iter().collect();
    if order == DisplayOrder::RiskAscending {
        ordered.sort_by(|a, b| compare_risk(a.risk_score(), b.risk_score()));
    }
    ordered
}

fn compare_risk(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
