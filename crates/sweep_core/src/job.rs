use std::collections::HashSet;

use crate::aggregator::ResultAggregator;
use crate::candidate::{Candidate, CandidateSet};
use crate::paginator::RenderInput;
use crate::result::CheckResult;
use crate::status::JobStatus;

/// Counters shared with observers while a job runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobProgress {
    pub checked: usize,
    pub total: usize,
    pub successes: usize,
}

/// The mutable state of one run, owned by exactly one controller.
///
/// `checked` only grows, and only with addresses taken from `candidates`.
#[derive(Debug, Clone)]
pub struct JobState {
    title: String,
    candidates: CandidateSet,
    known: HashSet<String>,
    source_count: usize,
    checked: HashSet<String>,
    cursor: usize,
    results: ResultAggregator,
}

impl JobState {
    pub fn new(title: impl Into<String>, candidates: CandidateSet, source_count: usize) -> Self {
        let known = candidates.iter().map(|c| c.address().to_string()).collect();
        Self {
            title: title.into(),
            candidates,
            known,
            source_count,
            checked: HashSet::new(),
            cursor: 0,
            results: ResultAggregator::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn total(&self) -> usize {
        self.candidates.len()
    }

    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    pub fn is_checked(&self, address: &str) -> bool {
        self.checked.contains(address)
    }

    pub fn is_exhausted(&self) -> bool {
        self.checked.len() >= self.candidates.len()
    }

    pub fn results(&self) -> &ResultAggregator {
        &self.results
    }

    pub fn progress(&self) -> JobProgress {
        JobProgress {
            checked: self.checked_count(),
            total: self.total(),
            successes: self.results.len(),
        }
    }

    /// Up to `batch_size` unchecked candidates, in candidate order.
    pub fn next_batch(&mut self, batch_size: usize) -> Vec<Candidate> {
        let all = self.candidates.as_slice();
        while self.cursor < all.len() && self.checked.contains(all[self.cursor].address()) {
            self.cursor += 1;
        }
        all[self.cursor..]
            .iter()
            .filter(|c| !self.checked.contains(c.address()))
            .take(batch_size.max(1))
            .cloned()
            .collect()
    }

    /// Mark the whole batch as checked, then merge its successes.
    ///
    /// `outcomes` holds one slot per batch candidate; failures are `None`.
    /// Addresses that are not candidates of this job are never marked checked.
    pub fn apply_batch(&mut self, batch: &[Candidate], outcomes: Vec<Option<CheckResult>>) -> usize {
        for candidate in batch {
            if self.known.contains(candidate.address()) {
                self.checked.insert(candidate.address().to_string());
            }
        }
        self.results.add(outcomes.into_iter().flatten())
    }

    pub fn render_input(&self, status: JobStatus) -> RenderInput<'_> {
        RenderInput {
            title: &self.title,
            successes: self.results.snapshot(),
            checked: self.checked_count(),
            total: self.total(),
            status,
            source_count: self.source_count,
        }
    }
}
