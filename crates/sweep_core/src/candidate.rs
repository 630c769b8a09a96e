use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Which input source a candidate was derived from.
///
/// The index is 0-based and refers to the position of the domain or range in
/// the user's input list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    #[default]
    None,
    Domain(usize),
    Range(usize),
}

impl Provenance {
    pub fn index(self) -> Option<usize> {
        match self {
            Provenance::None => None,
            Provenance::Domain(idx) | Provenance::Range(idx) => Some(idx),
        }
    }
}

/// One address submitted for checking. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    address: String,
    provenance: Provenance,
}

impl Candidate {
    pub fn new(address: &str, provenance: Provenance) -> Self {
        Self {
            address: normalize_address(address),
            provenance,
        }
    }

    pub fn plain(address: &str) -> Self {
        Self::new(address, Provenance::None)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }
}

/// Canonical form used for deduplication: trimmed and lowercased.
pub fn normalize_address(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Ordered, deduplicated input list for one job.
///
/// Candidates sharing a normalized address collapse to the first occurrence,
/// which keeps that occurrence's provenance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
    duplicates_dropped: usize,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_candidates(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        let mut set = Self::new();
        set.extend(candidates);
        set
    }

    pub fn from_addresses<S: AsRef<str>>(addresses: impl IntoIterator<Item = S>) -> Self {
        Self::from_candidates(
            addresses
                .into_iter()
                .map(|address| Candidate::plain(address.as_ref())),
        )
    }

    pub fn extend(&mut self, candidates: impl IntoIterator<Item = Candidate>) {
        let mut seen: HashSet<String> = self
            .candidates
            .iter()
            .map(|c| c.address.clone())
            .collect();
        for candidate in candidates {
            if candidate.address.is_empty() {
                continue;
            }
            if seen.insert(candidate.address.clone()) {
                self.candidates.push(candidate);
            } else {
                self.duplicates_dropped += 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }
}
