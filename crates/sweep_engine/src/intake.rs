//! Turns raw user input into a titled candidate set.

use sweep_core::{
    expand_range, source_listing_title, validate_domain, Candidate, CandidateSet, Provenance,
};
use sweep_logging::sweep_warn;

use crate::controller::JobSpec;
use crate::source::{BulkSource, SourceRef};
use crate::{IntakeError, Resolver, TargetId};

/// Candidates ready to be checked, plus what was dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Intake {
    pub title: String,
    pub candidates: CandidateSet,
    pub source_count: usize,
    /// Inputs that produced nothing, each with the reason.
    pub skipped: Vec<String>,
}

impl Intake {
    pub fn into_spec(self, origin: TargetId) -> JobSpec {
        JobSpec::new(self.title, self.candidates, self.source_count, origin)
    }

    pub fn from_addresses<S: AsRef<str>>(
        addresses: impl IntoIterator<Item = S>,
    ) -> Result<Self, IntakeError> {
        let candidates = CandidateSet::from_addresses(
            addresses
                .into_iter()
                .filter(|address| !address.as_ref().trim().is_empty()),
        );
        Self::finish("Proxy IP Results".to_string(), candidates, 1, Vec::new())
    }

    /// Each range is expanded; unparseable or oversized ranges are skipped.
    pub fn from_ranges<S: AsRef<str>>(ranges: &[S]) -> Result<Self, IntakeError> {
        let tagged = ranges.len() > 1;
        let mut candidates = CandidateSet::new();
        let mut listed = Vec::new();
        let mut skipped = Vec::new();

        for (index, range) in ranges.iter().enumerate() {
            let range = range.as_ref().trim();
            match expand_range(range) {
                Ok(addresses) => {
                    let provenance = if tagged {
                        Provenance::Range(index)
                    } else {
                        Provenance::None
                    };
                    candidates.extend(
                        addresses
                            .iter()
                            .map(|address| Candidate::new(address, provenance)),
                    );
                    listed.push((index, range.to_string()));
                }
                Err(err) => {
                    sweep_warn!("range {range} skipped: {err}");
                    skipped.push(format!("{range}: {err}"));
                }
            }
        }

        let title = if tagged {
            source_listing_title("Results for IP Ranges:", &listed)
        } else {
            "IP Range Results".to_string()
        };
        Self::finish(title, candidates, ranges.len(), skipped)
    }

    /// Resolve every valid domain; domains that fail contribute nothing.
    pub async fn from_domains<S: AsRef<str>>(
        resolver: &dyn Resolver,
        domains: &[S],
    ) -> Result<Self, IntakeError> {
        let tagged = domains.len() > 1;
        let mut candidates = CandidateSet::new();
        let mut listed = Vec::new();
        let mut skipped = Vec::new();

        for (index, domain) in domains.iter().enumerate() {
            let domain = domain.as_ref().trim();
            if let Err(err) = validate_domain(domain) {
                skipped.push(err.to_string());
                continue;
            }
            match resolver.resolve(domain).await {
                Ok(addresses) if !addresses.is_empty() => {
                    let provenance = if tagged {
                        Provenance::Domain(index)
                    } else {
                        Provenance::None
                    };
                    candidates.extend(
                        addresses
                            .iter()
                            .map(|address| Candidate::new(address, provenance)),
                    );
                    listed.push((index, domain.to_string()));
                }
                Ok(_) => skipped.push(format!("{domain}: no addresses")),
                Err(err) => {
                    sweep_warn!("resolving {domain} failed: {err}");
                    skipped.push(format!("{domain}: {err}"));
                }
            }
        }

        let title = match (tagged, listed.first()) {
            (false, Some((_, domain))) => format!("Results for: `{domain}`"),
            _ => source_listing_title("Results for Domains:", &listed),
        };
        Self::finish(title, candidates, domains.len(), skipped)
    }

    pub async fn from_source(source: &BulkSource, reference: &SourceRef) -> Result<Self, IntakeError> {
        let title = match reference {
            SourceRef::Country(_) => format!("[{}] Test Results", reference.display_name()),
            SourceRef::Url(_) => "File Test Results".to_string(),
        };
        match source.fetch(reference).await {
            Ok(addresses) => Self::finish(title, CandidateSet::from_addresses(addresses), 1, Vec::new()),
            Err(err) => {
                sweep_warn!("source {} unavailable: {err}", reference.display_name());
                Err(IntakeError::NoCandidates)
            }
        }
    }

    fn finish(
        title: String,
        candidates: CandidateSet,
        source_count: usize,
        skipped: Vec<String>,
    ) -> Result<Self, IntakeError> {
        if candidates.is_empty() {
            return Err(IntakeError::NoCandidates);
        }
        Ok(Self {
            title,
            candidates,
            source_count,
            skipped,
        })
    }
}
