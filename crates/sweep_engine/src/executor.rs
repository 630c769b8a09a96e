use std::sync::Arc;

use futures_util::future::join_all;
use sweep_core::{Candidate, CheckResult};
use sweep_logging::sweep_debug;

use crate::Oracle;

/// Checks one batch concurrently and waits for the slowest check.
#[derive(Clone)]
pub struct BatchExecutor {
    oracle: Arc<dyn Oracle>,
}

impl BatchExecutor {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    /// One slot per candidate, `None` where the check failed. Never retries.
    pub async fn check_batch(&self, batch: &[Candidate]) -> Vec<Option<CheckResult>> {
        let checks = batch.iter().map(|candidate| async move {
            match self.oracle.check(candidate.address()).await {
                Ok(verdict) => Some(CheckResult::new(
                    verdict.address,
                    verdict.metadata,
                    candidate.provenance(),
                )),
                Err(err) => {
                    sweep_debug!("check of {} failed: {err}", candidate.address());
                    None
                }
            }
        });
        join_all(checks).await
    }
}
