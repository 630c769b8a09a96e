use std::sync::Arc;

use sweep_core::{Controls, JobId, PageCache, PageChange};
use sweep_logging::{sweep_debug, sweep_warn};

use crate::messenger::ensure_within_limit;
use crate::{Affordance, MessageHandle, Messenger, MessengerError, TargetId};

/// The pages of one job as they exist on the messaging surface.
pub struct PageBook {
    job: JobId,
    target: TargetId,
    messenger: Arc<dyn Messenger>,
    cache: PageCache<MessageHandle>,
}

impl PageBook {
    pub fn new(job: JobId, target: TargetId, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            job,
            target,
            messenger,
            cache: PageCache::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn texts(&self) -> Vec<String> {
        self.cache.last_texts()
    }

    /// Bring the surface in line with `rendered`. Only changed pages are
    /// touched; page 0 carries `controls`.
    ///
    /// Returns false when a new page could not be created, in which case later
    /// pages are left for the next sync.
    pub async fn sync(&mut self, rendered: &[String], controls: Controls) -> bool {
        let limit = self.messenger.text_limit();
        for change in self.cache.plan(rendered, controls) {
            match change {
                PageChange::Create {
                    index,
                    text,
                    controls,
                } => {
                    if let Err(err) = ensure_within_limit(&text, limit) {
                        sweep_warn!("page {index} of job {} not sent: {err}", self.job);
                        return false;
                    }
                    let affordance = Affordance {
                        job: self.job,
                        controls,
                    };
                    match self.messenger.send(&self.target, &text, affordance).await {
                        Ok(handle) => {
                            self.cache.record_created(handle, &text, controls);
                        }
                        Err(err) => {
                            sweep_warn!("creating page {index} of job {} failed: {err}", self.job);
                            return false;
                        }
                    }
                }
                PageChange::Edit {
                    index,
                    text,
                    controls,
                } => {
                    let Some(handle) = self.cache.handle(index).cloned() else {
                        continue;
                    };
                    if let Err(err) = ensure_within_limit(&text, limit) {
                        sweep_warn!("page {index} of job {} not updated: {err}", self.job);
                        continue;
                    }
                    let affordance = Affordance {
                        job: self.job,
                        controls,
                    };
                    match self.messenger.edit(&handle, &text, affordance).await {
                        Ok(()) | Err(MessengerError::NotModified) => {
                            self.cache.record_updated(index, &text, controls);
                        }
                        Err(err) => {
                            sweep_warn!("updating page {index} of job {} failed: {err}", self.job);
                        }
                    }
                }
                PageChange::ClearControls { index } => {
                    let Some(handle) = self.cache.handle(index).cloned() else {
                        continue;
                    };
                    match self.messenger.clear_controls(&handle).await {
                        Ok(()) | Err(MessengerError::NotModified) => {
                            let text = self.cache.pages()[index].last_text.clone();
                            self.cache.record_updated(index, &text, Controls::None);
                        }
                        Err(err) => {
                            sweep_debug!("clearing controls of page {index} failed: {err}");
                        }
                    }
                }
            }
        }
        true
    }
}
