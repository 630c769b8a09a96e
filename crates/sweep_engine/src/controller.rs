//! Job registry and the per-job control loop.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use sweep_core::{
    render_pages, CandidateSet, Controls, FinalLabel, JobId, JobProgress, JobState, JobStatus,
    PageLayout, TransitionError,
};
use sweep_logging::{sweep_debug, sweep_info, sweep_warn};
use tokio::task::JoinHandle;

use crate::finalizer::{finalize, Delivery};
use crate::pages::PageBook;
use crate::{BatchExecutor, ControlError, Messenger, Oracle, TargetId};

#[derive(Debug, Clone)]
pub struct JobSettings {
    pub batch_size: usize,
    /// Pause between batches so the oracle is not flooded.
    pub batch_delay: Duration,
    pub pause_poll: Duration,
    pub layout: PageLayout,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            batch_size: 30,
            batch_delay: Duration::from_secs(1),
            pause_poll: Duration::from_secs(1),
            layout: PageLayout::default(),
        }
    }
}

/// Everything needed to start one run.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub title: String,
    pub candidates: CandidateSet,
    /// Number of domains or ranges the candidates came from.
    pub source_count: usize,
    pub origin: TargetId,
    pub forward: Vec<TargetId>,
}

impl JobSpec {
    pub fn new(
        title: impl Into<String>,
        candidates: CandidateSet,
        source_count: usize,
        origin: TargetId,
    ) -> Self {
        Self {
            title: title.into(),
            candidates,
            source_count,
            origin,
            forward: Vec::new(),
        }
    }

    pub fn with_forward(mut self, forward: Vec<TargetId>) -> Self {
        self.forward = forward;
        self
    }
}

/// Terminal summary of a finished job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub id: JobId,
    pub status: JobStatus,
    pub label: FinalLabel,
    pub checked: usize,
    pub total: usize,
    pub successes: usize,
    /// Sorted, deduplicated successful addresses.
    pub exported: Vec<String>,
    /// Final page texts as delivered to the origin.
    pub pages: Vec<String>,
}

/// Shared between the loop and external callers. Only the status flag and
/// the progress counters cross task boundaries.
#[derive(Debug)]
struct JobControl {
    status: Mutex<JobStatus>,
    progress: Mutex<JobProgress>,
}

impl JobControl {
    fn new(total: usize) -> Self {
        Self {
            status: Mutex::new(JobStatus::Running),
            progress: Mutex::new(JobProgress {
                total,
                ..JobProgress::default()
            }),
        }
    }

    fn status(&self) -> JobStatus {
        *lock(&self.status)
    }

    fn transition(
        &self,
        step: impl FnOnce(JobStatus) -> Result<JobStatus, TransitionError>,
    ) -> Result<JobStatus, TransitionError> {
        let mut status = lock(&self.status);
        let next = step(*status)?;
        *status = next;
        Ok(next)
    }

    fn progress(&self) -> JobProgress {
        *lock(&self.progress)
    }

    fn set_progress(&self, progress: JobProgress) {
        *lock(&self.progress) = progress;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type Registry = Arc<Mutex<HashMap<JobId, Arc<JobControl>>>>;

/// Removes the job from the registry once its task is done, however it ends.
struct Registration {
    registry: Registry,
    id: JobId,
}

impl Drop for Registration {
    fn drop(&mut self) {
        lock(&self.registry).remove(&self.id);
    }
}

/// Starts jobs and routes pause / resume / cancel to them by id.
#[derive(Clone)]
pub struct SweepEngine {
    registry: Registry,
    executor: BatchExecutor,
    messenger: Arc<dyn Messenger>,
    settings: JobSettings,
}

impl SweepEngine {
    pub fn new(oracle: Arc<dyn Oracle>, messenger: Arc<dyn Messenger>, settings: JobSettings) -> Self {
        Self {
            registry: Arc::new(Mutex::new(HashMap::new())),
            executor: BatchExecutor::new(oracle),
            messenger,
            settings,
        }
    }

    pub fn settings(&self) -> &JobSettings {
        &self.settings
    }

    /// Register a job and spawn its loop on the current tokio runtime.
    pub fn start(&self, spec: JobSpec) -> JobHandle {
        let id = JobId::new();
        let control = Arc::new(JobControl::new(spec.candidates.len()));
        lock(&self.registry).insert(id, control.clone());
        sweep_info!(
            "job {id} started: {} candidates from {} source(s)",
            spec.candidates.len(),
            spec.source_count.max(1)
        );

        let controller = JobController {
            id,
            spec,
            control,
            executor: self.executor.clone(),
            messenger: self.messenger.clone(),
            settings: self.settings.clone(),
        };
        let registration = Registration {
            registry: self.registry.clone(),
            id,
        };
        let join = tokio::spawn(async move {
            let _registration = registration;
            controller.run().await
        });
        JobHandle { id, join }
    }

    pub fn pause(&self, id: JobId) -> Result<JobStatus, ControlError> {
        let next = self.control(id)?.transition(JobStatus::pause)?;
        sweep_info!("job {id} paused");
        Ok(next)
    }

    pub fn resume(&self, id: JobId) -> Result<JobStatus, ControlError> {
        let next = self.control(id)?.transition(JobStatus::resume)?;
        sweep_info!("job {id} resumed");
        Ok(next)
    }

    /// Takes effect at the next loop boundary; an in-flight batch completes.
    pub fn cancel(&self, id: JobId) -> Result<JobStatus, ControlError> {
        let next = self.control(id)?.transition(JobStatus::cancel)?;
        sweep_info!("job {id} cancel requested");
        Ok(next)
    }

    pub fn status(&self, id: JobId) -> Result<JobStatus, ControlError> {
        Ok(self.control(id)?.status())
    }

    pub fn progress(&self, id: JobId) -> Result<JobProgress, ControlError> {
        Ok(self.control(id)?.progress())
    }

    pub fn active_jobs(&self) -> Vec<JobId> {
        let mut ids: Vec<JobId> = lock(&self.registry).keys().copied().collect();
        ids.sort();
        ids
    }

    fn control(&self, id: JobId) -> Result<Arc<JobControl>, ControlError> {
        lock(&self.registry)
            .get(&id)
            .cloned()
            .ok_or(ControlError::Expired(id))
    }
}

pub struct JobHandle {
    id: JobId,
    join: JoinHandle<JobReport>,
}

impl JobHandle {
    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the job to finish and be finalized.
    pub async fn wait(self) -> Result<JobReport, tokio::task::JoinError> {
        self.join.await
    }
}

/// Owns one job's state for its whole life.
struct JobController {
    id: JobId,
    spec: JobSpec,
    control: Arc<JobControl>,
    executor: BatchExecutor,
    messenger: Arc<dyn Messenger>,
    settings: JobSettings,
}

impl JobController {
    async fn run(self) -> JobReport {
        let JobController {
            id,
            spec,
            control,
            executor,
            messenger,
            settings,
        } = self;
        let JobSpec {
            title,
            candidates,
            source_count,
            origin,
            forward,
        } = spec;

        let mut state = JobState::new(title, candidates, source_count);
        let mut book = PageBook::new(id, origin.clone(), messenger.clone());
        let intro = format!("Starting check of {} candidates...", state.total());
        book.sync(&[intro], Controls::PauseCancel).await;

        let mut shown_paused = false;
        loop {
            match control.status() {
                JobStatus::Stopped | JobStatus::Completed => break,
                _ if state.is_exhausted() => match control.transition(JobStatus::complete) {
                    Ok(_) => break,
                    // Cancelled concurrently; the next pass sees it.
                    Err(_) => continue,
                },
                JobStatus::Paused => {
                    if !shown_paused {
                        render(&state, &mut book, &settings.layout, JobStatus::Paused).await;
                        shown_paused = true;
                    }
                    tokio::time::sleep(settings.pause_poll).await;
                    continue;
                }
                JobStatus::Running => {}
            }

            if shown_paused {
                render(&state, &mut book, &settings.layout, JobStatus::Running).await;
                shown_paused = false;
            }

            let batch = state.next_batch(settings.batch_size);
            if batch.is_empty() {
                sweep_warn!(
                    "job {id} stalled at {}/{}; stopping",
                    state.checked_count(),
                    state.total()
                );
                match control.transition(JobStatus::cancel) {
                    Ok(_) => {}
                    Err(err) => sweep_debug!("job {id} not stopped after stall: {err}"),
                }
                break;
            }

            let outcomes = executor.check_batch(&batch).await;
            let added = state.apply_batch(&batch, outcomes);
            control.set_progress(state.progress());
            sweep_debug!(
                "job {id}: batch of {} done, {added} new successes, {}/{} checked",
                batch.len(),
                state.checked_count(),
                state.total()
            );

            let status = control.status();
            if !status.is_terminal() {
                render(&state, &mut book, &settings.layout, status).await;
                shown_paused = status == JobStatus::Paused;
            }
            if !state.is_exhausted() && status == JobStatus::Running {
                tokio::time::sleep(settings.batch_delay).await;
            }
        }

        let status = control.status();
        let delivery = Delivery {
            messenger: messenger.as_ref(),
            origin: &origin,
            forward: &forward,
        };
        let report = finalize(id, &state, status, &mut book, &settings.layout, &delivery).await;
        sweep_info!(
            "job {id} {}: {}/{} checked, {} successful",
            report.label.as_str().to_lowercase(),
            report.checked,
            report.total,
            report.successes
        );
        report
    }
}

async fn render(state: &JobState, book: &mut PageBook, layout: &PageLayout, status: JobStatus) {
    let pages = render_pages(&state.render_input(status), layout);
    book.sync(&pages, status.controls()).await;
}
