use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Opaque identifier of one verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First six hex digits, used for export filenames.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..6].to_string()
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JobStatus {
    #[default]
    Running,
    Paused,
    Stopped,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("job is already paused")]
    AlreadyPaused,
    #[error("job is not paused")]
    NotPaused,
    #[error("job has already finished ({0:?})")]
    Finished(JobStatus),
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Stopped | JobStatus::Completed)
    }

    pub fn pause(self) -> Result<JobStatus, TransitionError> {
        match self {
            JobStatus::Running => Ok(JobStatus::Paused),
            JobStatus::Paused => Err(TransitionError::AlreadyPaused),
            done => Err(TransitionError::Finished(done)),
        }
    }

    pub fn resume(self) -> Result<JobStatus, TransitionError> {
        match self {
            JobStatus::Paused => Ok(JobStatus::Running),
            JobStatus::Running => Err(TransitionError::NotPaused),
            done => Err(TransitionError::Finished(done)),
        }
    }

    pub fn cancel(self) -> Result<JobStatus, TransitionError> {
        match self {
            JobStatus::Running | JobStatus::Paused => Ok(JobStatus::Stopped),
            done => Err(TransitionError::Finished(done)),
        }
    }

    /// Loop-driven transition once every candidate has been checked.
    ///
    /// A pause that lands during the final batch has nothing left to hold, so
    /// Paused completes as well.
    pub fn complete(self) -> Result<JobStatus, TransitionError> {
        match self {
            JobStatus::Running | JobStatus::Paused => Ok(JobStatus::Completed),
            done => Err(TransitionError::Finished(done)),
        }
    }

    /// Interactive affordance carried by the first page in this state.
    pub fn controls(self) -> Controls {
        match self {
            JobStatus::Running => Controls::PauseCancel,
            JobStatus::Paused => Controls::ResumeCancel,
            JobStatus::Stopped | JobStatus::Completed => Controls::None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Controls {
    #[default]
    None,
    PauseCancel,
    ResumeCancel,
}

impl Controls {
    pub(crate) fn tag(self) -> u8 {
        match self {
            Controls::None => 0,
            Controls::PauseCancel => 1,
            Controls::ResumeCancel => 2,
        }
    }
}

/// Terminal label appended to the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalLabel {
    Completed,
    Cancelled,
}

impl FinalLabel {
    pub fn from_status(status: JobStatus) -> Self {
        if status == JobStatus::Stopped {
            FinalLabel::Cancelled
        } else {
            FinalLabel::Completed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FinalLabel::Completed => "Completed",
            FinalLabel::Cancelled => "Cancelled",
        }
    }

    pub fn suffix(self) -> String {
        format!("\n\n**Test {}.**", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_resume_cycle() {
        let paused = JobStatus::Running.pause().unwrap();
        assert_eq!(paused, JobStatus::Paused);
        assert_eq!(paused.pause(), Err(TransitionError::AlreadyPaused));
        assert_eq!(paused.resume(), Ok(JobStatus::Running));
        assert_eq!(JobStatus::Running.resume(), Err(TransitionError::NotPaused));
    }

    #[test]
    fn cancel_only_from_live_states() {
        assert_eq!(JobStatus::Running.cancel(), Ok(JobStatus::Stopped));
        assert_eq!(JobStatus::Paused.cancel(), Ok(JobStatus::Stopped));
        assert_eq!(
            JobStatus::Completed.cancel(),
            Err(TransitionError::Finished(JobStatus::Completed))
        );
        assert_eq!(
            JobStatus::Stopped.pause(),
            Err(TransitionError::Finished(JobStatus::Stopped))
        );
    }

    #[test]
    fn stopped_never_completes() {
        assert!(JobStatus::Stopped.complete().is_err());
        assert_eq!(JobStatus::Paused.complete(), Ok(JobStatus::Completed));
    }

    #[test]
    fn labels_follow_status() {
        assert_eq!(FinalLabel::from_status(JobStatus::Stopped), FinalLabel::Cancelled);
        assert_eq!(FinalLabel::from_status(JobStatus::Completed), FinalLabel::Completed);
        assert_eq!(FinalLabel::Cancelled.suffix(), "\n\n**Test Cancelled.**");
    }

    #[test]
    fn job_ids_round_trip_through_text() {
        let id = JobId::new();
        let parsed: JobId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert_eq!(id.short().len(), 6);
    }
}
