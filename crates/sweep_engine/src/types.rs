use std::fmt;

use sweep_core::{JobId, TransitionError};
use thiserror::Error;

/// Why a single candidate produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct CheckError {
    pub kind: FailureKind,
    pub message: String,
}

impl CheckError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidAddress,
    HttpStatus(u16),
    Timeout,
    Network,
    TooLarge { max_bytes: u64 },
    /// The oracle answered but reported the candidate unusable.
    Rejected,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidAddress => write!(f, "invalid address"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::TooLarge { max_bytes } => write!(f, "response larger than {max_bytes} bytes"),
            FailureKind::Rejected => write!(f, "rejected"),
            FailureKind::Decode => write!(f, "undecodable response"),
        }
    }
}

/// A domain or bulk source that yielded no candidates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("invalid source url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("unknown country code {0}")]
    UnknownCountry(String),
    #[error("fetching {origin} failed: {source}")]
    Fetch {
        origin: String,
        #[source]
        source: CheckError,
    },
}

/// Pause / resume / cancel against the job registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("job {0} is unknown or already finished")]
    Expired(JobId),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("no candidates to check")]
    NoCandidates,
}
