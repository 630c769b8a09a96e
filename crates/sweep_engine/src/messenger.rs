//! The messaging surface pages and exports are delivered through.

use std::fmt;

use serde::{Deserialize, Serialize};
use sweep_core::{text_len, Controls, JobId};
use thiserror::Error;

/// Where a message goes: a chat, a channel, a console pane.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub String);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Opaque handle of a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    pub target: TargetId,
    pub id: u64,
}

/// Interactive controls attached to a message, bound to one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordance {
    pub job: JobId,
    pub controls: Controls,
}

impl Affordance {
    pub fn none(job: JobId) -> Self {
        Self {
            job,
            controls: Controls::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessengerError {
    /// The edit would not change anything. Not a failure.
    #[error("message not modified")]
    NotModified,
    #[error("text of {len} characters exceeds the {limit} character limit")]
    TooLong { len: usize, limit: usize },
    #[error("transport failure: {0}")]
    Transport(String),
}

#[async_trait::async_trait]
pub trait Messenger: Send + Sync {
    /// Hard maximum text length, in characters.
    fn text_limit(&self) -> usize;

    async fn send(
        &self,
        target: &TargetId,
        text: &str,
        affordance: Affordance,
    ) -> Result<MessageHandle, MessengerError>;

    async fn edit(
        &self,
        handle: &MessageHandle,
        text: &str,
        affordance: Affordance,
    ) -> Result<(), MessengerError>;

    async fn clear_controls(&self, handle: &MessageHandle) -> Result<(), MessengerError>;

    async fn upload(
        &self,
        target: &TargetId,
        filename: &str,
        body: &[u8],
    ) -> Result<(), MessengerError>;
}

/// Reject text the surface could never accept, before any transport call.
pub fn ensure_within_limit(text: &str, limit: usize) -> Result<(), MessengerError> {
    let len = text_len(text);
    if len > limit {
        return Err(MessengerError::TooLong { len, limit });
    }
    Ok(())
}
