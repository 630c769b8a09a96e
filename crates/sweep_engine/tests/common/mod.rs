#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sweep_core::{Controls, MetaValue, PageLayout};
use sweep_engine::{
    Affordance, CheckError, FailureKind, JobSettings, MessageHandle, Messenger, MessengerError, Oracle,
    OracleVerdict, TargetId,
};
use tokio::sync::Semaphore;

pub fn init_logging() {
    sweep_logging::initialize_for_tests();
}

pub fn fast_settings() -> JobSettings {
    JobSettings {
        batch_size: 30,
        batch_delay: Duration::from_millis(1),
        pause_poll: Duration::from_millis(5),
        layout: PageLayout::default(),
    }
}

pub fn addresses(count: usize) -> Vec<String> {
    (0..count)
        .map(|n| format!("198.51.{}.{}", n / 200, n % 200 + 1))
        .collect()
}

/// Poll `condition` until it holds, failing the test after five seconds.
pub async fn eventually(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        if tokio::time::Instant::now() > deadline {
            panic!("timed out waiting for {what}");
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

pub async fn with_timeout<T>(future: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(10), future)
        .await
        .expect("future finished in time")
}

/// Oracle whose checks are recorded on entry and then held until the test
/// hands out permits.
pub struct FakeOracle {
    calls: Mutex<Vec<String>>,
    gate: Option<Semaphore>,
    succeeds: Box<dyn Fn(&str) -> bool + Send + Sync>,
}

impl FakeOracle {
    pub fn open(succeeds: impl Fn(&str) -> bool + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            gate: None,
            succeeds: Box::new(succeeds),
        })
    }

    pub fn gated(succeeds: impl Fn(&str) -> bool + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            gate: Some(Semaphore::new(0)),
            succeeds: Box::new(succeeds),
        })
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Oracle for FakeOracle {
    async fn check(&self, address: &str) -> Result<OracleVerdict, CheckError> {
        self.calls.lock().unwrap().push(address.to_string());
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate open").forget();
        }
        if !(self.succeeds)(address) {
            return Err(rejected(address));
        }
        let mut metadata = BTreeMap::new();
        metadata.insert("country".to_string(), MetaValue::Text("DE".into()));
        metadata.insert("as".to_string(), MetaValue::Text("AS3320".into()));
        Ok(OracleVerdict {
            address: address.to_string(),
            metadata,
        })
    }
}

fn rejected(address: &str) -> CheckError {
    CheckError {
        kind: FailureKind::Rejected,
        message: format!("{address} unusable"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Sent {
        target: TargetId,
        id: u64,
        text: String,
        controls: Controls,
    },
    Edited {
        id: u64,
        text: String,
        controls: Controls,
    },
    Cleared {
        id: u64,
    },
    Uploaded {
        target: TargetId,
        filename: String,
        body: String,
    },
}

/// Calls the recording messenger should fail with a transport error.
#[derive(Default)]
struct Failures {
    sends_containing: Option<String>,
    uploads_ending_with: Option<String>,
    edits: usize,
    injected: usize,
}

/// Records every call and keeps the current state of each message.
#[derive(Default)]
pub struct RecordingMessenger {
    next_id: AtomicU64,
    events: Mutex<Vec<Event>>,
    messages: Mutex<HashMap<u64, (String, Controls)>>,
    failures: Mutex<Failures>,
}

impl RecordingMessenger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail every send whose text contains `needle`.
    pub fn fail_sends_containing(&self, needle: &str) {
        self.failures.lock().unwrap().sends_containing = Some(needle.to_string());
    }

    /// Fail every upload whose filename ends with `suffix`.
    pub fn fail_uploads_ending_with(&self, suffix: &str) {
        self.failures.lock().unwrap().uploads_ending_with = Some(suffix.to_string());
    }

    pub fn fail_next_edits(&self, count: usize) {
        self.failures.lock().unwrap().edits = count;
    }

    pub fn injected_failures(&self) -> usize {
        self.failures.lock().unwrap().injected
    }

    fn injected(&self, what: &str) -> MessengerError {
        self.failures.lock().unwrap().injected += 1;
        MessengerError::Transport(format!("{what} refused"))
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn message(&self, id: u64) -> Option<(String, Controls)> {
        self.messages.lock().unwrap().get(&id).cloned()
    }

    /// Messages sent to `target`, in send order, with their current state.
    pub fn current_messages(&self, target: &str) -> Vec<(String, Controls)> {
        let ids: Vec<u64> = self
            .events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Sent { target: t, id, .. } if t.0 == target => Some(id),
                _ => None,
            })
            .collect();
        ids.into_iter().filter_map(|id| self.message(id)).collect()
    }

    pub fn uploads(&self) -> Vec<(TargetId, String, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Uploaded {
                    target,
                    filename,
                    body,
                } => Some((target, filename, body)),
                _ => None,
            })
            .collect()
    }

    pub fn edit_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::Edited { .. }))
            .count()
    }
}

#[async_trait::async_trait]
impl Messenger for RecordingMessenger {
    fn text_limit(&self) -> usize {
        4096
    }

    async fn send(
        &self,
        target: &TargetId,
        text: &str,
        affordance: Affordance,
    ) -> Result<MessageHandle, MessengerError> {
        let refused = match &self.failures.lock().unwrap().sends_containing {
            Some(needle) => text.contains(needle.as_str()),
            None => false,
        };
        if refused {
            return Err(self.injected("send"));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.messages
            .lock()
            .unwrap()
            .insert(id, (text.to_string(), affordance.controls));
        self.events.lock().unwrap().push(Event::Sent {
            target: target.clone(),
            id,
            text: text.to_string(),
            controls: affordance.controls,
        });
        Ok(MessageHandle {
            target: target.clone(),
            id,
        })
    }

    async fn edit(
        &self,
        handle: &MessageHandle,
        text: &str,
        affordance: Affordance,
    ) -> Result<(), MessengerError> {
        let refused = {
            let mut failures = self.failures.lock().unwrap();
            if failures.edits > 0 {
                failures.edits -= 1;
                true
            } else {
                false
            }
        };
        if refused {
            return Err(self.injected("edit"));
        }
        let mut messages = self.messages.lock().unwrap();
        let current = (text.to_string(), affordance.controls);
        if messages.get(&handle.id) == Some(&current) {
            return Err(MessengerError::NotModified);
        }
        messages.insert(handle.id, current);
        self.events.lock().unwrap().push(Event::Edited {
            id: handle.id,
            text: text.to_string(),
            controls: affordance.controls,
        });
        Ok(())
    }

    async fn clear_controls(&self, handle: &MessageHandle) -> Result<(), MessengerError> {
        if let Some(entry) = self.messages.lock().unwrap().get_mut(&handle.id) {
            entry.1 = Controls::None;
        }
        self.events
            .lock()
            .unwrap()
            .push(Event::Cleared { id: handle.id });
        Ok(())
    }

    async fn upload(
        &self,
        target: &TargetId,
        filename: &str,
        body: &[u8],
    ) -> Result<(), MessengerError> {
        let refused = match &self.failures.lock().unwrap().uploads_ending_with {
            Some(suffix) => filename.ends_with(suffix.as_str()),
            None => false,
        };
        if refused {
            return Err(self.injected("upload"));
        }
        self.events.lock().unwrap().push(Event::Uploaded {
            target: target.clone(),
            filename: filename.to_string(),
            body: String::from_utf8_lossy(body).into_owned(),
        });
        Ok(())
    }
}
