//! Terminal rendition of the messaging surface.
//!
//! Every send or edit prints the full message; uploads land in the output
//! directory, one subdirectory per target.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use sweep_core::Controls;
use sweep_engine::{
    ensure_within_limit, Affordance, AtomicFileWriter, MessageHandle, Messenger, MessengerError,
    TargetId,
};
use sweep_logging::sweep_debug;

pub struct ConsoleMessenger {
    limit: usize,
    output_dir: PathBuf,
    next_id: AtomicU64,
    shown: Mutex<HashMap<u64, (String, Controls)>>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleMessenger {
    pub fn stdout(limit: usize, output_dir: PathBuf) -> Self {
        Self::with_writer(limit, output_dir, Box::new(std::io::stdout()))
    }

    pub fn with_writer(limit: usize, output_dir: PathBuf, out: Box<dyn Write + Send>) -> Self {
        Self {
            limit,
            output_dir,
            next_id: AtomicU64::new(1),
            shown: Mutex::new(HashMap::new()),
            out: Mutex::new(out),
        }
    }

    fn print(&self, heading: &str, text: &str, controls: Controls) -> Result<(), MessengerError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| MessengerError::Transport("console poisoned".into()))?;
        let hint = match controls {
            Controls::None => "",
            Controls::PauseCancel => "\n[p] pause  [c] cancel  [s] status",
            Controls::ResumeCancel => "\n[r] resume  [c] cancel  [s] status",
        };
        writeln!(out, "\n==== {heading} ====\n{text}{hint}")
            .and_then(|()| out.flush())
            .map_err(|err| MessengerError::Transport(err.to_string()))
    }

    fn remember(&self, id: u64, text: &str, controls: Controls) {
        if let Ok(mut shown) = self.shown.lock() {
            shown.insert(id, (text.to_string(), controls));
        }
    }
}

#[async_trait::async_trait]
impl Messenger for ConsoleMessenger {
    fn text_limit(&self) -> usize {
        self.limit
    }

    async fn send(
        &self,
        target: &TargetId,
        text: &str,
        affordance: Affordance,
    ) -> Result<MessageHandle, MessengerError> {
        ensure_within_limit(text, self.limit)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.print(&format!("{target} #{id}"), text, affordance.controls)?;
        self.remember(id, text, affordance.controls);
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
        ensure_within_limit(text, self.limit)?;
        let unchanged = self
            .shown
            .lock()
            .map(|shown| {
                shown.get(&handle.id).is_some_and(|(last, controls)| {
                    last == text && *controls == affordance.controls
                })
            })
            .unwrap_or(false);
        if unchanged {
            return Err(MessengerError::NotModified);
        }
        self.print(
            &format!("{} #{} (updated)", handle.target, handle.id),
            text,
            affordance.controls,
        )?;
        self.remember(handle.id, text, affordance.controls);
        Ok(())
    }

    async fn clear_controls(&self, handle: &MessageHandle) -> Result<(), MessengerError> {
        if let Ok(mut shown) = self.shown.lock() {
            if let Some(entry) = shown.get_mut(&handle.id) {
                entry.1 = Controls::None;
            }
        }
        sweep_debug!("controls removed from {} #{}", handle.target, handle.id);
        Ok(())
    }

    async fn upload(
        &self,
        target: &TargetId,
        filename: &str,
        body: &[u8],
    ) -> Result<(), MessengerError> {
        let writer = AtomicFileWriter::new(self.output_dir.join(target_dir(target)));
        let path = writer
            .write(filename, body)
            .map_err(|err| MessengerError::Transport(err.to_string()))?;
        self.print(
            &format!("{target} attachment"),
            &format!("saved {}", path.display()),
            Controls::None,
        )
    }
}

/// Directory-safe name for a target id.
fn target_dir(target: &TargetId) -> String {
    let name: String = target
        .0
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() {
        "_".to_string()
    } else {
        name
    }
}
