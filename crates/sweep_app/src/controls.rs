//! Interactive pause / resume / cancel for the running job.

use std::io::BufRead;

use sweep_core::JobId;
use sweep_engine::SweepEngine;
use sweep_logging::sweep_info;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Pause,
    Resume,
    Cancel,
    Status,
    /// Second Ctrl-C: stop waiting and exit.
    Abort,
}

impl ControlCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Some(Self::Pause),
            "r" | "resume" => Some(Self::Resume),
            "c" | "cancel" => Some(Self::Cancel),
            "s" | "status" => Some(Self::Status),
            _ => None,
        }
    }
}

/// Feed stdin lines into `tx`. Blocking reads live on their own thread so the
/// runtime never waits on the terminal at shutdown.
pub fn spawn_stdin_reader(tx: mpsc::UnboundedSender<ControlCommand>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                return;
            };
            match ControlCommand::parse(&line) {
                Some(command) => {
                    if tx.send(command).is_err() {
                        return;
                    }
                }
                None if line.trim().is_empty() => {}
                None => eprintln!("unknown command {:?}; use p, r, c or s", line.trim()),
            }
        }
    });
}

/// First Ctrl-C cancels the job gracefully, the second aborts.
pub fn spawn_ctrl_c_handler(tx: mpsc::UnboundedSender<ControlCommand>) {
    tokio::spawn(async move {
        let mut presses = 0u8;
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            presses += 1;
            let command = if presses == 1 {
                ControlCommand::Cancel
            } else {
                ControlCommand::Abort
            };
            if tx.send(command).is_err() || command == ControlCommand::Abort {
                return;
            }
        }
    });
}

/// Apply commands to job `id` until the channel closes or an abort arrives.
pub fn spawn_dispatcher(
    engine: SweepEngine,
    id: JobId,
    mut rx: mpsc::UnboundedReceiver<ControlCommand>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            if command == ControlCommand::Abort {
                eprintln!("aborted");
                std::process::exit(130);
            }
            eprintln!("{}", apply(&engine, id, command));
        }
    })
}

fn apply(engine: &SweepEngine, id: JobId, command: ControlCommand) -> String {
    let outcome = match command {
        ControlCommand::Pause => engine.pause(id),
        ControlCommand::Resume => engine.resume(id),
        ControlCommand::Cancel => engine.cancel(id),
        ControlCommand::Status | ControlCommand::Abort => engine.status(id),
    };
    match outcome {
        Ok(status) => {
            let progress = engine.progress(id).unwrap_or_default();
            sweep_info!("{command:?} on job {id}: now {status:?}");
            format!(
                "{status:?}: checked {}/{}, successful {}",
                progress.checked, progress.total, progress.successes
            )
        }
        Err(err) => format!("{command:?} rejected: {err}"),
    }
}
