//! Forwarding destinations saved per user.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sweep_logging::sweep_info;
use thiserror::Error;

use crate::{AtomicFileWriter, PersistError, TargetId};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("reading {path:?} failed: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path:?} is not a valid registry: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("serializing registry failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("registry path {0:?} has no file name")]
    BadPath(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub target_id: TargetId,
    pub label: String,
    pub added_utc: DateTime<Utc>,
}

/// JSON file mapping user id to that user's destinations.
#[derive(Debug, Clone, Default)]
pub struct DestinationRegistry {
    path: PathBuf,
    entries: BTreeMap<String, Vec<Destination>>,
}

impl DestinationRegistry {
    /// Load from `path`; a missing file is an empty registry.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|source| RegistryError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(RegistryError::Read { path, source }),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, user: &str) -> &[Destination] {
        self.entries.get(user).map(Vec::as_slice).unwrap_or_default()
    }

    /// Add or relabel a destination. Returns false when it was already
    /// present under the same label.
    pub fn add(&mut self, user: &str, target_id: TargetId, label: impl Into<String>) -> bool {
        let label = label.into();
        let list = self.entries.entry(user.to_string()).or_default();
        if let Some(existing) = list.iter_mut().find(|d| d.target_id == target_id) {
            if existing.label == label {
                return false;
            }
            existing.label = label;
            return true;
        }
        list.push(Destination {
            target_id,
            label,
            added_utc: Utc::now(),
        });
        true
    }

    pub fn remove(&mut self, user: &str, target_id: &TargetId) -> bool {
        let Some(list) = self.entries.get_mut(user) else {
            return false;
        };
        let before = list.len();
        list.retain(|d| &d.target_id != target_id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.entries.remove(user);
        }
        removed
    }

    pub fn save(&self) -> Result<(), RegistryError> {
        let filename = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| RegistryError::BadPath(self.path.clone()))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let content = serde_json::to_string_pretty(&self.entries)?;
        AtomicFileWriter::new(dir).write(filename, content.as_bytes())?;
        sweep_info!("saved destination registry to {:?}", self.path);
        Ok(())
    }
}
