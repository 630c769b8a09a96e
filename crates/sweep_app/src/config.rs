use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sweep_core::{DisplayOrder, PageLayout};
use sweep_engine::{HttpSettings, JobSettings};

use crate::cli::Cli;
use crate::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "ipsweep.ron";
pub const DEFAULT_WORKER_URL: &str = "https://check80.pages.dev";

/// Settings read from `ipsweep.ron`. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub worker_url: String,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    pub pause_poll_ms: u64,
    pub request_timeout_secs: u64,
    pub source_timeout_secs: u64,
    pub page_limit: usize,
    pub page_margin: usize,
    pub max_entries_per_page: usize,
    /// Show lowest-risk results first instead of in arrival order.
    pub sort_by_risk: bool,
    pub output_dir: PathBuf,
    pub registry_path: PathBuf,
    pub user: String,
    pub log: LogDestination,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            worker_url: DEFAULT_WORKER_URL.to_string(),
            batch_size: 30,
            batch_delay_ms: 1000,
            pause_poll_ms: 1000,
            request_timeout_secs: 45,
            source_timeout_secs: 15,
            page_limit: sweep_core::HARD_LIMIT,
            page_margin: sweep_core::DEFAULT_SAFETY_MARGIN,
            max_entries_per_page: sweep_core::DEFAULT_MAX_ENTRIES,
            sort_by_risk: true,
            output_dir: PathBuf::from("ipsweep_out"),
            registry_path: PathBuf::from("ipsweep_destinations.json"),
            user: "local".to_string(),
            log: LogDestination::File,
        }
    }
}

impl SweepConfig {
    /// Read `path`, or `ipsweep.ron` when it exists. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()))
            }
        };
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Command-line flags and environment win over the file.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(url) = &cli.worker_url {
            self.worker_url = url.clone();
        }
        if let Some(batch_size) = cli.batch_size {
            self.batch_size = batch_size;
        }
        if let Some(user) = &cli.user {
            self.user = user.clone();
        }
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(log) = cli.log {
            self.log = log;
        }
    }

    pub fn layout(&self) -> anyhow::Result<PageLayout> {
        let order = if self.sort_by_risk {
            DisplayOrder::RiskAscending
        } else {
            DisplayOrder::Arrival
        };
        PageLayout::new(
            self.page_limit,
            self.page_margin,
            self.max_entries_per_page,
            order,
        )
        .context("invalid page layout")
    }

    pub fn job_settings(&self) -> anyhow::Result<JobSettings> {
        if self.batch_size == 0 {
            anyhow::bail!("batch_size must be at least 1");
        }
        Ok(JobSettings {
            batch_size: self.batch_size,
            batch_delay: Duration::from_millis(self.batch_delay_ms),
            pause_poll: Duration::from_millis(self.pause_poll_ms.max(1)),
            layout: self.layout()?,
        })
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..HttpSettings::default()
        }
    }

    pub fn source_settings(&self) -> HttpSettings {
        HttpSettings {
            request_timeout: Duration::from_secs(self.source_timeout_secs),
            ..HttpSettings::for_sources()
        }
    }
}
