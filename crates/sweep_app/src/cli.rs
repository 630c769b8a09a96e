use std::path::PathBuf;

use clap::builder::TypedValueParser;
use clap::{Args, Parser, Subcommand};

use crate::logging::LogDestination;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "ipsweep",
    version,
    about = "Checks endpoint lists against a validity oracle with pausable live reports"
)]
pub struct Cli {
    /// RON config file (defaults to ./ipsweep.ron when present).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, env = "IPSWEEP_WORKER_URL")]
    pub worker_url: Option<String>,

    /// Candidates checked concurrently per batch.
    #[arg(
        long,
        global = true,
        value_parser = clap::value_parser!(u16).range(1..=1000).map(usize::from)
    )]
    pub batch_size: Option<usize>,

    /// User id the destination registry is keyed by.
    #[arg(long, global = true, env = "IPSWEEP_USER")]
    pub user: Option<String>,

    /// Where export files are saved.
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    pub log: Option<LogDestination>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check addresses given inline or in a local file.
    Check {
        /// Addresses, optionally with a `:port` suffix.
        addresses: Vec<String>,
        /// Read more addresses from a text file (whitespace or comma separated).
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Check every host in CIDR blocks or `a.b.c.x-y` spans.
    Range {
        #[arg(required = true)]
        ranges: Vec<String>,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Resolve domains and check the addresses behind them.
    Domain {
        #[arg(required = true)]
        domains: Vec<String>,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Check addresses scraped from a remote text file.
    File {
        url: String,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Check the published list for a country code (`ALL` for every country).
    Country {
        code: String,
        #[command(flatten)]
        run: RunArgs,
    },
    /// List the known country codes.
    Countries,
    /// Manage forwarding destinations.
    Targets {
        #[command(subcommand)]
        action: TargetsCommand,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Also send the final report to this saved destination (id or label).
    #[arg(long = "forward", value_name = "TARGET")]
    pub forward: Vec<String>,
    /// Forward to every saved destination.
    #[arg(long, conflicts_with = "forward")]
    pub forward_all: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum TargetsCommand {
    Add {
        target_id: String,
        /// Display label; defaults to the id.
        label: Option<String>,
    },
    List,
    Remove {
        target_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_commands_take_forward_targets() {
        let cli = Cli::try_parse_from([
            "ipsweep",
            "domain",
            "a.example",
            "b.example",
            "--forward",
            "ops",
            "--forward",
            "@channel",
        ])
        .unwrap();
        match cli.command {
            Command::Domain { domains, run } => {
                assert_eq!(domains, vec!["a.example", "b.example"]);
                assert_eq!(run.forward, vec!["ops", "@channel"]);
                assert!(!run.forward_all);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn ranges_are_required() {
        assert!(Cli::try_parse_from(["ipsweep", "range"]).is_err());
        assert!(Cli::try_parse_from(["ipsweep", "range", "10.0.0.0/24", "--batch-size", "0"]).is_err());
    }
}
