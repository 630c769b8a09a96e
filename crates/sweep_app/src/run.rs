use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Local};
use sweep_core::COUNTRIES;
use sweep_engine::{
    BulkSource, DestinationRegistry, HttpOracle, HttpResolver, Intake, JobReport, SourceRef,
    SweepEngine, TargetId,
};
use sweep_logging::sweep_info;
use tokio::sync::mpsc;

use crate::cli::{Cli, Command, RunArgs, TargetsCommand};
use crate::config::SweepConfig;
use crate::console::ConsoleMessenger;
use crate::controls::{spawn_ctrl_c_handler, spawn_dispatcher, spawn_stdin_reader};

const CONSOLE_TARGET: &str = "console";

pub async fn execute(cli: Cli, config: SweepConfig) -> anyhow::Result<()> {
    match cli.command {
        Command::Countries => {
            for (code, name) in COUNTRIES {
                println!("{code:<4} {name}");
            }
            Ok(())
        }
        Command::Targets { action } => manage_targets(&config, action),
        Command::Check {
            addresses,
            file,
            run,
        } => {
            let mut tokens = split_tokens(&addresses.join(" "));
            if let Some(file) = file {
                tokens.extend(read_address_file(&file)?);
            }
            let intake = Intake::from_addresses(tokens).context("no addresses given")?;
            run_job(&config, intake, &run).await
        }
        Command::Range { ranges, run } => {
            let intake = Intake::from_ranges(&ranges).context("no usable ranges")?;
            run_job(&config, intake, &run).await
        }
        Command::Domain { domains, run } => {
            let resolver = HttpResolver::new(&config.worker_url, &config.http_settings())?;
            let intake = Intake::from_domains(&resolver, &domains)
                .await
                .context("none of the domains resolved")?;
            run_job(&config, intake, &run).await
        }
        Command::File { url, run } => {
            run_source(&config, SourceRef::Url(url), &run).await
        }
        Command::Country { code, run } => {
            run_source(&config, SourceRef::Country(code), &run).await
        }
    }
}

async fn run_source(config: &SweepConfig, reference: SourceRef, run: &RunArgs) -> anyhow::Result<()> {
    let source = BulkSource::new(&config.source_settings())?;
    let intake = Intake::from_source(&source, &reference)
        .await
        .with_context(|| format!("no addresses found in {}", reference.display_name()))?;
    run_job(config, intake, run).await
}

async fn run_job(config: &SweepConfig, intake: Intake, run: &RunArgs) -> anyhow::Result<()> {
    for skipped in &intake.skipped {
        eprintln!("skipped {skipped}");
    }
    let forward = forward_targets(config, run)?;
    let settings = config.job_settings()?;
    let oracle = Arc::new(HttpOracle::new(&config.worker_url, &config.http_settings())?);
    let messenger = Arc::new(ConsoleMessenger::stdout(
        settings.layout.hard_limit(),
        config.output_dir.clone(),
    ));
    let engine = SweepEngine::new(oracle, messenger, settings);

    let spec = intake
        .into_spec(TargetId::from(CONSOLE_TARGET))
        .with_forward(forward);
    let started = Local::now();
    let handle = engine.start(spec);
    let id = handle.id();

    let (tx, rx) = mpsc::unbounded_channel();
    spawn_stdin_reader(tx.clone());
    spawn_ctrl_c_handler(tx);
    let dispatcher = spawn_dispatcher(engine.clone(), id, rx);

    let report = handle.wait().await.context("job task failed")?;
    dispatcher.abort();

    println!("\n{}", summary_line(&report, started, Local::now()));
    Ok(())
}

fn summary_line(report: &JobReport, started: DateTime<Local>, finished: DateTime<Local>) -> String {
    let elapsed = (finished - started).num_seconds().max(0);
    format!(
        "Job {} {} at {} after {}m {:02}s: checked {}/{}, successful {}",
        report.id,
        report.label.as_str().to_lowercase(),
        finished.format("%Y-%m-%d %H:%M:%S"),
        elapsed / 60,
        elapsed % 60,
        report.checked,
        report.total,
        report.successes
    )
}

/// Resolve `--forward` names against the user's saved destinations.
fn forward_targets(config: &SweepConfig, run: &RunArgs) -> anyhow::Result<Vec<TargetId>> {
    if run.forward.is_empty() && !run.forward_all {
        return Ok(Vec::new());
    }
    let registry = DestinationRegistry::load(&config.registry_path)?;
    let saved = registry.get(&config.user);
    if run.forward_all {
        return Ok(saved.iter().map(|d| d.target_id.clone()).collect());
    }
    run.forward
        .iter()
        .map(|wanted| {
            saved
                .iter()
                .find(|d| d.target_id.0 == *wanted || d.label == *wanted)
                .map(|d| d.target_id.clone())
                .with_context(|| {
                    format!("no saved destination {wanted:?}; add it with `ipsweep targets add`")
                })
        })
        .collect()
}

fn manage_targets(config: &SweepConfig, action: TargetsCommand) -> anyhow::Result<()> {
    let mut registry = DestinationRegistry::load(&config.registry_path)?;
    match action {
        TargetsCommand::Add { target_id, label } => {
            let label = label.unwrap_or_else(|| target_id.clone());
            if registry.add(&config.user, TargetId(target_id.clone()), label) {
                registry.save()?;
                sweep_info!("destination {target_id} saved for {}", config.user);
                println!("saved {target_id}");
            } else {
                println!("{target_id} is already saved");
            }
        }
        TargetsCommand::List => {
            let saved = registry.get(&config.user);
            if saved.is_empty() {
                println!("no saved destinations for {}", config.user);
            }
            for destination in saved {
                println!(
                    "{:<24} {:<24} added {}",
                    destination.target_id,
                    destination.label,
                    destination.added_utc.format("%Y-%m-%d %H:%M UTC")
                );
            }
        }
        TargetsCommand::Remove { target_id } => {
            if registry.remove(&config.user, &TargetId(target_id.clone())) {
                registry.save()?;
                println!("removed {target_id}");
            } else {
                anyhow::bail!("{target_id} is not a saved destination");
            }
        }
    }
    Ok(())
}

fn read_address_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading addresses from {}", path.display()))?;
    Ok(split_tokens(&text))
}

fn split_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
