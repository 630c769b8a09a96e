mod cli;
mod config;
mod console;
mod controls;
mod logging;
mod run;

use clap::Parser;

use crate::cli::Cli;
use crate::config::SweepConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SweepConfig::load(cli.config.as_deref())?;
    config.apply_overrides(&cli);
    logging::initialize(config.log);
    run::execute(cli, config).await
}
