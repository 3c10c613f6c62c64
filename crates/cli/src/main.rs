#![forbid(unsafe_code)]

mod commands;
mod config;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Phase-progress tracker for SVAMITVA village land surveys.
#[derive(Debug, Parser)]
#[command(name = "svamitva", version)]
struct Cli {
    /// Directory holding the data files (and `svamitva.toml`).
    #[arg(long, global = true, env = "SVAMITVA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Explicit config file instead of `<data-dir>/svamitva.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Do not write sample data for missing files.
    #[arg(long, global = true)]
    no_seed: bool,

    #[command(subcommand)]
    command: commands::Command,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SVAMITVA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = config::load(&config::Overrides {
        config_file: cli.config,
        data_dir: cli.data_dir,
        no_seed: cli.no_seed,
    })?;
    commands::run(cli.command, &config)
}
