#![forbid(unsafe_code)]

mod remark;
mod report;
mod village;

use crate::config::Config;
use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use sv_storage::{DataFiles, Diagnostic, initialize_data_files};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write sample data for any missing data file.
    Init,
    /// Print the effective configuration.
    Config,
    /// Dashboard: headline metrics, distributions and programme progress.
    Overview,
    /// Contacts per zone and the phase responsibility matrix.
    Contacts {
        /// Also list Notification and Card Issuance in the matrix.
        #[arg(long)]
        all_phases: bool,
    },
    #[command(subcommand)]
    Village(village::VillageCommand),
    #[command(subcommand)]
    Remark(remark::RemarkCommand),
    /// Replace every village with the rows of a CSV file.
    Import {
        file: PathBuf,
        /// Also reject non-pipeline phases, unreadable dates and
        /// milestones dated out of order.
        #[arg(long)]
        strict: bool,
    },
    /// Write a data set as CSV (stdout unless --output is given).
    Export {
        #[arg(value_enum)]
        dataset: Dataset,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Dataset {
    Villages,
    Remarks,
}

pub fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    let files = config.data_files();
    if let Command::Init = command {
        let created = initialize_data_files(&files)?;
        return print_json(&serde_json::json!({ "created": created }));
    }
    if config.seed_sample_data {
        initialize_data_files(&files)?;
    }

    match command {
        Command::Init => Ok(()),
        Command::Config => print_json(config),
        Command::Overview => report::overview(&files),
        Command::Contacts { all_phases } => report::contacts(&files, all_phases),
        Command::Village(command) => village::run(command, &files),
        Command::Remark(command) => remark::run(command, &files),
        Command::Import { file, strict } => village::import(&files, &file, strict),
        Command::Export { dataset, output } => export(&files, dataset, output),
    }
}

fn export(files: &DataFiles, dataset: Dataset, output: Option<PathBuf>) -> anyhow::Result<()> {
    let bytes = match dataset {
        Dataset::Villages => files.village_store().export(Vec::new())?,
        Dataset::Remarks => files.remark_log().export(Vec::new())?,
    };
    match output {
        Some(path) => {
            std::fs::write(&path, &bytes)?;
            tracing::info!(path = %path.display(), "export written");
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub(crate) fn diagnostic_lines(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(ToString::to_string).collect()
}
