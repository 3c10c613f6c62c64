#![forbid(unsafe_code)]

use super::print_json;
use anyhow::bail;
use clap::Subcommand;
use serde_json::json;
use sv_core::remark::{DEPARTMENTS, HELP_CATEGORIES, is_suggested_help_category};
use sv_core::{NewRemark, RemarkFilter, RemarkId, RemarkStatus};
use sv_storage::{DataFiles, UpdateOutcome};

#[derive(Debug, Subcommand)]
pub enum RemarkCommand {
    /// Record a remark from a field official.
    Submit {
        #[arg(long)]
        official: String,
        #[arg(long)]
        department: String,
        /// Pipeline phase the remark is about ("All" for none in particular).
        #[arg(long)]
        phase: Option<String>,
        #[arg(long)]
        village: Option<String>,
        #[arg(long)]
        text: String,
        #[arg(long = "help-required", default_value = "")]
        help_required: String,
    },
    /// List remarks; "All" or an omitted filter matches everything.
    List {
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        status: Option<RemarkStatus>,
        #[arg(long = "help-required")]
        help_required: Option<String>,
    },
    /// Remarks still waiting on a response.
    Pending,
    /// Set a remark's status and response.
    Respond {
        id: RemarkId,
        #[arg(long)]
        status: RemarkStatus,
        #[arg(long)]
        response: String,
    },
    /// Departments and help categories offered on the submission form.
    Options,
}

pub(super) fn run(command: RemarkCommand, files: &DataFiles) -> anyhow::Result<()> {
    let mut log = files.remark_log();
    match command {
        RemarkCommand::Submit {
            official,
            department,
            phase,
            village,
            text,
            help_required,
        } => {
            if !help_required.trim().is_empty() && !is_suggested_help_category(&help_required) {
                tracing::info!(
                    help_required = %help_required,
                    "help category outside the suggested list"
                );
            }
            let id = log.append(NewRemark {
                official_name: official,
                department,
                phase,
                village,
                remarks: text,
                help_required,
            })?;
            print_json(&log.get(id))
        }
        RemarkCommand::List {
            department,
            status,
            help_required,
        } => {
            let filter = RemarkFilter {
                department: RemarkFilter::selection(department.as_deref()),
                status,
                help_required: RemarkFilter::selection(help_required.as_deref()),
            };
            print_json(&log.filtered(&filter))
        }
        RemarkCommand::Pending => print_json(&log.pending()),
        RemarkCommand::Respond {
            id,
            status,
            response,
        } => match log.set_status_and_response(id, status, &response)? {
            UpdateOutcome::Updated(id) => print_json(&log.get(id)),
            UpdateOutcome::NotFound => bail!("no remark with id {id}"),
        },
        RemarkCommand::Options => print_json(&json!({
            "departments": DEPARTMENTS,
            "help_categories": HELP_CATEGORIES,
            "statuses": RemarkStatus::ALL,
        })),
    }
}
