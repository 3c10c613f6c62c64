#![forbid(unsafe_code)]

use super::{diagnostic_lines, print_json};
use anyhow::{Context, bail};
use clap::{Args, Subcommand};
use serde_json::json;
use std::path::Path;
use sv_core::aggregate::responsibility_for;
use sv_core::{
    MilestoneField, NewVillage, Timestamp, VillageChanges, VillageId, VillageRecord, VillageStatus,
};
use sv_storage::{
    CsvFilePort, DataFiles, ImportMode, RowPort, UpdateOutcome, VillageStore, describe_violation,
};

#[derive(Debug, Subcommand)]
pub enum VillageCommand {
    /// List villages, optionally narrowed by zone, phase or status.
    List {
        #[arg(long)]
        zone: Option<String>,
        #[arg(long)]
        phase: Option<String>,
        #[arg(long)]
        status: Option<VillageStatus>,
    },
    /// One village with its current responsibility and remaining estimate.
    Show {
        /// Village id (VIL-0003 or 3) or name.
        village: String,
    },
    Add(AddArgs),
    Update(UpdateArgs),
    /// Villages whose milestone dates run backwards in pipeline order.
    AuditDates,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    zone: String,
    #[arg(long)]
    phase: String,
    #[arg(long)]
    status: VillageStatus,
    /// Property tax official (HDM/JDM).
    #[arg(long)]
    hdm: Option<String>,
    /// Planning official (ATP/MTP).
    #[arg(long)]
    atp: Option<String>,
    #[arg(long)]
    arro: Option<String>,
    #[arg(long, default_value_t = 0)]
    properties: u32,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Village id (VIL-0003 or 3) or name; a name updates its first match.
    village: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    zone: Option<String>,
    #[arg(long)]
    phase: Option<String>,
    #[arg(long)]
    status: Option<VillageStatus>,
    /// Property tax official; an empty value clears it.
    #[arg(long)]
    hdm: Option<String>,
    /// Planning official; an empty value clears it.
    #[arg(long)]
    atp: Option<String>,
    #[arg(long)]
    arro: Option<String>,
    #[arg(long)]
    properties: Option<u32>,
    /// Milestone date as FIELD=DATE (e.g. map2=2024-02-01); FIELD= clears it.
    #[arg(long = "milestone", value_parser = parse_milestone)]
    milestones: Vec<(MilestoneField, Option<Timestamp>)>,
}

fn parse_milestone(value: &str) -> Result<(MilestoneField, Option<Timestamp>), String> {
    let (field, date) = value
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=DATE, got '{value}'"))?;
    let field = MilestoneField::from_label(field).ok_or_else(|| {
        let known: Vec<_> = MilestoneField::ALL.iter().map(|f| f.label()).collect();
        format!("unknown milestone '{field}' (expected one of: {})", known.join(", "))
    })?;
    let date = Timestamp::parse_flexible(date).map_err(|err| err.to_string())?;
    Ok((field, date))
}

impl UpdateArgs {
    fn changes(&self) -> VillageChanges {
        VillageChanges {
            village_name: self.name.clone(),
            municipal_zone: self.zone.clone(),
            current_phase: self.phase.clone(),
            status: self.status,
            hdm_jdm: self.hdm.clone().map(Some),
            atp_mtp: self.atp.clone().map(Some),
            arro_officer: self.arro.clone().map(Some),
            total_properties: self.properties,
            milestones: self.milestones.clone(),
        }
    }
}

pub(super) fn run(command: VillageCommand, files: &DataFiles) -> anyhow::Result<()> {
    let mut store = files.village_store();
    match command {
        VillageCommand::List {
            zone,
            phase,
            status,
        } => {
            let records: Vec<&VillageRecord> = store
                .snapshot()
                .iter()
                .filter(|record| {
                    zone.as_deref()
                        .is_none_or(|zone| record.municipal_zone == zone.trim())
                })
                .filter(|record| {
                    phase
                        .as_deref()
                        .is_none_or(|phase| record.current_phase == phase.trim())
                })
                .filter(|record| status.is_none_or(|status| record.status == status))
                .collect();
            print_json(&records)
        }
        VillageCommand::Show { village } => {
            let record = resolve(&mut store, &village)
                .with_context(|| format!("no village matches '{village}'"))?;
            let responsibility = responsibility_for(&record, store.catalog());
            print_json(&json!({
                "village": record,
                "responsibility": responsibility,
            }))
        }
        VillageCommand::Add(args) => {
            let id = store.add(NewVillage {
                village_name: args.name,
                municipal_zone: args.zone,
                current_phase: args.phase,
                status: Some(args.status),
                hdm_jdm: args.hdm,
                atp_mtp: args.atp,
                arro_officer: args.arro,
                total_properties: args.properties,
                ..NewVillage::default()
            })?;
            print_json(&store.get(id))
        }
        VillageCommand::Update(args) => {
            let changes = args.changes();
            if changes.is_empty() {
                bail!("nothing to update: pass at least one field");
            }
            let outcome = match resolve(&mut store, &args.village) {
                Some(record) => store.update(record.id, &changes)?,
                None => UpdateOutcome::NotFound,
            };
            match outcome {
                UpdateOutcome::Updated(id) => print_json(&store.get(id)),
                UpdateOutcome::NotFound => bail!("no village matches '{}'", args.village),
            }
        }
        VillageCommand::AuditDates => {
            let audit: Vec<_> = store
                .audit_milestones()
                .into_iter()
                .map(|entry| {
                    json!({
                        "id": entry.id,
                        "village_name": entry.village_name,
                        "issues": entry
                            .violations
                            .iter()
                            .map(describe_violation)
                            .collect::<Vec<_>>(),
                    })
                })
                .collect();
            print_json(&audit)
        }
    }
}

/// Id first, then the first record with that name.
fn resolve<P: RowPort>(store: &mut VillageStore<P>, key: &str) -> Option<VillageRecord> {
    key.parse::<VillageId>()
        .ok()
        .and_then(|id| store.get(id))
        .or_else(|| store.find_by_name(key))
}

pub(super) fn import(files: &DataFiles, file: &Path, strict: bool) -> anyhow::Result<()> {
    let rows = CsvFilePort::new(file)
        .read()
        .with_context(|| format!("cannot read {}", file.display()))?;
    let mode = if strict {
        ImportMode::Strict
    } else {
        ImportMode::Lenient
    };
    let mut store = files.village_store();
    let summary = match store.replace_all(&rows, mode) {
        Ok(summary) => summary,
        Err(sv_storage::StoreError::InvalidRows { issues }) => {
            bail!(
                "import rejected, nothing changed:\n  {}",
                diagnostic_lines(&issues).join("\n  ")
            );
        }
        Err(err) => return Err(err.into()),
    };
    print_json(&json!({
        "imported": summary.imported,
        "warnings": diagnostic_lines(&summary.warnings),
    }))
}
