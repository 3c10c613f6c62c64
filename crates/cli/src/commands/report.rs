#![forbid(unsafe_code)]

use super::{diagnostic_lines, print_json};
use serde_json::json;
use sv_core::aggregate::{
    MatrixScope, contact_directory, dashboard_metrics, phase_distribution, programme_progress,
    responsibility_matrix, status_distribution, zone_distribution, zone_status_crosstab,
};
use sv_storage::{DataFiles, load_responsibilities};

pub(super) fn overview(files: &DataFiles) -> anyhow::Result<()> {
    let mut store = files.village_store();
    let records = store.load().to_vec();
    let catalog = store.catalog();

    let statuses: serde_json::Map<String, serde_json::Value> = status_distribution(&records)
        .into_iter()
        .map(|(status, count)| (status.as_str().to_string(), json!(count)))
        .collect();

    print_json(&json!({
        "metrics": dashboard_metrics(&records, catalog),
        "phases": phase_distribution(&records, catalog),
        "zones": zone_distribution(&records),
        "statuses": statuses,
        "zone_status": zone_status_crosstab(&records),
        "programme": programme_progress(catalog),
        "diagnostics": diagnostic_lines(store.diagnostics()),
    }))
}

pub(super) fn contacts(files: &DataFiles, all_phases: bool) -> anyhow::Result<()> {
    let mut store = files.village_store();
    let records = store.load().to_vec();
    let (reference, reference_issues) = load_responsibilities(&files.responsibility_port());

    let scope = if all_phases {
        MatrixScope::AllPhases
    } else {
        MatrixScope::FieldWork
    };
    let mut diagnostics = diagnostic_lines(store.diagnostics());
    diagnostics.extend(diagnostic_lines(&reference_issues));

    print_json(&json!({
        "zones": contact_directory(&records),
        "responsibility": responsibility_matrix(store.catalog(), &reference, scope),
        "diagnostics": diagnostics,
    }))
}
