#![forbid(unsafe_code)]

//! First-run sample data: fifteen villages across four zones, the phase
//! responsibility table and an empty remarks file.

use crate::responsibility::encode_responsibilities;
use crate::schema::{REMARK_COLUMNS, VILLAGE_COLUMNS};
use crate::{CsvFilePort, DataFiles, RowPort, RowSet, StoreError};
use std::path::{Path, PathBuf};
use sv_core::{PhaseCatalog, ResponsibilityEntry};

#[rustfmt::skip]
const SAMPLE_VILLAGES: [[&str; 19]; 15] = [
    ["Village A", "A", "Card Issuance", "Completed", "2024-01-15", "Mr. Sharma", "Mr. Verma", "Mr. Joshi", "250",
     "2023-01-15", "2022-12-01", "2023-01-20", "2023-02-15", "2023-03-01", "2023-04-01", "2023-06-01", "2023-09-01", "2023-10-01", "2023-11-15"],
    ["Village B", "A", "Map 3", "On Track", "2024-01-10", "Mr. Sharma", "Mr. Verma", "Mr. Joshi", "180",
     "2023-02-20", "2023-01-15", "2023-02-25", "2023-03-20", "2023-04-05", "2023-05-10", "", "", "", ""],
    ["Village C", "B", "Objections Hearing", "On Track", "2024-01-08", "Mr. Kumar", "Ms. Reddy", "Mr. Rao", "320",
     "2023-03-10", "2023-02-20", "2023-03-15", "2023-04-15", "2023-05-01", "", "", "", "", ""],
    ["Village D", "B", "Pasting", "Behind Schedule", "2024-01-05", "Mr. Kumar", "Ms. Reddy", "Mr. Rao", "150",
     "2023-04-05", "2023-03-10", "2023-04-10", "2023-05-10", "2023-05-28", "", "", "", "", ""],
    ["Village E", "B", "Map 2 awaited", "On Track", "2024-01-12", "Mr. Kumar", "Ms. Reddy", "Mr. Rao", "280",
     "2023-05-12", "2023-04-05", "2023-05-18", "2023-06-18", "2023-07-05", "", "", "", "", ""],
    ["Village F", "C", "Ground Truthing Pending", "On Track", "2024-01-07", "Ms. Patel", "Mr. Gupta", "Ms. Desai", "200",
     "2023-06-18", "2023-05-12", "2023-06-23", "2023-07-25", "", "", "", "", "", ""],
    ["Village G", "C", "Map 1 awaited", "Behind Schedule", "2024-01-03", "Ms. Patel", "Mr. Gupta", "Ms. Desai", "170",
     "2023-07-22", "2023-06-18", "2023-07-27", "", "", "", "", "", "", ""],
    ["Village H", "C", "Drone Survey Pending", "On Track", "2024-01-09", "Ms. Patel", "Mr. Gupta", "Ms. Desai", "220",
     "2023-08-15", "2023-07-22", "2023-08-20", "2023-09-15", "", "", "", "", "", ""],
    ["Village I", "D", "Notification", "On Track", "2024-01-11", "Mr. Singh", "Ms. Iyer", "Mr. Nair", "190",
     "2023-09-08", "2023-08-15", "2023-09-13", "", "", "", "", "", "", ""],
    ["Village J", "D", "Drone Survey Pending", "On Track", "2024-01-06", "Mr. Singh", "Ms. Iyer", "Mr. Nair", "240",
     "2023-10-20", "2023-09-08", "2023-10-25", "2023-11-20", "", "", "", "", "", ""],
    ["Village K", "A", "Map 3", "On Track", "2024-01-13", "Mr. Sharma", "Mr. Verma", "Mr. Joshi", "260",
     "2023-11-05", "2023-10-20", "2023-11-10", "2023-12-05", "", "", "", "", "", ""],
    ["Village L", "B", "Pasting", "Behind Schedule", "2024-01-04", "Mr. Kumar", "Ms. Reddy", "Mr. Rao", "210",
     "2023-12-10", "2023-11-05", "2023-12-15", "", "", "", "", "", "", ""],
    ["Village M", "C", "Map 2 awaited", "On Track", "2024-01-14", "Ms. Patel", "Mr. Gupta", "Ms. Desai", "230",
     "2023-01-25", "2023-12-10", "2023-01-30", "", "", "", "", "", "", ""],
    ["Village N", "D", "Ground Truthing Pending", "On Track", "2024-01-02", "Mr. Singh", "Ms. Iyer", "Mr. Nair", "160",
     "2023-02-28", "2022-12-15", "2023-03-05", "", "", "", "", "", "", ""],
    ["Village O", "A", "Objections Hearing", "On Track", "2024-01-01", "Mr. Sharma", "Mr. Verma", "Mr. Joshi", "270",
     "2023-03-15", "2023-01-20", "2023-03-20", "", "", "", "", "", "", ""],
];

/// Contact addresses per catalog phase, in pipeline order.
const CONTACT_INFO: [&str; 9] = [
    "dc.ludhiana@punjab.gov.in",
    "soi.ludhiana@nic.in",
    "soi.ludhiana@nic.in",
    "proptax.ludhiana@punjab.gov.in",
    "soi.ludhiana@nic.in",
    "atp.ludhiana@punjab.gov.in",
    "arro.ludhiana@punjab.gov.in",
    "soi.ludhiana@nic.in",
    "dc.ludhiana@punjab.gov.in",
];

pub fn sample_villages() -> RowSet {
    let mut set = RowSet::with_columns(VILLAGE_COLUMNS);
    for row in SAMPLE_VILLAGES {
        set.push(row.iter().map(|cell| cell.to_string()).collect());
    }
    set
}

pub fn sample_responsibilities() -> Vec<ResponsibilityEntry> {
    PhaseCatalog::svamitva()
        .phases()
        .iter()
        .zip(CONTACT_INFO)
        .map(|(info, contact_info)| ResponsibilityEntry {
            phase: info.name.clone(),
            responsible_department: info.responsible_department.clone(),
            primary_contact: info.primary_contact.clone(),
            contact_info: contact_info.to_string(),
        })
        .collect()
}

fn write_if_missing(
    path: &Path,
    rows: RowSet,
    created: &mut Vec<PathBuf>,
) -> Result<(), StoreError> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    CsvFilePort::new(path).write(&rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "sample data written");
    created.push(path.to_path_buf());
    Ok(())
}

/// Writes sample contents for every data file that does not exist yet.
/// Existing files are never touched. Returns the files it created.
pub fn initialize_data_files(files: &DataFiles) -> Result<Vec<PathBuf>, StoreError> {
    let mut created = Vec::new();
    write_if_missing(&files.villages, sample_villages(), &mut created)?;
    write_if_missing(
        &files.responsibility,
        encode_responsibilities(&sample_responsibilities()),
        &mut created,
    )?;
    write_if_missing(&files.remarks, RowSet::with_columns(REMARK_COLUMNS), &mut created)?;
    Ok(created)
}
