#![forbid(unsafe_code)]

mod codec;
mod csv_port;
mod error;
mod port;
mod remarks;
mod responsibility;
mod rows;
pub mod schema;
pub mod seed;
mod table;
mod villages;

pub use csv_port::CsvFilePort;
pub use error::{Diagnostic, StoreError};
pub use port::{MemoryPort, RowPort};
pub use remarks::RemarkLog;
pub use responsibility::{encode_responsibilities, load_responsibilities};
pub use rows::{RowSet, RowView};
pub use seed::initialize_data_files;
pub use villages::{
    ImportMode, ImportSummary, MilestoneAudit, UpdateOutcome, VillageStore, describe_violation,
};

use std::path::{Path, PathBuf};

pub const VILLAGES_FILE: &str = "villages_data.csv";
pub const REMARKS_FILE: &str = "remarks_data.csv";
pub const RESPONSIBILITY_FILE: &str = "responsibility_data.csv";

/// Locations of the three data files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataFiles {
    pub villages: PathBuf,
    pub remarks: PathBuf,
    pub responsibility: PathBuf,
}

impl DataFiles {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            villages: dir.join(VILLAGES_FILE),
            remarks: dir.join(REMARKS_FILE),
            responsibility: dir.join(RESPONSIBILITY_FILE),
        }
    }

    pub fn village_store(&self) -> VillageStore<CsvFilePort> {
        VillageStore::new(CsvFilePort::new(&self.villages))
    }

    pub fn remark_log(&self) -> RemarkLog<CsvFilePort> {
        RemarkLog::new(CsvFilePort::new(&self.remarks))
    }

    pub fn responsibility_port(&self) -> CsvFilePort {
        CsvFilePort::new(&self.responsibility)
    }
}
