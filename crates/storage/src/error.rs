#![forbid(unsafe_code)]

use std::fmt;
use std::path::PathBuf;
use sv_core::RequiredFieldError;

/// A problem attached to a data file or one of its rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based data row (the header is not counted).
    pub row: Option<usize>,
    pub column: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn file(message: impl Into<String>) -> Self {
        Self {
            row: None,
            column: None,
            message: message.into(),
        }
    }

    pub fn cell(row: usize, column: &str, message: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            column: Some(column.to_string()),
            message: message.into(),
        }
    }

    pub fn row(row: usize, message: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            column: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(row) = self.row {
            write!(f, "row {row}: ")?;
        }
        if let Some(column) = &self.column {
            write!(f, "{column}: ")?;
        }
        f.write_str(&self.message)
    }
}

fn first_issue(issues: &[Diagnostic]) -> String {
    issues.first().map(ToString::to_string).unwrap_or_default()
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("{} does not exist", .path.display())]
    Missing { path: PathBuf },
    #[error("missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("{} row(s) rejected; first: {}", .issues.len(), first_issue(.issues))]
    InvalidRows { issues: Vec<Diagnostic> },
    #[error(
        "cannot save {}: the file is open in another program (spreadsheet, editor or another session). Close it there and retry",
        .path.display()
    )]
    Locked {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "refusing to save {origin}: it could not be read ({reason}). Repair or restore the file, then retry"
    )]
    Unreadable { origin: String, reason: String },
    #[error(transparent)]
    MissingField(#[from] RequiredFieldError),
}

impl StoreError {
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked { .. })
    }
}
