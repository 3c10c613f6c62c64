#![forbid(unsafe_code)]

use crate::ids::RemarkId;
use crate::timestamp::Timestamp;
use crate::village::{RequiredFieldError, StatusParseError, non_blank};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Selection value that forms use for "no filter / not applicable".
pub const ALL_SENTINEL: &str = "All";

pub const DEPARTMENTS: &[&str] = &[
    "DC Administration",
    "Survey of India",
    "Property Tax Dept (HDM/JDM)",
    "ATP/MTP",
    "ARRO",
    "Other",
];

pub const HELP_CATEGORIES: &[&str] = &[
    "General Query",
    "Technical Support",
    "Resource Requirement",
    "Coordination Needed",
    "Approval Required",
    "Other",
];

pub fn is_suggested_help_category(value: &str) -> bool {
    let value = value.trim();
    HELP_CATEGORIES.iter().any(|candidate| *candidate == value)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RemarkStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
    Referred,
}

impl RemarkStatus {
    pub const ALL: [RemarkStatus; 4] = [
        RemarkStatus::Pending,
        RemarkStatus::InProgress,
        RemarkStatus::Resolved,
        RemarkStatus::Referred,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Referred => "Referred",
        }
    }
}

impl fmt::Display for RemarkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemarkStatus {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| StatusParseError {
                kind: "remark status",
                value: trimmed.to_string(),
            })
    }
}

impl Serialize for RemarkStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// What an official fills in. Status, response and date are not part of a
/// submission; the log assigns them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewRemark {
    pub official_name: String,
    pub department: String,
    pub phase: Option<String>,
    pub village: Option<String>,
    pub remarks: String,
    pub help_required: String,
}

fn reference(value: Option<&str>) -> Option<String> {
    non_blank(value).filter(|value| !value.eq_ignore_ascii_case(ALL_SENTINEL))
}

impl NewRemark {
    pub fn into_entry(
        self,
        id: RemarkId,
        now: Timestamp,
    ) -> Result<RemarkEntry, RequiredFieldError> {
        let official_name =
            non_blank(Some(&self.official_name)).ok_or(RequiredFieldError("official name"))?;
        let department =
            non_blank(Some(&self.department)).ok_or(RequiredFieldError("department"))?;
        let remarks = non_blank(Some(&self.remarks)).ok_or(RequiredFieldError("remarks"))?;
        Ok(RemarkEntry {
            id,
            date: now,
            official_name,
            department,
            phase: reference(self.phase.as_deref()),
            village: reference(self.village.as_deref()),
            remarks,
            help_required: self.help_required.trim().to_string(),
            status: RemarkStatus::Pending,
            response: String::new(),
        })
    }
}

/// A submitted remark. Only `status` and `response` change after creation,
/// and only together through [`RemarkEntry::respond`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RemarkEntry {
    id: RemarkId,
    date: Timestamp,
    official_name: String,
    department: String,
    phase: Option<String>,
    village: Option<String>,
    remarks: String,
    help_required: String,
    status: RemarkStatus,
    response: String,
}

impl RemarkEntry {
    /// Rebuilds an entry read back from durable storage.
    pub fn restore(
        id: RemarkId,
        date: Timestamp,
        submission: NewRemark,
        status: RemarkStatus,
        response: String,
    ) -> Self {
        Self {
            id,
            date,
            official_name: submission.official_name.trim().to_string(),
            department: submission.department.trim().to_string(),
            phase: reference(submission.phase.as_deref()),
            village: reference(submission.village.as_deref()),
            remarks: submission.remarks,
            help_required: submission.help_required.trim().to_string(),
            status,
            response,
        }
    }

    pub fn id(&self) -> RemarkId {
        self.id
    }

    pub fn date(&self) -> Timestamp {
        self.date
    }

    pub fn official_name(&self) -> &str {
        &self.official_name
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn phase(&self) -> Option<&str> {
        self.phase.as_deref()
    }

    pub fn village(&self) -> Option<&str> {
        self.village.as_deref()
    }

    pub fn remarks(&self) -> &str {
        &self.remarks
    }

    pub fn help_required(&self) -> &str {
        &self.help_required
    }

    pub fn status(&self) -> RemarkStatus {
        self.status
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn respond(&mut self, status: RemarkStatus, response: impl Into<String>) {
        self.status = status;
        self.response = response.into();
    }

    /// One-line label used when picking a remark to respond to.
    pub fn summary_label(&self) -> String {
        format!(
            "{} - {} - {}",
            self.official_name,
            self.department,
            self.date.date()
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemarkFilter {
    pub department: Option<String>,
    pub status: Option<RemarkStatus>,
    pub help_required: Option<String>,
}

impl RemarkFilter {
    pub fn pending() -> Self {
        Self {
            status: Some(RemarkStatus::Pending),
            ..Self::default()
        }
    }

    /// Maps a form selection to a filter value: blank and "All" mean no filter.
    pub fn selection(value: Option<&str>) -> Option<String> {
        reference(value)
    }

    pub fn matches(&self, entry: &RemarkEntry) -> bool {
        if let Some(department) = &self.department {
            if entry.department != *department {
                return false;
            }
        }
        if let Some(status) = self.status {
            if entry.status != status {
                return false;
            }
        }
        if let Some(help) = &self.help_required {
            if entry.help_required != *help {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, entries: &'a [RemarkEntry]) -> Vec<&'a RemarkEntry> {
        entries.iter().filter(|entry| self.matches(entry)).collect()
    }
}
