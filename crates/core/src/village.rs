#![forbid(unsafe_code)]

use crate::ids::VillageId;
use crate::milestones::{MilestoneDates, MilestoneField};
use crate::timestamp::Timestamp;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct StatusParseError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0} is required")]
pub struct RequiredFieldError(pub &'static str);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VillageStatus {
    Completed,
    OnTrack,
    BehindSchedule,
}

impl VillageStatus {
    pub const ALL: [VillageStatus; 3] = [
        VillageStatus::Completed,
        VillageStatus::OnTrack,
        VillageStatus::BehindSchedule,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::OnTrack => "On Track",
            Self::BehindSchedule => "Behind Schedule",
        }
    }
}

impl fmt::Display for VillageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VillageStatus {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| StatusParseError {
                kind: "village status",
                value: trimmed.to_string(),
            })
    }
}

impl Serialize for VillageStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A functional responsibility lane with its own official per village.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    /// HDM/JDM officials.
    PropertyTax,
    /// ATP/MTP officials.
    Planning,
    /// ARRO officers.
    Revenue,
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VillageRecord {
    pub id: VillageId,
    pub village_name: String,
    pub municipal_zone: String,
    pub current_phase: String,
    pub status: VillageStatus,
    pub last_updated: Option<Timestamp>,
    pub hdm_jdm: Option<String>,
    pub atp_mtp: Option<String>,
    pub arro_officer: Option<String>,
    pub total_properties: u32,
    pub milestones: MilestoneDates,
}

impl VillageRecord {
    pub fn contact(&self, track: Track) -> Option<&str> {
        let value = match track {
            Track::PropertyTax => self.hdm_jdm.as_deref(),
            Track::Planning => self.atp_mtp.as_deref(),
            Track::Revenue => self.arro_officer.as_deref(),
        };
        value.map(str::trim).filter(|value| !value.is_empty())
    }

    /// Applies `changes` and stamps `last_updated`, even when `changes` is empty.
    pub fn apply(&mut self, changes: &VillageChanges, now: Timestamp) {
        if let Some(name) = non_blank(changes.village_name.as_deref()) {
            self.village_name = name;
        }
        if let Some(zone) = non_blank(changes.municipal_zone.as_deref()) {
            self.municipal_zone = zone;
        }
        if let Some(phase) = non_blank(changes.current_phase.as_deref()) {
            self.current_phase = phase;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(value) = &changes.hdm_jdm {
            self.hdm_jdm = non_blank(value.as_deref());
        }
        if let Some(value) = &changes.atp_mtp {
            self.atp_mtp = non_blank(value.as_deref());
        }
        if let Some(value) = &changes.arro_officer {
            self.arro_officer = non_blank(value.as_deref());
        }
        if let Some(total) = changes.total_properties {
            self.total_properties = total;
        }
        for (field, value) in &changes.milestones {
            self.milestones.set(*field, *value);
        }
        self.last_updated = Some(now);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewVillage {
    pub village_name: String,
    pub municipal_zone: String,
    pub current_phase: String,
    pub status: Option<VillageStatus>,
    pub hdm_jdm: Option<String>,
    pub atp_mtp: Option<String>,
    pub arro_officer: Option<String>,
    pub total_properties: u32,
    pub milestones: MilestoneDates,
}

impl NewVillage {
    pub fn into_record(
        self,
        id: VillageId,
        now: Timestamp,
    ) -> Result<VillageRecord, RequiredFieldError> {
        let village_name =
            non_blank(Some(&self.village_name)).ok_or(RequiredFieldError("village name"))?;
        let municipal_zone =
            non_blank(Some(&self.municipal_zone)).ok_or(RequiredFieldError("municipal zone"))?;
        let current_phase =
            non_blank(Some(&self.current_phase)).ok_or(RequiredFieldError("current phase"))?;
        let status = self.status.ok_or(RequiredFieldError("status"))?;
        Ok(VillageRecord {
            id,
            village_name,
            municipal_zone,
            current_phase,
            status,
            last_updated: Some(now),
            hdm_jdm: non_blank(self.hdm_jdm.as_deref()),
            atp_mtp: non_blank(self.atp_mtp.as_deref()),
            arro_officer: non_blank(self.arro_officer.as_deref()),
            total_properties: self.total_properties,
            milestones: self.milestones,
        })
    }
}

/// Field-by-field edit. `None` leaves a field alone; for the contact fields
/// `Some(None)` (or a blank string) clears the value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VillageChanges {
    pub village_name: Option<String>,
    pub municipal_zone: Option<String>,
    pub current_phase: Option<String>,
    pub status: Option<VillageStatus>,
    pub hdm_jdm: Option<Option<String>>,
    pub atp_mtp: Option<Option<String>>,
    pub arro_officer: Option<Option<String>>,
    pub total_properties: Option<u32>,
    pub milestones: Vec<(MilestoneField, Option<Timestamp>)>,
}

impl VillageChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(value: &str) -> Timestamp {
        value.parse().expect("timestamp")
    }

    fn record() -> VillageRecord {
        NewVillage {
            village_name: "Village A".to_string(),
            municipal_zone: "A".to_string(),
            current_phase: "Pasting".to_string(),
            status: Some(VillageStatus::OnTrack),
            hdm_jdm: Some("Mr. Sharma".to_string()),
            atp_mtp: Some("  ".to_string()),
            ..NewVillage::default()
        }
        .into_record(VillageId::from_seq(1), ts("2024-01-01"))
        .expect("record")
    }

    #[test]
    fn status_parses_display_names() {
        assert_eq!("On Track".parse::<VillageStatus>(), Ok(VillageStatus::OnTrack));
        assert_eq!(
            " behind schedule ".parse::<VillageStatus>(),
            Ok(VillageStatus::BehindSchedule)
        );
        let err = "Stalled".parse::<VillageStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown village status 'Stalled'");
    }

    #[test]
    fn new_village_requires_core_fields() {
        let err = NewVillage {
            village_name: " ".to_string(),
            ..NewVillage::default()
        }
        .into_record(VillageId::from_seq(1), ts("2024-01-01"))
        .unwrap_err();
        assert_eq!(err, RequiredFieldError("village name"));

        let err = NewVillage {
            village_name: "V".to_string(),
            municipal_zone: "A".to_string(),
            current_phase: "Pasting".to_string(),
            ..NewVillage::default()
        }
        .into_record(VillageId::from_seq(1), ts("2024-01-01"))
        .unwrap_err();
        assert_eq!(err, RequiredFieldError("status"));
    }

    #[test]
    fn blank_contacts_are_absent() {
        let record = record();
        assert_eq!(record.contact(Track::PropertyTax), Some("Mr. Sharma"));
        assert_eq!(record.atp_mtp, None);
        assert_eq!(record.contact(Track::Planning), None);
    }

    #[test]
    fn apply_changes_touches_only_named_fields() {
        let mut record = record();
        let changes = VillageChanges {
            status: Some(VillageStatus::BehindSchedule),
            hdm_jdm: Some(None),
            milestones: vec![(MilestoneField::PastingStart, Some(ts("2024-02-01")))],
            ..VillageChanges::default()
        };
        record.apply(&changes, ts("2024-03-01 09:00:00"));
        assert_eq!(record.status, VillageStatus::BehindSchedule);
        assert_eq!(record.current_phase, "Pasting");
        assert_eq!(record.hdm_jdm, None);
        assert_eq!(
            record.milestones.get(MilestoneField::PastingStart),
            Some(ts("2024-02-01"))
        );
        assert_eq!(record.last_updated, Some(ts("2024-03-01 09:00:00")));
    }

    #[test]
    fn empty_changes_still_refresh_last_updated() {
        let mut record = record();
        let changes = VillageChanges::default();
        assert!(changes.is_empty());
        record.apply(&changes, ts("2024-05-05"));
        assert_eq!(record.last_updated, Some(ts("2024-05-05")));
    }
}
