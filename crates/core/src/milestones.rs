#![forbid(unsafe_code)]

//! Per-village milestone dates and the pipeline-order audit over them.
//!
//! Dates are recorded as a village moves through the pipeline. Nothing forces
//! them to be chronological on write; [`check_order`] reports the places where
//! a later milestone is dated before an earlier one so callers can decide
//! whether to reject (strict import) or merely surface it.

use crate::timestamp::Timestamp;
use serde::Serialize;
use serde::ser::SerializeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MilestoneField {
    Notification,
    Survey,
    DroneSurvey,
    Map1,
    GroundTruthing,
    Map2,
    PastingStart,
    Objections,
    Map3,
    CardsIssued,
}

impl MilestoneField {
    /// Pipeline order.
    pub const ALL: [MilestoneField; 10] = [
        MilestoneField::Notification,
        MilestoneField::Survey,
        MilestoneField::DroneSurvey,
        MilestoneField::Map1,
        MilestoneField::GroundTruthing,
        MilestoneField::Map2,
        MilestoneField::PastingStart,
        MilestoneField::Objections,
        MilestoneField::Map3,
        MilestoneField::CardsIssued,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Notification => "notification",
            Self::Survey => "survey",
            Self::DroneSurvey => "drone_survey",
            Self::Map1 => "map1",
            Self::GroundTruthing => "ground_truthing",
            Self::Map2 => "map2",
            Self::PastingStart => "pasting_start",
            Self::Objections => "objections",
            Self::Map3 => "map3",
            Self::CardsIssued => "cards_issued",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.label().eq_ignore_ascii_case(value))
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MilestoneDates([Option<Timestamp>; 10]);

impl MilestoneDates {
    pub fn get(&self, field: MilestoneField) -> Option<Timestamp> {
        self.0[field.index()]
    }

    pub fn set(&mut self, field: MilestoneField, value: Option<Timestamp>) {
        self.0[field.index()] = value;
    }

    pub fn with(mut self, field: MilestoneField, value: Timestamp) -> Self {
        self.set(field, Some(value));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (MilestoneField, Option<Timestamp>)> + '_ {
        MilestoneField::ALL
            .into_iter()
            .map(|field| (field, self.get(field)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

impl Serialize for MilestoneDates {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present = self.0.iter().filter(|value| value.is_some()).count();
        let mut map = serializer.serialize_map(Some(present))?;
        for (field, value) in self.iter() {
            if let Some(value) = value {
                map.serialize_entry(field.label(), &value)?;
            }
        }
        map.end()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OrderViolation {
    /// The latest-dated milestone that comes earlier in the pipeline.
    pub earlier: MilestoneField,
    pub earlier_date: Timestamp,
    pub later: MilestoneField,
    pub later_date: Timestamp,
}

/// Reports every milestone dated before some earlier-pipeline milestone.
/// Absent dates are skipped; equal dates are in order.
pub fn check_order(dates: &MilestoneDates) -> Vec<OrderViolation> {
    let mut violations = Vec::new();
    let mut latest: Option<(MilestoneField, Timestamp)> = None;
    for (field, value) in dates.iter() {
        let Some(value) = value else {
            continue;
        };
        match latest {
            Some((earlier, earlier_date)) if value < earlier_date => {
                violations.push(OrderViolation {
                    earlier,
                    earlier_date,
                    later: field,
                    later_date: value,
                });
            }
            _ => latest = Some((field, value)),
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(value: &str) -> Timestamp {
        value.parse().expect("timestamp")
    }

    #[test]
    fn chronological_dates_have_no_violations() {
        let dates = MilestoneDates::default()
            .with(MilestoneField::Notification, ts("2022-12-01"))
            .with(MilestoneField::Survey, ts("2023-01-15"))
            .with(MilestoneField::Map1, ts("2023-01-15"))
            .with(MilestoneField::CardsIssued, ts("2023-11-15"));
        assert!(check_order(&dates).is_empty());
    }

    #[test]
    fn backwards_date_is_reported_against_latest_earlier_milestone() {
        let dates = MilestoneDates::default()
            .with(MilestoneField::Notification, ts("2023-12-10"))
            .with(MilestoneField::Survey, ts("2023-01-25"))
            .with(MilestoneField::DroneSurvey, ts("2024-01-30"))
            .with(MilestoneField::Map1, ts("2024-01-01"));
        let violations = check_order(&dates);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].earlier, MilestoneField::Notification);
        assert_eq!(violations[0].later, MilestoneField::Survey);
        assert_eq!(violations[1].earlier, MilestoneField::DroneSurvey);
        assert_eq!(violations[1].later, MilestoneField::Map1);
    }

    #[test]
    fn labels_round_trip() {
        for field in MilestoneField::ALL {
            assert_eq!(MilestoneField::from_label(field.label()), Some(field));
        }
        assert_eq!(MilestoneField::from_label("MAP2"), Some(MilestoneField::Map2));
        assert_eq!(MilestoneField::from_label("harvest"), None);
    }

    #[test]
    fn serializes_present_dates_only() {
        let dates = MilestoneDates::default().with(MilestoneField::Map2, ts("2023-05-10"));
        let json = serde_json::to_string(&dates).unwrap();
        assert_eq!(json, r#"{"map2":"2023-05-10"}"#);
    }
}
