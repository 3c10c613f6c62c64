#![forbid(unsafe_code)]

use crate::village::Track;
use serde::Serialize;
use std::collections::BTreeSet;

pub const NOTIFICATION: &str = "Notification";
pub const DRONE_SURVEY_PENDING: &str = "Drone Survey Pending";
pub const MAP1_AWAITED: &str = "Map 1 awaited";
pub const GROUND_TRUTHING_PENDING: &str = "Ground Truthing Pending";
pub const MAP2_AWAITED: &str = "Map 2 awaited";
pub const PASTING: &str = "Pasting";
pub const OBJECTIONS_HEARING: &str = "Objections Hearing";
pub const MAP3: &str = "Map 3";
pub const CARD_ISSUANCE: &str = "Card Issuance";

struct PhaseSeed {
    name: &'static str,
    completed: u32,
    target: u32,
    avg_duration_days: u32,
    department: &'static str,
    contact: &'static str,
    track: Option<Track>,
}

const SVAMITVA_PHASES: &[PhaseSeed] = &[
    PhaseSeed {
        name: NOTIFICATION,
        completed: 15,
        target: 15,
        avg_duration_days: 0,
        department: "DC Administration",
        contact: "DC Office",
        track: None,
    },
    PhaseSeed {
        name: DRONE_SURVEY_PENDING,
        completed: 15,
        target: 15,
        avg_duration_days: 25,
        department: "Survey of India",
        contact: "SOI Regional Office",
        track: None,
    },
    PhaseSeed {
        name: MAP1_AWAITED,
        completed: 13,
        target: 15,
        avg_duration_days: 15,
        department: "Survey of India",
        contact: "SOI Regional Office",
        track: None,
    },
    PhaseSeed {
        name: GROUND_TRUTHING_PENDING,
        completed: 11,
        target: 15,
        avg_duration_days: 30,
        department: "Property Tax Dept (HDM/JDM)",
        contact: "Property Tax HOD",
        track: Some(Track::PropertyTax),
    },
    PhaseSeed {
        name: MAP2_AWAITED,
        completed: 9,
        target: 15,
        avg_duration_days: 20,
        department: "Survey of India",
        contact: "SOI Regional Office",
        track: None,
    },
    PhaseSeed {
        name: PASTING,
        completed: 7,
        target: 15,
        avg_duration_days: 90,
        department: "ATP/MTP",
        contact: "ATP Coordinator",
        track: Some(Track::Planning),
    },
    PhaseSeed {
        name: OBJECTIONS_HEARING,
        completed: 5,
        target: 15,
        avg_duration_days: 45,
        department: "ARRO",
        contact: "ARRO Office",
        track: Some(Track::Revenue),
    },
    PhaseSeed {
        name: MAP3,
        completed: 3,
        target: 15,
        avg_duration_days: 30,
        department: "Survey of India",
        contact: "SOI Regional Office",
        track: None,
    },
    PhaseSeed {
        name: CARD_ISSUANCE,
        completed: 1,
        target: 15,
        avg_duration_days: 45,
        department: "DC Administration",
        contact: "DC Office",
        track: None,
    },
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PhaseInfo {
    pub name: String,
    pub target_count: u32,
    pub completed_count: u32,
    pub avg_duration_days: u32,
    pub responsible_department: String,
    pub primary_contact: String,
    /// Village-level official lane that owns this phase, if any.
    pub track: Option<Track>,
}

/// One row of the responsibility reference table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResponsibilityEntry {
    pub phase: String,
    pub responsible_department: String,
    pub primary_contact: String,
    pub contact_info: String,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("phase catalog must not be empty")]
    Empty,
    #[error("phase name must not be blank")]
    BlankName,
    #[error("duplicate phase '{0}'")]
    DuplicatePhase(String),
}

/// The fixed, ordered pipeline. Position in `phases` is pipeline order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhaseCatalog {
    phases: Vec<PhaseInfo>,
}

impl PhaseCatalog {
    pub fn new(phases: Vec<PhaseInfo>) -> Result<Self, CatalogError> {
        if phases.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = BTreeSet::new();
        for phase in &phases {
            let name = phase.name.trim();
            if name.is_empty() {
                return Err(CatalogError::BlankName);
            }
            if !seen.insert(name.to_string()) {
                return Err(CatalogError::DuplicatePhase(name.to_string()));
            }
        }
        Ok(Self { phases })
    }

    pub fn svamitva() -> Self {
        let phases = SVAMITVA_PHASES
            .iter()
            .map(|seed| PhaseInfo {
                name: seed.name.to_string(),
                target_count: seed.target,
                completed_count: seed.completed,
                avg_duration_days: seed.avg_duration_days,
                responsible_department: seed.department.to_string(),
                primary_contact: seed.contact.to_string(),
                track: seed.track,
            })
            .collect();
        Self { phases }
    }

    pub fn phases(&self) -> &[PhaseInfo] {
        &self.phases
    }

    pub fn ordered_phases(&self) -> impl Iterator<Item = &str> + '_ {
        self.phases.iter().map(|phase| phase.name.as_str())
    }

    pub fn lookup(&self, name: &str) -> Option<&PhaseInfo> {
        self.position(name).map(|index| &self.phases[index])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.phases.iter().position(|phase| phase.name == name)
    }

    pub fn is_canonical(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Expected days from entering `name` until the end of the pipeline.
    pub fn remaining_days(&self, name: &str) -> Option<u32> {
        let start = self.position(name)?;
        Some(
            self.phases[start..]
                .iter()
                .map(|phase| phase.avg_duration_days)
                .sum(),
        )
    }
}

impl Default for PhaseCatalog {
    fn default() -> Self {
        Self::svamitva()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svamitva_pipeline_order_is_fixed() {
        let catalog = PhaseCatalog::svamitva();
        let names: Vec<&str> = catalog.ordered_phases().collect();
        assert_eq!(
            names,
            vec![
                NOTIFICATION,
                DRONE_SURVEY_PENDING,
                MAP1_AWAITED,
                GROUND_TRUTHING_PENDING,
                MAP2_AWAITED,
                PASTING,
                OBJECTIONS_HEARING,
                MAP3,
                CARD_ISSUANCE,
            ]
        );
    }

    #[test]
    fn lookup_unknown_phase_is_none() {
        let catalog = PhaseCatalog::svamitva();
        assert!(catalog.lookup("Village Feast").is_none());
        let pasting = catalog.lookup(" Pasting ").expect("pasting");
        assert_eq!(pasting.responsible_department, "ATP/MTP");
        assert_eq!(pasting.primary_contact, "ATP Coordinator");
        assert_eq!(pasting.avg_duration_days, 90);
        assert_eq!(pasting.track, Some(Track::Planning));
    }

    #[test]
    fn remaining_days_sums_from_current_phase() {
        let catalog = PhaseCatalog::svamitva();
        assert_eq!(catalog.remaining_days(CARD_ISSUANCE), Some(45));
        assert_eq!(catalog.remaining_days(MAP3), Some(75));
        assert_eq!(catalog.remaining_days(NOTIFICATION), Some(300));
        assert_eq!(catalog.remaining_days("unknown"), None);
    }

    #[test]
    fn custom_catalog_rejects_duplicates() {
        let phase = |name: &str| PhaseInfo {
            name: name.to_string(),
            target_count: 0,
            completed_count: 0,
            avg_duration_days: 0,
            responsible_department: String::new(),
            primary_contact: String::new(),
            track: None,
        };
        assert_eq!(PhaseCatalog::new(Vec::new()), Err(CatalogError::Empty));
        assert_eq!(
            PhaseCatalog::new(vec![phase("A"), phase(" ")]),
            Err(CatalogError::BlankName)
        );
        assert_eq!(
            PhaseCatalog::new(vec![phase("A"), phase("A")]),
            Err(CatalogError::DuplicatePhase("A".to_string()))
        );
        assert!(PhaseCatalog::new(vec![phase("A"), phase("B")]).is_ok());
    }
}
