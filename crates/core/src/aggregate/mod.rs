#![forbid(unsafe_code)]

//! Read-only summaries over a village snapshot.
//!
//! Every function here takes borrowed snapshots and returns owned summaries.
//! An empty snapshot is valid input and yields empty (or all-zero) output.

use crate::catalog::{
    CARD_ISSUANCE, GROUND_TRUTHING_PENDING, MAP1_AWAITED, MAP2_AWAITED, NOTIFICATION, PhaseCatalog,
    ResponsibilityEntry,
};
use crate::timestamp::Timestamp;
use crate::village::{Track, VillageRecord, VillageStatus};
use serde::Serialize;
use serde::ser::SerializeMap;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PhaseCount {
    pub phase: String,
    pub count: usize,
    /// `false` for legacy/free-text phases outside the catalog.
    pub canonical: bool,
}

/// Counts per phase in catalog order. Phases outside the catalog follow all
/// canonical phases in first-seen order. Phases with no village are omitted.
pub fn phase_distribution(records: &[VillageRecord], catalog: &PhaseCatalog) -> Vec<PhaseCount> {
    let mut canonical = vec![0usize; catalog.phases().len()];
    let mut unknown: Vec<PhaseCount> = Vec::new();

    for record in records {
        let phase = record.current_phase.trim();
        match catalog.position(phase) {
            Some(index) => canonical[index] += 1,
            None => match unknown.iter_mut().find(|entry| entry.phase == phase) {
                Some(entry) => entry.count += 1,
                None => unknown.push(PhaseCount {
                    phase: phase.to_string(),
                    count: 1,
                    canonical: false,
                }),
            },
        }
    }

    catalog
        .ordered_phases()
        .zip(canonical)
        .filter(|(_, count)| *count > 0)
        .map(|(phase, count)| PhaseCount {
            phase: phase.to_string(),
            count,
            canonical: true,
        })
        .chain(unknown)
        .collect()
}

pub fn zone_distribution(records: &[VillageRecord]) -> BTreeMap<String, usize> {
    let mut out = BTreeMap::new();
    for record in records {
        *out.entry(record.municipal_zone.trim().to_string())
            .or_insert(0) += 1;
    }
    out
}

/// Statuses with no village are omitted.
pub fn status_distribution(records: &[VillageRecord]) -> BTreeMap<VillageStatus, usize> {
    let mut out = BTreeMap::new();
    for record in records {
        *out.entry(record.status).or_insert(0) += 1;
    }
    out
}

/// Per-zone counts for every status, zeros included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts([usize; 3]);

impl StatusCounts {
    fn slot(status: VillageStatus) -> usize {
        match status {
            VillageStatus::Completed => 0,
            VillageStatus::OnTrack => 1,
            VillageStatus::BehindSchedule => 2,
        }
    }

    pub fn get(&self, status: VillageStatus) -> usize {
        self.0[Self::slot(status)]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    fn bump(&mut self, status: VillageStatus) {
        self.0[Self::slot(status)] += 1;
    }
}

impl Serialize for StatusCounts {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(VillageStatus::ALL.len()))?;
        for status in VillageStatus::ALL {
            map.serialize_entry(status.as_str(), &self.get(status))?;
        }
        map.end()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Crosstab {
    rows: BTreeMap<String, StatusCounts>,
}

impl Crosstab {
    /// Zero for any zone or status without a matching village.
    pub fn get(&self, zone: &str, status: VillageStatus) -> usize {
        self.rows
            .get(zone.trim())
            .map(|row| row.get(status))
            .unwrap_or(0)
    }

    pub fn column_total(&self, status: VillageStatus) -> usize {
        self.rows.values().map(|row| row.get(status)).sum()
    }

    pub fn total(&self) -> usize {
        self.rows.values().map(StatusCounts::total).sum()
    }
}

pub fn zone_status_crosstab(records: &[VillageRecord]) -> Crosstab {
    let mut rows: BTreeMap<String, StatusCounts> = BTreeMap::new();
    for record in records {
        rows.entry(record.municipal_zone.trim().to_string())
            .or_default()
            .bump(record.status);
    }
    Crosstab { rows }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ZoneContacts {
    /// HDM/JDM officials.
    pub property_tax: Vec<String>,
    /// ATP/MTP officials.
    pub planning: Vec<String>,
}

impl ZoneContacts {
    pub fn is_empty(&self) -> bool {
        self.property_tax.is_empty() && self.planning.is_empty()
    }
}

fn push_distinct(list: &mut Vec<String>, value: Option<&str>) {
    if let Some(value) = value {
        if !list.iter().any(|existing| existing == value) {
            list.push(value.to_string());
        }
    }
}

/// Distinct non-blank contacts per zone and track, in first-seen order.
/// Blank zones and zones with no contact in any track are left out.
pub fn contact_directory(records: &[VillageRecord]) -> BTreeMap<String, ZoneContacts> {
    let mut out: BTreeMap<String, ZoneContacts> = BTreeMap::new();
    for record in records {
        let zone = record.municipal_zone.trim();
        if zone.is_empty() {
            continue;
        }
        let contacts = out.entry(zone.to_string()).or_default();
        push_distinct(&mut contacts.property_tax, record.contact(Track::PropertyTax));
        push_distinct(&mut contacts.planning, record.contact(Track::Planning));
    }
    out.retain(|_, contacts| !contacts.is_empty());
    out
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VillageResponsibility {
    pub phase: String,
    pub responsible_department: String,
    pub primary_contact: String,
    pub track: Option<Track>,
    /// The village's own official for the phase's track, when one is recorded.
    pub official: Option<String>,
    pub remaining_days: u32,
}

/// Who owns the village's current phase. `None` for phases outside the catalog.
pub fn responsibility_for(
    record: &VillageRecord,
    catalog: &PhaseCatalog,
) -> Option<VillageResponsibility> {
    let info = catalog.lookup(&record.current_phase)?;
    Some(VillageResponsibility {
        phase: info.name.clone(),
        responsible_department: info.responsible_department.clone(),
        primary_contact: info.primary_contact.clone(),
        track: info.track,
        official: info
            .track
            .and_then(|track| record.contact(track))
            .map(str::to_string),
        remaining_days: catalog.remaining_days(&info.name).unwrap_or(0),
    })
}

/// Which catalog phases the responsibility matrix lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatrixScope {
    #[default]
    AllPhases,
    /// Leaves out the administrative bookends, Notification and Card Issuance.
    FieldWork,
}

impl MatrixScope {
    fn includes(self, phase: &str) -> bool {
        match self {
            Self::AllPhases => true,
            Self::FieldWork => phase != NOTIFICATION && phase != CARD_ISSUANCE,
        }
    }
}

/// Catalog phases in pipeline order joined with the reference table.
/// Reference rows for unknown phases are appended in table order; a catalog
/// phase without a reference row falls back to the catalog's own contact.
pub fn responsibility_matrix(
    catalog: &PhaseCatalog,
    reference: &[ResponsibilityEntry],
    scope: MatrixScope,
) -> Vec<ResponsibilityEntry> {
    let mut out: Vec<ResponsibilityEntry> = catalog
        .phases()
        .iter()
        .filter(|info| scope.includes(&info.name))
        .map(|info| {
            reference
                .iter()
                .find(|entry| entry.phase.trim() == info.name)
                .cloned()
                .unwrap_or_else(|| ResponsibilityEntry {
                    phase: info.name.clone(),
                    responsible_department: info.responsible_department.clone(),
                    primary_contact: info.primary_contact.clone(),
                    contact_info: String::new(),
                })
        })
        .collect();
    for entry in reference {
        let phase = entry.phase.trim();
        if phase.is_empty() || catalog.is_canonical(phase) {
            continue;
        }
        if !out.iter().any(|existing| existing.phase.trim() == phase) {
            out.push(entry.clone());
        }
    }
    out
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    pub total_villages: usize,
    /// Villages whose current phase is at or past "Map 1 awaited".
    pub survey_completed: usize,
    pub map2_awaited: usize,
    pub ground_truthing_pending: usize,
    pub last_updated: Option<Timestamp>,
}

pub fn dashboard_metrics(records: &[VillageRecord], catalog: &PhaseCatalog) -> DashboardMetrics {
    let survey_threshold = catalog.position(MAP1_AWAITED);
    let mut metrics = DashboardMetrics {
        total_villages: records.len(),
        ..DashboardMetrics::default()
    };
    for record in records {
        let position = catalog.position(&record.current_phase);
        if let (Some(position), Some(threshold)) = (position, survey_threshold) {
            if position >= threshold {
                metrics.survey_completed += 1;
            }
        }
        let phase = record.current_phase.trim();
        if phase == MAP2_AWAITED {
            metrics.map2_awaited += 1;
        }
        if phase == GROUND_TRUTHING_PENDING {
            metrics.ground_truthing_pending += 1;
        }
        metrics.last_updated = metrics.last_updated.max(record.last_updated);
    }
    metrics
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PhaseProgress {
    pub phase: String,
    pub completed: u32,
    pub target: u32,
    pub percent: f64,
}

/// Programme-wide targets from the catalog. A zero target reports 0%.
pub fn programme_progress(catalog: &PhaseCatalog) -> Vec<PhaseProgress> {
    catalog
        .phases()
        .iter()
        .map(|info| PhaseProgress {
            phase: info.name.clone(),
            completed: info.completed_count,
            target: info.target_count,
            percent: if info.target_count == 0 {
                0.0
            } else {
                f64::from(info.completed_count) * 100.0 / f64::from(info.target_count)
            },
        })
        .collect()
}
