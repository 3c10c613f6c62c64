#![forbid(unsafe_code)]

use crate::schema::{CURRENT_PHASE, VILLAGE_REQUIRED};
use crate::table::{Table, decode_rows, next_seq};
use crate::{Diagnostic, RowPort, RowSet, StoreError};
use serde::Serialize;
use std::io::Write;
use sv_core::milestones::check_order;
use sv_core::{
    Clock, NewVillage, OrderViolation, PhaseCatalog, SystemClock, VillageChanges, VillageId,
    VillageRecord,
};

/// Result of a keyed update. A missing key is not an error: nothing is
/// written and the caller decides whether that matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome<Id> {
    Updated(Id),
    NotFound,
}

impl<Id> UpdateOutcome<Id> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImportMode {
    /// Required columns present and every row representable.
    #[default]
    Lenient,
    /// Also rejects non-catalog phases, unreadable dates and milestones dated
    /// out of pipeline order.
    Strict,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Cells that were accepted but dropped to empty (lenient mode only).
    pub warnings: Vec<Diagnostic>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MilestoneAudit {
    pub id: VillageId,
    pub village_name: String,
    pub violations: Vec<OrderViolation>,
}

/// Village records behind a persistence port.
#[derive(Debug)]
pub struct VillageStore<P, C = SystemClock> {
    table: Table<VillageRecord, P>,
    catalog: PhaseCatalog,
    clock: C,
}

impl<P: RowPort> VillageStore<P> {
    pub fn new(port: P) -> Self {
        Self::with_clock(port, SystemClock)
    }
}

impl<P: RowPort, C: Clock> VillageStore<P, C> {
    pub fn with_clock(port: P, clock: C) -> Self {
        Self {
            table: Table::new(port),
            catalog: PhaseCatalog::svamitva(),
            clock,
        }
    }

    pub fn catalog(&self) -> &PhaseCatalog {
        &self.catalog
    }

    pub fn port(&self) -> &P {
        self.table.port()
    }

    /// Re-reads durable state. Never fails; see [`VillageStore::diagnostics`].
    pub fn load(&mut self) -> &[VillageRecord] {
        self.table.load()
    }

    /// Cached records, loading them first if needed.
    pub fn snapshot(&mut self) -> &[VillageRecord] {
        self.table.snapshot()
    }

    pub fn invalidate(&mut self) {
        self.table.invalidate();
    }

    /// Problems found by the last load.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.table.diagnostics()
    }

    pub fn get(&mut self, id: VillageId) -> Option<VillageRecord> {
        self.snapshot().iter().find(|record| record.id == id).cloned()
    }

    /// First record whose name matches. Names are not unique.
    pub fn find_by_name(&mut self, village_name: &str) -> Option<VillageRecord> {
        let name = village_name.trim();
        self.snapshot()
            .iter()
            .find(|record| record.village_name == name)
            .cloned()
    }

    /// Appends a record stamped with the current time. Duplicate names are
    /// accepted.
    pub fn add(&mut self, village: NewVillage) -> Result<VillageId, StoreError> {
        let now = self.clock.now();
        let mut next = self.snapshot().to_vec();
        let id = VillageId::from_seq(next_seq(&next));
        next.push(village.into_record(id, now)?);
        self.table.commit(&next)?;
        Ok(id)
    }

    pub fn update(
        &mut self,
        id: VillageId,
        changes: &VillageChanges,
    ) -> Result<UpdateOutcome<VillageId>, StoreError> {
        let now = self.clock.now();
        let mut next = self.snapshot().to_vec();
        let Some(record) = next.iter_mut().find(|record| record.id == id) else {
            tracing::debug!(%id, "update skipped: no such village");
            return Ok(UpdateOutcome::NotFound);
        };
        record.apply(changes, now);
        self.table.commit(&next)?;
        Ok(UpdateOutcome::Updated(id))
    }

    /// Updates the first record with this name.
    pub fn update_by_name(
        &mut self,
        village_name: &str,
        changes: &VillageChanges,
    ) -> Result<UpdateOutcome<VillageId>, StoreError> {
        match self.find_by_name(village_name) {
            Some(record) => self.update(record.id, changes),
            None => {
                tracing::debug!(village_name, "update skipped: no such village");
                Ok(UpdateOutcome::NotFound)
            }
        }
    }

    /// Replaces the whole collection with `rows`, or nothing at all.
    ///
    /// Ids are re-issued in row order. Rows without `Last_Updated` are stamped
    /// with the current time. Columns outside the village schema are dropped.
    /// Durable rows the last load could not decode are replaced as well.
    pub fn replace_all(
        &mut self,
        rows: &RowSet,
        mode: ImportMode,
    ) -> Result<ImportSummary, StoreError> {
        let missing = rows.missing_columns(VILLAGE_REQUIRED);
        if !missing.is_empty() {
            tracing::warn!(?missing, "bulk import rejected");
            return Err(StoreError::Schema { missing });
        }

        let decoded = decode_rows::<VillageRecord>(rows, 1);
        let mut issues = decoded.rejected;
        let mut warnings = decoded.warnings;
        let mut records = decoded.records;

        if mode == ImportMode::Strict && issues.is_empty() {
            issues.append(&mut warnings);
            for (index, record) in records.iter().enumerate() {
                issues.extend(self.strict_issues(index + 1, record));
            }
            issues.sort_by_key(|issue| issue.row);
        }
        if !issues.is_empty() {
            tracing::warn!(rejected = issues.len(), "bulk import rejected");
            return Err(StoreError::InvalidRows { issues });
        }

        let now = self.clock.now();
        for record in &mut records {
            record.last_updated.get_or_insert(now);
        }
        self.table.replace(&records)?;
        tracing::info!(imported = records.len(), ?mode, "bulk import applied");
        Ok(ImportSummary {
            imported: records.len(),
            warnings,
        })
    }

    fn strict_issues(&self, row: usize, record: &VillageRecord) -> Vec<Diagnostic> {
        let mut issues = Vec::new();
        if !self.catalog.is_canonical(&record.current_phase) {
            issues.push(Diagnostic::cell(
                row,
                CURRENT_PHASE,
                format!("'{}' is not a pipeline phase", record.current_phase),
            ));
        }
        for violation in check_order(&record.milestones) {
            issues.push(Diagnostic::row(row, describe_violation(&violation)));
        }
        issues
    }

    /// Writes the current snapshot back through the port.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        self.table.persist()
    }

    /// Current records as delimited text in schema column order.
    pub fn export<W: Write>(&mut self, writer: W) -> Result<W, StoreError> {
        self.table.export(writer)
    }

    /// Villages whose milestone dates run backwards in pipeline order.
    pub fn audit_milestones(&mut self) -> Vec<MilestoneAudit> {
        self.snapshot()
            .iter()
            .filter_map(|record| {
                let violations = check_order(&record.milestones);
                (!violations.is_empty()).then(|| MilestoneAudit {
                    id: record.id,
                    village_name: record.village_name.clone(),
                    violations,
                })
            })
            .collect()
    }
}

pub fn describe_violation(violation: &OrderViolation) -> String {
    format!(
        "{} date {} precedes {} date {}",
        violation.later.label(),
        violation.later_date,
        violation.earlier.label(),
        violation.earlier_date
    )
}
