#![forbid(unsafe_code)]

use crate::table::{Table, next_seq};
use crate::villages::UpdateOutcome;
use crate::{Diagnostic, RowPort, StoreError};
use std::io::Write;
use sv_core::{Clock, NewRemark, RemarkEntry, RemarkFilter, RemarkId, RemarkStatus, SystemClock};

/// Append-only log of remarks from field officials. Entries are never
/// removed; only their status and response change.
#[derive(Debug)]
pub struct RemarkLog<P, C = SystemClock> {
    table: Table<RemarkEntry, P>,
    clock: C,
}

impl<P: RowPort> RemarkLog<P> {
    pub fn new(port: P) -> Self {
        Self::with_clock(port, SystemClock)
    }
}

impl<P: RowPort, C: Clock> RemarkLog<P, C> {
    pub fn with_clock(port: P, clock: C) -> Self {
        Self {
            table: Table::new(port),
            clock,
        }
    }

    pub fn port(&self) -> &P {
        self.table.port()
    }

    pub fn load(&mut self) -> &[RemarkEntry] {
        self.table.load()
    }

    pub fn snapshot(&mut self) -> &[RemarkEntry] {
        self.table.snapshot()
    }

    pub fn invalidate(&mut self) {
        self.table.invalidate();
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.table.diagnostics()
    }

    pub fn get(&mut self, id: RemarkId) -> Option<RemarkEntry> {
        self.snapshot().iter().find(|entry| entry.id() == id).cloned()
    }

    /// Records a submission dated now, pending, with an empty response.
    pub fn append(&mut self, submission: NewRemark) -> Result<RemarkId, StoreError> {
        let now = self.clock.now();
        let mut next = self.snapshot().to_vec();
        let id = RemarkId::from_seq(next_seq(&next));
        next.push(submission.into_entry(id, now)?);
        self.table.commit(&next)?;
        Ok(id)
    }

    pub fn set_status_and_response(
        &mut self,
        id: RemarkId,
        status: RemarkStatus,
        response: &str,
    ) -> Result<UpdateOutcome<RemarkId>, StoreError> {
        let mut next = self.snapshot().to_vec();
        let Some(entry) = next.iter_mut().find(|entry| entry.id() == id) else {
            tracing::debug!(%id, "response skipped: no such remark");
            return Ok(UpdateOutcome::NotFound);
        };
        entry.respond(status, response);
        let label = entry.summary_label();
        self.table.commit(&next)?;
        tracing::info!(%id, %status, remark = %label, "remark answered");
        Ok(UpdateOutcome::Updated(id))
    }

    pub fn filtered(&mut self, filter: &RemarkFilter) -> Vec<RemarkEntry> {
        filter
            .apply(self.snapshot())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Remarks still waiting on a response, oldest first.
    pub fn pending(&mut self) -> Vec<RemarkEntry> {
        self.filtered(&RemarkFilter::pending())
    }

    pub fn persist(&mut self) -> Result<(), StoreError> {
        self.table.persist()
    }

    pub fn export<W: Write>(&mut self, writer: W) -> Result<W, StoreError> {
        self.table.export(writer)
    }
}
