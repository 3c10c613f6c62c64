#![forbid(unsafe_code)]

use crate::codec::{RowCodec, encode_all};
use crate::{Diagnostic, RowPort, RowSet, StoreError};
use std::io::Write;

/// Rows decoded from one row set.
pub(crate) struct Decoded<T> {
    pub(crate) records: Vec<T>,
    /// Non-fatal problems on kept rows.
    pub(crate) warnings: Vec<Diagnostic>,
    /// One entry per row that could not be decoded.
    pub(crate) rejected: Vec<Diagnostic>,
    /// The undecodable rows themselves, in schema column order.
    pub(crate) held: Vec<HeldRow>,
}

/// A durable row left out of the snapshot. It is written back verbatim, ahead
/// of the record that followed it in the file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct HeldRow {
    /// Decoded records that preceded this row.
    before: usize,
    cells: Vec<String>,
}

/// Decodes every row, numbering kept records from `first_seq`.
pub(crate) fn decode_rows<T: RowCodec>(set: &RowSet, first_seq: u32) -> Decoded<T> {
    let mut decoded = Decoded {
        records: Vec::with_capacity(set.len()),
        warnings: Vec::new(),
        rejected: Vec::new(),
        held: Vec::new(),
    };
    let mut seq = first_seq;
    for row in set.rows() {
        match T::decode(&row, seq, &mut decoded.warnings) {
            Ok(record) => {
                decoded.records.push(record);
                seq += 1;
            }
            Err(issue) => {
                decoded.rejected.push(issue);
                decoded.held.push(HeldRow {
                    before: decoded.records.len(),
                    cells: T::COLUMNS
                        .iter()
                        .map(|column| row.get(column).to_string())
                        .collect(),
                });
            }
        }
    }
    decoded
}

/// Records and held rows interleaved back into file order.
fn encode_with_held<T: RowCodec>(records: &[T], held: &[HeldRow]) -> RowSet {
    let mut set = RowSet::with_columns(T::COLUMNS);
    let mut held = held.iter().peekable();
    for (index, record) in records.iter().enumerate() {
        while let Some(row) = held.next_if(|row| row.before <= index) {
            set.push(row.cells.clone());
        }
        set.push(record.encode());
    }
    for row in held {
        set.push(row.cells.clone());
    }
    set
}

pub(crate) fn next_seq<T: RowCodec>(records: &[T]) -> u32 {
    records.iter().map(RowCodec::seq).max().unwrap_or(0) + 1
}

/// What one read of the port produced.
struct Loaded<T> {
    records: Vec<T>,
    held: Vec<HeldRow>,
    /// Set when the file exists but could not be read as a whole.
    unreadable: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<T> Loaded<T> {
    fn unreadable(err: &StoreError) -> Self {
        Self {
            records: Vec::new(),
            held: Vec::new(),
            unreadable: Some(err.to_string()),
            diagnostics: vec![Diagnostic::file(err.to_string())],
        }
    }
}

/// A port plus the cached snapshot decoded from it.
///
/// Reads never fail: a missing or unreadable file yields an empty snapshot and
/// a diagnostic. Writes go through [`Table::commit`], which drops the snapshot
/// once the port has accepted the new rows. Rows that could not be decoded
/// ride along untouched, and an unreadable file is never written over.
#[derive(Debug)]
pub(crate) struct Table<T, P> {
    port: P,
    snapshot: Option<Vec<T>>,
    held: Vec<HeldRow>,
    unreadable: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<T: RowCodec, P: RowPort> Table<T, P> {
    pub(crate) fn new(port: P) -> Self {
        Self {
            port,
            snapshot: None,
            held: Vec::new(),
            unreadable: None,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn port(&self) -> &P {
        &self.port
    }

    pub(crate) fn load(&mut self) -> &[T] {
        let loaded = self.read();
        self.held = loaded.held;
        self.unreadable = loaded.unreadable;
        self.diagnostics = loaded.diagnostics;
        self.snapshot.insert(loaded.records).as_slice()
    }

    pub(crate) fn snapshot(&mut self) -> &[T] {
        if self.snapshot.is_none() {
            return self.load();
        }
        self.snapshot.as_deref().unwrap_or_default()
    }

    pub(crate) fn invalidate(&mut self) {
        self.held.clear();
        self.unreadable = None;
        if self.snapshot.take().is_some() {
            tracing::debug!(source = %self.port.describe(), "{} snapshot invalidated", T::KIND);
        }
    }

    pub(crate) fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Makes `next` the durable collection, with held rows back in place.
    /// On failure the snapshot and the durable rows are both left as they were.
    pub(crate) fn commit(&mut self, next: &[T]) -> Result<(), StoreError> {
        if self.snapshot.is_none() {
            self.load();
        }
        if let Some(reason) = &self.unreadable {
            return Err(StoreError::Unreadable {
                origin: self.port.describe(),
                reason: reason.clone(),
            });
        }
        let rows = encode_with_held(next, &self.held);
        self.write(&rows, next.len())
    }

    /// Makes `next` the whole durable collection. Held rows and an unreadable
    /// file are both replaced.
    pub(crate) fn replace(&mut self, next: &[T]) -> Result<(), StoreError> {
        self.write(&encode_all(next), next.len())
    }

    fn write(&mut self, rows: &RowSet, records: usize) -> Result<(), StoreError> {
        self.port.write(rows)?;
        tracing::info!(
            dest = %self.port.describe(),
            rows = rows.len(),
            records,
            "{} rows written",
            T::KIND
        );
        self.invalidate();
        Ok(())
    }

    pub(crate) fn persist(&mut self) -> Result<(), StoreError> {
        let current = self.snapshot().to_vec();
        self.commit(&current)
    }

    pub(crate) fn export<W: Write>(&mut self, writer: W) -> Result<W, StoreError> {
        encode_all(self.snapshot()).write_csv(writer)
    }

    fn read(&self) -> Loaded<T> {
        let source = self.port.describe();
        let set = match self.port.read() {
            Ok(set) => set,
            Err(err @ StoreError::Missing { .. }) => {
                tracing::warn!(%source, "{} data unavailable, starting empty: {err}", T::KIND);
                return Loaded {
                    unreadable: None,
                    ..Loaded::unreadable(&err)
                };
            }
            Err(err) => {
                tracing::warn!(%source, "{} data unreadable, starting empty: {err}", T::KIND);
                return Loaded::unreadable(&err);
            }
        };

        let missing = set.missing_columns(T::REQUIRED);
        if !missing.is_empty() {
            let err = StoreError::Schema { missing };
            tracing::warn!(%source, "{} data unreadable, starting empty: {err}", T::KIND);
            return Loaded::unreadable(&err);
        }

        let decoded = decode_rows::<T>(&set, 1);
        for issue in &decoded.rejected {
            tracing::warn!(%source, "{} row kept on disk but not loaded: {issue}", T::KIND);
        }
        for warning in &decoded.warnings {
            tracing::warn!(%source, "{} {warning}", T::KIND);
        }
        let mut diagnostics = decoded.warnings;
        diagnostics.extend(decoded.rejected);
        diagnostics.sort_by_key(|diagnostic| diagnostic.row);
        Loaded {
            records: decoded.records,
            held: decoded.held,
            unreadable: None,
            diagnostics,
        }
    }
}
