#![forbid(unsafe_code)]

use crate::{RowSet, StoreError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Read/write boundary to durable storage. One port per store.
///
/// `write` replaces the whole durable collection: afterwards either the prior
/// contents or the full new contents are visible, never a mix.
pub trait RowPort {
    fn read(&self) -> Result<RowSet, StoreError>;
    fn write(&self, rows: &RowSet) -> Result<(), StoreError>;
    /// Short human label for log lines and error messages.
    fn describe(&self) -> String;
}

impl<P: RowPort + ?Sized> RowPort for &P {
    fn read(&self) -> Result<RowSet, StoreError> {
        (**self).read()
    }

    fn write(&self, rows: &RowSet) -> Result<(), StoreError> {
        (**self).write(rows)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<P: RowPort + ?Sized> RowPort for Arc<P> {
    fn read(&self) -> Result<RowSet, StoreError> {
        (**self).read()
    }

    fn write(&self, rows: &RowSet) -> Result<(), StoreError> {
        (**self).write(rows)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// In-process port. Starts empty (reads fail like a missing file) unless
/// seeded; `lock_writes` makes every write fail as `Locked`.
#[derive(Debug, Default)]
pub struct MemoryPort {
    name: String,
    contents: Mutex<Option<RowSet>>,
    locked: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryPort {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_rows(name: impl Into<String>, rows: RowSet) -> Self {
        let port = Self::new(name);
        port.replace(Some(rows));
        port
    }

    pub fn lock_writes(&self, locked: bool) {
        self.locked.store(locked, Ordering::SeqCst);
    }

    /// Current durable contents; `None` until something is written.
    pub fn contents(&self) -> Option<RowSet> {
        self.slot().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn replace(&self, rows: Option<RowSet>) {
        *self.slot() = rows;
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<RowSet>> {
        // Writers swap whole row sets, so a poisoned slot is still consistent.
        self.contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RowPort for MemoryPort {
    fn read(&self) -> Result<RowSet, StoreError> {
        self.slot().clone().ok_or_else(|| StoreError::Missing {
            path: PathBuf::from(&self.name),
        })
    }

    fn write(&self, rows: &RowSet) -> Result<(), StoreError> {
        if self.locked.load(Ordering::SeqCst) {
            return Err(StoreError::Locked {
                path: PathBuf::from(&self.name),
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "destination held by another process",
                ),
            });
        }
        self.replace(Some(rows.clone()));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory:{}", self.name)
    }
}
