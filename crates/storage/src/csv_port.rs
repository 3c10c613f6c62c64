#![forbid(unsafe_code)]

use crate::{RowPort, RowSet, StoreError};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(200);

type RenameFn = fn(&Path, &Path) -> io::Result<()>;

fn rename_file(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
}

/// Delimited-text file port with atomic replace on write.
#[derive(Clone, Debug)]
pub struct CsvFilePort {
    path: PathBuf,
    retry_delay: Duration,
    rename: RenameFn,
}

impl CsvFilePort {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            retry_delay: DEFAULT_RETRY_DELAY,
            rename: rename_file,
        }
    }

    /// Pause before the second write attempt.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    #[cfg(test)]
    fn with_rename(mut self, rename: RenameFn) -> Self {
        self.rename = rename;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self, attempt: u32) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        if attempt > 0 {
            name.push(format!(".{}-{attempt}", std::process::id()));
        }
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Write-to-temp + fsync + rename. The temp file never outlives a failure.
    fn replace_with(&self, data: &[u8], attempt: u32) -> io::Result<()> {
        let tmp_path = self.tmp_path(attempt);
        let result = (|| {
            let mut file = File::create(&tmp_path)?;
            file.write_all(data)?;
            file.sync_all()?;
            (self.rename)(&tmp_path, &self.path)
        })();
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
            return result;
        }

        #[cfg(unix)]
        {
            if let Ok(dir) = File::open(self.dir()) {
                let _ = dir.sync_all();
            }
        }

        Ok(())
    }
}

/// Errors that mean "someone else holds the destination" rather than a
/// broken filesystem.
pub(crate) fn is_lock_error(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::ResourceBusy
    ) {
        return true;
    }
    // ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
    cfg!(windows) && matches!(err.raw_os_error(), Some(32) | Some(33))
}

impl RowPort for CsvFilePort {
    fn read(&self) -> Result<RowSet, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::Missing {
                    path: self.path.clone(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        RowSet::from_csv_reader(io::BufReader::new(file))
    }

    fn write(&self, rows: &RowSet) -> Result<(), StoreError> {
        let data = rows.to_csv_bytes()?;
        match self.replace_with(&data, 0) {
            Ok(()) => Ok(()),
            Err(err) if is_lock_error(&err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "destination busy, retrying once: {err}"
                );
                std::thread::sleep(self.retry_delay);
                self.replace_with(&data, 1).map_err(|source| {
                    if is_lock_error(&source) {
                        StoreError::Locked {
                            path: self.path.clone(),
                            source,
                        }
                    } else {
                        StoreError::Io(source)
                    }
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
