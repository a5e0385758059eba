//! Known-set snapshot and new-case log persistence.

use crate::error::Result;
use crate::record::CaseRecord;
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Persists the known-set as a JSON array, fully replaced on every
/// successful run.
#[derive(Debug, Clone)]
pub struct KnownCaseStore {
    path: PathBuf,
}

impl KnownCaseStore {
    /// Creates a store backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the snapshot path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the previously persisted known-set.
    ///
    /// Returns `None` when the file does not exist (first run). An empty
    /// array on disk loads as `Some(vec![])`, which is a valid known-set
    /// with zero cases, not a first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<Vec<CaseRecord>>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no known-set file, first run");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let records = serde_json::from_str(&contents)?;
        Ok(Some(records))
    }

    /// Overwrites the known-set with the given records.
    ///
    /// Writes to a temporary file in the same directory and renames it
    /// over the target, so a failed write leaves the prior snapshot
    /// intact.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any file operation fails.
    pub fn save(&self, records: &[CaseRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        debug!(
            path = %self.path.display(),
            count = records.len(),
            "known-set saved"
        );
        Ok(())
    }
}

/// Append-only text log of new cases, one line per case.
#[derive(Debug, Clone)]
pub struct CaseLog {
    path: PathBuf,
}

impl CaseLog {
    /// Creates a log backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the log path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one timestamped line per new case, preserving prior
    /// history.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub fn append(&self, cases: &[CaseRecord], now: DateTime<Local>) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let timestamp = now.format("%Y-%m-%d %H:%M:%S");
        for case in cases {
            writeln!(
                file,
                "{timestamp}: {} - {} - {}",
                case.date, case.title, case.link
            )?;
        }
        Ok(())
    }
}
