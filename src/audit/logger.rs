//! Audit journal on disk
//!
//! One JSON object per line, appended and flushed per event. Reading skips
//! lines that do not parse (a torn final write, a hand edit) and says so
//! through tracing.

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{FinGridError, FinGridResult};

use super::entry::AuditEntry;

pub struct AuditLogger {
    path: PathBuf,
}

impl AuditLogger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `entry` to the journal
    pub fn log(&self, entry: &AuditEntry) -> FinGridResult<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| FinGridError::Io(format!("Cannot open audit journal: {}", e)))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, entry)?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|e| FinGridError::Io(format!("Cannot write audit journal: {}", e)))
    }

    /// Append without failing the caller
    ///
    /// The backend change this entry describes has already happened, so a
    /// journal failure is only worth a warning.
    pub fn record(&self, entry: &AuditEntry) {
        if let Err(e) = self.log(entry) {
            warn!(error = %e, operation = %entry.operation, "audit entry not written");
        }
    }

    /// Every readable entry, oldest first
    pub fn read_all(&self) -> FinGridResult<Vec<AuditEntry>> {
        let mut entries = Vec::new();
        self.for_each_entry(|entry| entries.push(entry))?;
        Ok(entries)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> FinGridResult<Vec<AuditEntry>> {
        let mut window = VecDeque::with_capacity(count);
        self.for_each_entry(|entry| {
            if window.len() == count {
                window.pop_front();
            }
            if count > 0 {
                window.push_back(entry);
            }
        })?;
        Ok(window.into())
    }

    fn for_each_entry(&self, mut visit: impl FnMut(AuditEntry)) -> FinGridResult<()> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(FinGridError::Io(format!("Cannot open audit journal: {}", e))),
        };

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line
                .map_err(|e| FinGridError::Io(format!("Cannot read audit journal: {}", e)))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(entry) => visit(entry),
                Err(e) => warn!(line = index + 1, error = %e, "skipping unreadable audit entry"),
            }
        }
        Ok(())
    }
}
