//! The local record store: an ordered table of [`Record`]s backed by a
//! JSONL file, one record object per line.
//!
//! The sheet owns record identity (the `no` column) and schema defaults.
//! Columns the reconcilers never touch ride along in each record's `extra`
//! map, so a load/save round trip preserves them.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Result, SyncError};
use crate::model::Record;

/// In-memory sheet; passed by reference through the driver and reconcilers
/// and persisted exactly once at the end of a run.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    records: Vec<Record>,
}

impl Sheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Load a sheet from disk.
    ///
    /// A missing file yields an empty sheet (first run against a fresh
    /// workspace); any other I/O or parse failure is fatal to the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or any line
    /// fails to parse as a record.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "sheet file missing, starting empty");
            return Ok(Self::new());
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: Record =
                serde_json::from_str(&line).map_err(|e| SyncError::SheetParse {
                    line: line_num + 1,
                    reason: e.to_string(),
                })?;
            records.push(record);
        }

        tracing::debug!(path = %path.display(), count = records.len(), "sheet loaded");
        Ok(Self { records })
    }

    /// Persist the sheet atomically: write a sibling temp file, then rename
    /// over the target so a crash never leaves a half-written sheet.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp file cannot be written or renamed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp_path = path.with_extension("jsonl.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            for record in &self.records {
                serde_json::to_writer(&mut writer, record)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp_path, path)?;

        tracing::debug!(path = %path.display(), count = self.records.len(), "sheet saved");
        Ok(())
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest assigned row number, 0 when no row has one.
    #[must_use]
    pub fn max_sequence(&self) -> u64 {
        self.records
            .iter()
            .filter_map(|record| record.sequence)
            .max()
            .unwrap_or(0)
    }

    /// Row number for the next appended record.
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.max_sequence() + 1
    }

    /// First record carrying the given row number. Duplicate numbers should
    /// not occur; when they do, only the first is ever processed.
    pub fn record_by_sequence_mut(&mut self, sequence: u64) -> Option<&mut Record> {
        self.records
            .iter_mut()
            .find(|record| record.sequence == Some(sequence))
    }

    /// Map each derivable remote key to the index of the first record
    /// carrying it.
    #[must_use]
    pub fn key_index(&self) -> HashMap<String, usize> {
        let mut index = HashMap::new();
        for (i, record) in self.records.iter().enumerate() {
            if let Some(key) = record.remote_key() {
                index.entry(key.to_string()).or_insert(i);
            }
        }
        index
    }

    pub fn record_mut(&mut self, index: usize) -> Option<&mut Record> {
        self.records.get_mut(index)
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }
}
