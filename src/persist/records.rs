//! Metadata Records
//!
//! The settings record (page capacity of the generation on disk) and the
//! index record (partitioner aux state plus total entry count).

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Persisted page capacity, compared across runs to detect reconfiguration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub page_capacity: u64,
}

impl SettingsRecord {
    /// Read the record, `None` if the file does not exist
    pub fn read(path: &Path) -> Result<Option<Self>> {
        match read_optional(path)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, bincode::serialize(self)?)?;
        Ok(())
    }
}

/// Persisted aggregate state of a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord<A> {
    /// Partitioner-defined auxiliary values
    pub aux: A,

    /// Entries across all pages, resident or not
    pub total_entry_count: u64,
}

/// Writes index records, skipping writes whose bytes match the last write
#[derive(Debug, Default)]
pub struct IndexWriter {
    last_written: Option<Vec<u8>>,
}

impl IndexWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the record and remember its bytes as the last written content
    pub fn read<A: DeserializeOwned>(&mut self, path: &Path) -> Result<Option<IndexRecord<A>>> {
        let Some(bytes) = read_optional(path)? else {
            return Ok(None);
        };
        let record = bincode::deserialize(&bytes)?;
        self.last_written = Some(bytes);
        Ok(Some(record))
    }

    /// Write the record unless its bytes equal the last written ones
    ///
    /// Returns whether the file was written.
    pub fn write<A: Serialize>(&mut self, path: &Path, record: &IndexRecord<A>) -> Result<bool> {
        let bytes = bincode::serialize(record)?;
        if self.last_written.as_deref() == Some(bytes.as_slice()) {
            return Ok(false);
        }

        fs::write(path, &bytes)?;
        self.last_written = Some(bytes);
        Ok(true)
    }
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
