//! Pager
//!
//! Moves pages between their on-disk blobs and the resident set.
//!
//! ## Responsibilities
//! - Load a page blob into memory and delete the blob
//! - Write an evicted page to its blob, or drop it if empty
//! - Read/write the settings and index records
//!
//! A page key has at most one authoritative copy: resident, on disk, or
//! (when empty) nowhere.

use std::fmt::Display;
use std::fs;
use std::hash::Hash;
use std::io::ErrorKind;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PageStoreError, Result};
use crate::page::Page;
use crate::residency::Residency;

use super::{FileLayout, IndexRecord, IndexWriter, PageCodec, SettingsRecord};

/// What happened to a page handed to `save_page`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFate {
    /// Page was written to its blob
    Written,

    /// Page was empty and dropped without a blob
    Emptied,

    /// Page was not resident, nothing to do
    NotResident,
}

/// Owns the resident pages of a store and their disk blobs
#[derive(Debug)]
pub struct Pager<K, P> {
    /// File naming for this store
    layout: FileLayout,

    /// Blob encoding
    codec: PageCodec,

    /// Resident pages + load order
    residency: Residency<K, P>,

    /// Skip-write tracking for the index record
    index_writer: IndexWriter,
}

impl<K, P> Pager<K, P>
where
    K: Clone + Eq + Hash + Display,
    P: Page,
{
    pub fn new(layout: FileLayout, codec: PageCodec) -> Self {
        Self {
            layout,
            codec,
            residency: Residency::new(),
            index_writer: IndexWriter::new(),
        }
    }

    // =========================================================================
    // Page Movement
    // =========================================================================

    /// Whether a blob for this page exists on disk
    pub fn has_blob(&self, key: &K) -> bool {
        self.layout.page_path(key).is_file()
    }

    /// Read a page blob into the resident set and delete the blob
    ///
    /// A missing blob is an error.
    pub fn load_page(&mut self, key: K) -> Result<()> {
        let path = self.layout.page_path(&key);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PageStoreError::PageNotFound(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let page: P = self.codec.decode(&bytes)?;
        fs::remove_file(&path)?;

        tracing::debug!(page = %key, items = page.len(), bytes = bytes.len(), "loaded page");
        self.residency.insert(key, page);
        Ok(())
    }

    /// Install a fresh empty page
    pub fn create_page(&mut self, key: K) {
        tracing::debug!(page = %key, "created page");
        self.residency.insert(key, P::default());
    }

    /// Load the page if it has a blob, otherwise create it empty
    pub fn load_or_create(&mut self, key: K) -> Result<()> {
        if self.has_blob(&key) {
            self.load_page(key)
        } else {
            self.create_page(key);
            Ok(())
        }
    }

    /// Take a page out of the resident set and persist it
    ///
    /// Non-empty pages are written to their blob. Empty pages are dropped
    /// without touching the disk.
    pub fn save_page(&mut self, key: &K) -> Result<PageFate> {
        let Some(page) = self.residency.remove(key) else {
            return Ok(PageFate::NotResident);
        };

        if page.is_empty() {
            tracing::debug!(page = %key, "dropped empty page");
            return Ok(PageFate::Emptied);
        }

        let bytes = self.codec.encode(&page)?;
        fs::write(self.layout.page_path(key), &bytes)?;

        tracing::debug!(page = %key, items = page.len(), bytes = bytes.len(), "evicted page");
        Ok(PageFate::Written)
    }

    // =========================================================================
    // Resident Pages
    // =========================================================================

    pub fn is_resident(&self, key: &K) -> bool {
        self.residency.contains(key)
    }

    pub fn resident_count(&self) -> usize {
        self.residency.len()
    }

    /// Resident page keys, oldest load first
    pub fn resident_keys(&self) -> Vec<K> {
        self.residency.keys().cloned().collect()
    }

    pub fn oldest_resident(&self) -> Option<K> {
        self.residency.oldest().cloned()
    }

    /// Next eviction candidate, never `protected` unless nothing else is left
    pub fn next_victim(&mut self, protected: &K) -> Option<K> {
        self.residency.next_victim(protected)
    }

    pub fn page(&self, key: &K) -> Option<&P> {
        self.residency.get(key)
    }

    /// Mutable access to a page that must be resident
    pub fn resident_mut(&mut self, key: &K) -> Result<&mut P> {
        self.residency
            .get_mut(key)
            .ok_or_else(|| PageStoreError::PageNotFound(format!("page {} is not resident", key)))
    }

    // =========================================================================
    // Metadata Records
    // =========================================================================

    pub fn read_settings(&self) -> Result<Option<SettingsRecord>> {
        SettingsRecord::read(&self.layout.settings_path())
    }

    pub fn write_settings(&self, page_capacity: usize) -> Result<()> {
        SettingsRecord {
            page_capacity: page_capacity as u64,
        }
        .write(&self.layout.settings_path())
    }

    pub fn read_index<A: DeserializeOwned>(&mut self) -> Result<Option<IndexRecord<A>>> {
        self.index_writer.read(&self.layout.index_path())
    }

    /// Write the index record; returns false when the write was skipped
    pub fn write_index<A: Serialize>(&mut self, record: &IndexRecord<A>) -> Result<bool> {
        let written = self.index_writer.write(&self.layout.index_path(), record)?;
        if !written {
            tracing::debug!(prefix = %self.layout.prefix(), "index unchanged, skipped write");
        }
        Ok(written)
    }

    pub fn layout(&self) -> &FileLayout {
        &self.layout
    }

    pub fn codec(&self) -> PageCodec {
        self.codec
    }
}
