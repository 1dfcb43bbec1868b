//! Configuration for pagekv
//!
//! Centralized configuration with sensible defaults.

use std::path::{Path, PathBuf};

use crate::error::{PageStoreError, Result};

/// Default number of logical items per page
pub const DEFAULT_PAGE_CAPACITY: usize = 1024;

/// Default number of pages kept in memory at once
pub const DEFAULT_MAX_RESIDENT_PAGES: usize = 16;

/// Main configuration for a paged store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    // -------------------------------------------------------------------------
    // File Layout
    // -------------------------------------------------------------------------
    /// Prefix shared by every file of this store. Every file in the
    /// directory whose name starts with the prefix belongs to the store and
    /// is moved and deleted by a capacity migration, so stores sharing a
    /// directory need prefixes where none is a prefix of another (`a` and
    /// `ab` collide). Must be non-empty and free of path separators.
    ///
    ///   {storage_location}/
    ///     ├── {prefix}Set         (settings record)
    ///     ├── {prefix}Len         (index record)
    ///     └── {prefix}{page_key}  (one blob per non-resident page)
    pub name_prefix: String,

    /// Directory holding the store files. Empty means the current directory.
    pub storage_location: PathBuf,

    // -------------------------------------------------------------------------
    // Paging
    // -------------------------------------------------------------------------
    /// Max logical items per page
    pub page_capacity: usize,

    /// Max pages held in memory once an operation has settled
    pub max_resident_pages: usize,

    // -------------------------------------------------------------------------
    // Compression
    // -------------------------------------------------------------------------
    /// zlib level for page blobs (0 disables compression, above 9 acts as 9)
    pub compression_level: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name_prefix: "page".to_string(),
            storage_location: PathBuf::new(),
            page_capacity: DEFAULT_PAGE_CAPACITY,
            max_resident_pages: DEFAULT_MAX_RESIDENT_PAGES,
            compression_level: 0,
        }
    }
}

impl StoreConfig {
    /// Create a new config builder
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Reject configurations the store cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.name_prefix.is_empty() {
            return Err(PageStoreError::Config(
                "name_prefix must not be empty".to_string(),
            ));
        }
        if self.name_prefix.contains(['/', '\\']) {
            return Err(PageStoreError::Config(format!(
                "name_prefix must not contain path separators, got {:?}",
                self.name_prefix
            )));
        }
        if self.page_capacity < 1 {
            return Err(PageStoreError::Config(format!(
                "page_capacity must be at least 1, got {}",
                self.page_capacity
            )));
        }
        if self.max_resident_pages < 1 {
            return Err(PageStoreError::Config(format!(
                "max_resident_pages must be at least 1, got {}",
                self.max_resident_pages
            )));
        }
        Ok(())
    }

    /// Directory the store files live in
    pub fn storage_dir(&self) -> &Path {
        if self.storage_location.as_os_str().is_empty() {
            Path::new(".")
        } else {
            &self.storage_location
        }
    }

    /// Whether page blobs are compressed on save
    pub fn compression_enabled(&self) -> bool {
        self.compression_level != 0
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the file name prefix
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.name_prefix = prefix.into();
        self
    }

    /// Set the storage directory
    pub fn storage_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.storage_location = path.into();
        self
    }

    /// Set the number of logical items per page
    pub fn page_capacity(mut self, capacity: usize) -> Self {
        self.config.page_capacity = capacity;
        self
    }

    /// Set the resident page bound
    pub fn max_resident_pages(mut self, count: usize) -> Self {
        self.config.max_resident_pages = count;
        self
    }

    /// Set the zlib compression level
    ///
    /// 0 disables compression; 1-9 are zlib levels and anything higher is
    /// clamped to 9.
    pub fn compression_level(mut self, level: u32) -> Self {
        self.config.compression_level = level;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}
