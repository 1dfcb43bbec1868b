//! Store Module
//!
//! The paged store core: a key/value map whose pages spill to disk.
//!
//! ## Responsibilities
//! - Route every item operation to a resident page
//! - Keep at most `max_resident_pages` pages in memory between operations
//! - Maintain the total entry count across resident and spilled pages
//! - Detect capacity changes on open and migrate the data on disk
//! - Flush every resident page on `close()` and on drop
//!
//! ## Access Path
//! ```text
//!   get/set/delete/contains(key)
//!        │
//!        ▼
//!   Partitioner::route ──▶ (page_key, sub_key)
//!        │
//!        ▼
//!   ensure_resident(page_key)
//!     1. materialize if not resident   (load blob or create empty)
//!     2. while resident > max:         evict oldest load, never page_key
//!        │
//!        ▼
//!   Page::get/insert/remove(sub_key)
//! ```

mod iter;

use std::fs;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::migrate;
use crate::page::Page;
use crate::partition::{Partitioner, PagerOf, SubKeyOf, ValueOf};
use crate::persist::{FileLayout, IndexRecord, PageCodec, PageFate, Pager};

pub use iter::{Iter, Keys};

/// A disk-backed map that keeps a bounded number of pages in memory
///
/// ## Lifecycle
/// `open` validates the config, migrates data written under a different
/// page capacity, and loads the index record. `close` evicts every resident
/// page; it is idempotent and leaves the store usable. Dropping the store
/// calls `close` and logs any failure, so resident pages are only lost if
/// the process dies without unwinding.
///
/// ## Concurrency
/// None. The store takes `&mut self` for every access, including reads,
/// because any access may load and evict pages. Sharing a storage location
/// between two live stores with the same prefix is unsupported.
pub struct PagedStore<P: Partitioner> {
    /// Store configuration
    config: StoreConfig,

    /// Routing and page management
    partitioner: P,

    /// Resident pages and their disk blobs
    pager: PagerOf<P>,

    /// Entries across all pages, resident or not
    total_entries: u64,
}

impl<P: Partitioner> PagedStore<P> {
    /// Open or create a store with a partitioner sized to the config
    pub fn open(config: StoreConfig) -> Result<Self> {
        let partitioner = P::with_capacity(config.page_capacity);
        Self::open_with(config, partitioner)
    }

    /// Open or create a store with a caller-built partitioner
    ///
    /// On startup:
    /// 1. Validate page capacity and resident bound
    /// 2. Create the storage directory if it doesn't exist
    /// 3. Migrate if the settings record holds a different page capacity
    /// 4. Rewrite the settings record
    /// 5. Restore total entry count and partitioner aux state from the index
    pub fn open_with(config: StoreConfig, mut partitioner: P) -> Result<Self> {
        // Step 1: Reject unusable configuration
        config.validate()?;

        // Step 2: Create directory if it doesn't exist
        fs::create_dir_all(config.storage_dir())?;

        let layout = FileLayout::new(config.storage_dir(), &config.name_prefix);
        let mut pager: PagerOf<P> = Pager::new(layout, PageCodec::new(config.compression_level));

        // Step 3: Re-partition data written under another capacity
        if let Some(previous) = pager.read_settings()? {
            let previous_capacity = previous.page_capacity as usize;
            if previous_capacity != config.page_capacity {
                migrate::migrate::<P>(&config, previous_capacity)?;
            }
        }

        // Step 4: Record the capacity this generation is written with
        pager.write_settings(config.page_capacity)?;

        // Step 5: Load aggregate state
        let mut total_entries = 0;
        if let Some(index) = pager.read_index::<P::Aux>()? {
            partitioner.restore(index.aux);
            total_entries = index.total_entry_count;
        }

        tracing::info!(
            prefix = %config.name_prefix,
            dir = %config.storage_dir().display(),
            page_capacity = config.page_capacity,
            max_resident_pages = config.max_resident_pages,
            entries = total_entries,
            "opened paged store"
        );

        Ok(Self {
            config,
            partitioner,
            pager,
            total_entries,
        })
    }

    // =========================================================================
    // Item Operations
    // =========================================================================

    /// Get a value by key
    pub fn get(&mut self, key: &P::Key) -> Result<Option<&ValueOf<P>>> {
        let (page_key, sub_key) = self.partitioner.route(key);
        self.ensure_resident(&page_key)?;

        Ok(self.pager.page(&page_key).and_then(|page| page.get(&sub_key)))
    }

    /// Get a mutable reference to a value by key
    pub fn get_mut(&mut self, key: &P::Key) -> Result<Option<&mut ValueOf<P>>> {
        let (page_key, sub_key) = self.partitioner.route(key);
        self.ensure_resident(&page_key)?;

        Ok(self.pager.resident_mut(&page_key)?.get_mut(&sub_key))
    }

    /// Put a key-value pair, returning the value it replaced
    pub fn set(&mut self, key: P::Key, value: ValueOf<P>) -> Result<Option<ValueOf<P>>> {
        let (page_key, sub_key) = self.partitioner.route(&key);
        self.ensure_resident(&page_key)?;

        let previous = self.pager.resident_mut(&page_key)?.insert(sub_key, value);
        if previous.is_none() {
            self.total_entries += 1;
        }
        Ok(previous)
    }

    /// Delete a key, returning its value if it was present
    pub fn delete(&mut self, key: &P::Key) -> Result<Option<ValueOf<P>>> {
        let (page_key, sub_key) = self.partitioner.route(key);
        self.ensure_resident(&page_key)?;

        let removed = self.pager.resident_mut(&page_key)?.remove(&sub_key);
        if removed.is_some() {
            self.total_entries = self.total_entries.saturating_sub(1);
        }
        Ok(removed)
    }

    /// Check whether a key is present
    pub fn contains(&mut self, key: &P::Key) -> Result<bool> {
        let (page_key, sub_key) = self.partitioner.route(key);
        self.ensure_resident(&page_key)?;

        Ok(self
            .pager
            .page(&page_key)
            .map(|page| page.contains(&sub_key))
            .unwrap_or(false))
    }

    /// Total number of entries, O(1)
    pub fn len(&self) -> u64 {
        self.total_entries
    }

    pub fn is_empty(&self) -> bool {
        self.total_entries == 0
    }

    // =========================================================================
    // Iteration
    // =========================================================================

    /// Lazily iterate over every key, one page at a time
    pub fn keys(&mut self) -> Keys<'_, P> {
        let page_keys = self.partitioner.enumerate_page_keys();
        Keys::new(self, page_keys)
    }

    /// Lazily iterate over every entry, one page at a time
    pub fn iter(&mut self) -> Iter<'_, P> {
        let page_keys = self.partitioner.enumerate_page_keys();
        Iter::new(self, page_keys)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Evict every resident page
    ///
    /// Safe to call repeatedly; the store stays usable and reloads pages on
    /// the next access.
    pub fn close(&mut self) -> Result<()> {
        let mut evicted = 0;
        while let Some(page_key) = self.pager.oldest_resident() {
            self.save_page(&page_key)?;
            evicted += 1;
        }

        if evicted > 0 {
            tracing::debug!(prefix = %self.config.name_prefix, pages = evicted, "closed paged store");
        }
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Get the partitioner
    pub fn partitioner(&self) -> &P {
        &self.partitioner
    }

    /// Number of pages currently in memory
    pub fn resident_page_count(&self) -> usize {
        self.pager.resident_count()
    }

    /// Resident page keys, oldest load first
    pub fn resident_page_keys(&self) -> Vec<P::PageKey> {
        self.pager.resident_keys()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Make a page resident, evicting others to stay within the bound
    fn ensure_resident(&mut self, page_key: &P::PageKey) -> Result<()> {
        if !self.pager.is_resident(page_key) {
            self.partitioner
                .materialize_page(page_key.clone(), &mut self.pager)?;
        }

        while self.pager.resident_count() > self.config.max_resident_pages {
            match self.pager.next_victim(page_key) {
                Some(victim) => self.save_page(&victim)?,
                None => break,
            }
        }

        Ok(())
    }

    /// Persist and drop one resident page, then refresh the index record
    fn save_page(&mut self, page_key: &P::PageKey) -> Result<()> {
        if self.pager.save_page(page_key)? == PageFate::Emptied {
            self.partitioner.on_page_emptied(page_key);
        }

        let record = IndexRecord {
            aux: self.partitioner.aux(),
            total_entry_count: self.total_entries,
        };
        self.pager.write_index(&record)?;
        Ok(())
    }

    /// Make a page resident and snapshot its entries under logical keys
    fn page_entries(&mut self, page_key: &P::PageKey) -> Result<Vec<(P::Key, ValueOf<P>)>> {
        self.ensure_resident(page_key)?;

        let Some(page) = self.pager.page(page_key) else {
            return Ok(Vec::new());
        };
        Ok(page
            .entries()
            .into_iter()
            .map(|(sub_key, value)| (self.partitioner.logical_key(page_key, &sub_key), value))
            .collect())
    }

    /// Make a page resident and snapshot its keys
    fn page_keys(&mut self, page_key: &P::PageKey) -> Result<Vec<P::Key>> {
        self.ensure_resident(page_key)?;

        let Some(page) = self.pager.page(page_key) else {
            return Ok(Vec::new());
        };
        Ok(page
            .sub_keys()
            .iter()
            .map(|sub_key: &SubKeyOf<P>| self.partitioner.logical_key(page_key, sub_key))
            .collect())
    }
}

impl<P: Partitioner> Drop for PagedStore<P> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(
                prefix = %self.config.name_prefix,
                error = %e,
                "failed to flush resident pages on drop"
            );
        }
    }
}
