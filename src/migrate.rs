//! Migration Module
//!
//! Re-partitions a store whose page capacity changed between runs.
//!
//! ## Steps
//! ```text
//!   {prefix}*  ──rename──▶  ~{prefix}*          (quarantine old generation)
//!                               │
//!                 shadow store (old capacity, 1 resident page)
//!                               │ bulk_copy
//!                               ▼
//!                 new store (new capacity)  ──▶  {prefix}*
//!
//!   delete ~{prefix}*
//! ```
//! Not crash safe: an interrupted migration leaves `~{prefix}*` files
//! behind and the next open starts from an empty generation.

use crate::config::StoreConfig;
use crate::error::{PageStoreError, Result};
use crate::partition::Partitioner;
use crate::persist::FileLayout;
use crate::store::PagedStore;

/// Resident page bound of the new generation while it is being filled
const MIGRATION_RESIDENT_PAGES: usize = 2;

/// zlib level forced on the shadow store; any nonzero level reads both formats
const SHADOW_COMPRESSION_LEVEL: u32 = 1;

/// Move the data written with `previous_capacity` into the configured capacity
///
/// Returns the number of entries copied.
pub(crate) fn migrate<P: Partitioner>(config: &StoreConfig, previous_capacity: usize) -> Result<u64> {
    let layout = FileLayout::new(config.storage_dir(), &config.name_prefix);

    tracing::info!(
        prefix = %config.name_prefix,
        from = previous_capacity,
        to = config.page_capacity,
        "page capacity changed, migrating"
    );

    let quarantined = layout.quarantine()?;

    let next_config = StoreConfig {
        max_resident_pages: MIGRATION_RESIDENT_PAGES,
        ..config.clone()
    };
    let shadow_config = StoreConfig {
        name_prefix: layout.quarantined_prefix(),
        page_capacity: previous_capacity,
        max_resident_pages: 1,
        compression_level: SHADOW_COMPRESSION_LEVEL,
        ..config.clone()
    };

    let copied = {
        let mut next_gen = PagedStore::<P>::open(next_config)?;
        let mut old_gen = PagedStore::<P>::open(shadow_config).map_err(|e| {
            PageStoreError::Migration(format!(
                "cannot open previous generation (capacity {}): {}",
                previous_capacity, e
            ))
        })?;

        let expected = old_gen.len();
        let copied = P::bulk_copy(&mut next_gen, &mut old_gen)?;
        if copied != expected {
            tracing::warn!(expected, copied, "previous generation entry count mismatch");
        }

        next_gen.close()?;
        old_gen.close()?;
        copied
    };

    let removed = layout.remove_quarantined()?;

    tracing::info!(
        prefix = %config.name_prefix,
        entries = copied,
        quarantined,
        removed,
        "migration finished"
    );
    Ok(copied)
}
