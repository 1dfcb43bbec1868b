//! Partitioning Module
//!
//! The capability set a concrete store plugs into the paged store core.
//!
//! ## Responsibilities
//! - Route a logical key to `(page_key, sub_key)` and back
//! - Materialize (load or create) a page on first access
//! - Enumerate the page keys that may hold data
//! - Copy a whole store during capacity migration
//! - Clean up side state when a page empties
//!
//! ## Routing
//! ```text
//!   logical key ──route──▶ (page_key, sub_key)
//!                              │         │
//!                              ▼         ▼
//!                           Pager ──▶ Page::get/insert/remove
//! ```

mod sequence;

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::page::Page;
use crate::persist::Pager;
use crate::store::PagedStore;

pub use sequence::SequencePartitioner;

/// Sub-key type of a partitioner's pages
pub type SubKeyOf<P> = <<P as Partitioner>::Page as Page>::SubKey;

/// Value type of a partitioner's pages
pub type ValueOf<P> = <<P as Partitioner>::Page as Page>::Value;

/// Pager type a partitioner materializes pages into
pub type PagerOf<P> = Pager<<P as Partitioner>::PageKey, <P as Partitioner>::Page>;

/// Pluggable routing and page management for a paged store
///
/// All members are mandatory except `materialize_page` and `bulk_copy`,
/// which have defaults built on the pager and the store iterator.
pub trait Partitioner: Sized {
    /// Logical key callers use
    type Key;

    /// Page identifier; its `Display` form is the page file suffix
    ///
    /// The rendered form must be a plain file name fragment: no path
    /// separators, and never `Set` or `Len`, which name the metadata records.
    type PageKey: Clone + Eq + Hash + Display + Debug;

    /// In-memory page representation
    type Page: Page;

    /// Auxiliary values persisted in the index record
    type Aux: Serialize + DeserializeOwned + Default;

    /// Build a partitioner for pages holding `page_capacity` items
    fn with_capacity(page_capacity: usize) -> Self;

    /// Map a logical key to its page and the key within that page
    fn route(&self, key: &Self::Key) -> (Self::PageKey, SubKeyOf<Self>);

    /// Inverse of `route`
    fn logical_key(&self, page_key: &Self::PageKey, sub_key: &SubKeyOf<Self>) -> Self::Key;

    /// Load or create a non-resident page
    fn materialize_page(
        &mut self,
        page_key: Self::PageKey,
        pager: &mut PagerOf<Self>,
    ) -> Result<()> {
        pager.load_or_create(page_key)
    }

    /// Page keys that may hold data, in iteration order
    fn enumerate_page_keys(&self) -> Vec<Self::PageKey>;

    /// Copy every entry of `source` into `target`
    ///
    /// Returns the number of entries copied.
    fn bulk_copy(target: &mut PagedStore<Self>, source: &mut PagedStore<Self>) -> Result<u64> {
        let mut copied = 0;
        for entry in source.iter() {
            let (key, value) = entry?;
            target.set(key, value)?;
            copied += 1;
        }
        Ok(copied)
    }

    /// Called when an empty page is dropped instead of written to disk
    fn on_page_emptied(&mut self, page_key: &Self::PageKey);

    /// Snapshot of the auxiliary values for the index record
    fn aux(&self) -> Self::Aux;

    /// Restore auxiliary values read from the index record
    fn restore(&mut self, aux: Self::Aux);
}
