//! # pagekv
//!
//! A paged, disk-backed associative store with:
//! - Fixed-capacity pages, routed by a pluggable partitioner
//! - A bounded number of resident pages, evicted in load order
//! - bincode page blobs with optional zlib compression
//! - Transparent re-partitioning when the page capacity changes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        PagedStore                            │
//! │          get / set / delete / contains / iter / len          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ route(key) → (page_key, sub_key)
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Partitioner │          │  Residency  │
//!   │ (pluggable) │          │ (FIFO load) │
//!   └─────────────┘          └──────┬──────┘
//!                                   │ load / evict
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   Persist   │
//!                           │ (page blobs)│
//!                           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use pagekv::{PagedStore, SequencePartitioner, StoreConfig};
//!
//! # fn main() -> pagekv::Result<()> {
//! let config = StoreConfig::builder()
//!     .storage_location("./pages")
//!     .name_prefix("scores")
//!     .page_capacity(512)
//!     .max_resident_pages(4)
//!     .build();
//!
//! let mut store: PagedStore<SequencePartitioner<String>> = PagedStore::open(config)?;
//! store.set(42, "answer".to_string())?;
//! assert_eq!(store.get(&42)?.map(String::as_str), Some("answer"));
//! store.close()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod page;
pub mod persist;
pub mod residency;
pub mod partition;
pub mod store;

mod migrate;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PageStoreError, Result};
pub use config::StoreConfig;
pub use page::Page;
pub use partition::{Partitioner, SequencePartitioner};
pub use store::PagedStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of pagekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
