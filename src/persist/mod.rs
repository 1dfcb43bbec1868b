//! Persistence Module
//!
//! Byte-level page serialization and the on-disk layout of a store.
//!
//! ## Responsibilities
//! - Serialize pages with bincode, optionally zlib-compressed
//! - Name page blobs and metadata records after the store prefix
//! - Move pages between disk and the resident set (at most one copy exists)
//! - Skip rewriting the index record when its bytes have not changed
//!
//! ## File Layout
//! ```text
//! {storage_location}/
//!   ├── {prefix}Set          settings record: page capacity
//!   ├── {prefix}Len          index record: (aux, total entry count)
//!   ├── {prefix}{page_key}   page blob, only while the page is on disk
//!   └── ~{prefix}*           quarantined generation, only during migration
//! ```
//!
//! ## Page Blob
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ zlib stream (compression_level > 0)      │
//! │   └── bincode(page)                      │
//! ├──────────────────────────────────────────┤
//! │ or bincode(page) as-is                   │
//! └──────────────────────────────────────────┘
//! ```
//! Readers always try zlib first and fall back to the raw bytes, so a blob
//! written at any level is readable at any level.

mod codec;
mod layout;
mod pager;
mod records;

pub use codec::PageCodec;
pub use layout::{FileLayout, QUARANTINE_MARKER};
pub use pager::{PageFate, Pager};
pub use records::{IndexRecord, IndexWriter, SettingsRecord};
