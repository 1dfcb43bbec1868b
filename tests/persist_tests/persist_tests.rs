//! Tests for the persistence layer
//!
//! These tests verify:
//! - Page blobs written at one compression level are readable at any other
//! - The index record is only rewritten when its content changes
//! - Loading a page consumes its blob; a missing blob is an error
//! - Settings and index records land under the store prefix

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use pagekv::persist::{FileLayout, IndexRecord, PageCodec, PageFate, Pager, SettingsRecord};
use pagekv::{PageStoreError, PagedStore, SequencePartitioner, StoreConfig};
use tempfile::TempDir;

type Store = PagedStore<SequencePartitioner<String>>;

// =============================================================================
// Helper Functions
// =============================================================================

fn config(dir: &Path, compression_level: u32) -> StoreConfig {
    StoreConfig::builder()
        .storage_location(dir)
        .name_prefix("p")
        .page_capacity(4)
        .max_resident_pages(1)
        .compression_level(compression_level)
        .build()
}

fn fill(dir: &Path, compression_level: u32, count: u64) {
    let mut store = Store::open(config(dir, compression_level)).unwrap();
    for key in 0..count {
        store.set(key, format!("payload-{:04}", key).repeat(8)).unwrap();
    }
    store.close().unwrap();
}

fn verify(dir: &Path, compression_level: u32, count: u64) {
    let mut store = Store::open(config(dir, compression_level)).unwrap();
    assert_eq!(store.len(), count);
    for key in 0..count {
        let expected = format!("payload-{:04}", key).repeat(8);
        assert_eq!(store.get(&key).unwrap(), Some(&expected));
    }
}

fn is_zlib(bytes: &[u8]) -> bool {
    // CMF byte for deflate with a 32K window
    bytes.first() == Some(&0x78)
}

// =============================================================================
// Compression Tests
// =============================================================================

#[test]
fn test_compressed_pages_read_without_compression() {
    let temp = TempDir::new().unwrap();
    fill(temp.path(), 6, 20);

    let blob = fs::read(temp.path().join("p0")).unwrap();
    assert!(is_zlib(&blob));

    verify(temp.path(), 0, 20);
}

#[test]
fn test_plain_pages_read_with_compression() {
    let temp = TempDir::new().unwrap();
    fill(temp.path(), 0, 20);

    let blob = fs::read(temp.path().join("p0")).unwrap();
    assert!(!is_zlib(&blob));

    verify(temp.path(), 9, 20);
}

#[test]
fn test_level_above_nine_behaves_as_nine() {
    let temp = TempDir::new().unwrap();
    fill(temp.path(), 42, 20);

    let blob = fs::read(temp.path().join("p0")).unwrap();
    assert!(is_zlib(&blob));

    verify(temp.path(), 0, 20);
}

#[test]
fn test_mixed_generations_of_blobs() {
    let temp = TempDir::new().unwrap();
    fill(temp.path(), 0, 8);

    // Rewrite only page 2 with compression on
    {
        let mut store = Store::open(config(temp.path(), 3)).unwrap();
        for key in 8..12u64 {
            store.set(key, format!("payload-{:04}", key).repeat(8)).unwrap();
        }
        store.close().unwrap();
    }

    assert!(!is_zlib(&fs::read(temp.path().join("p0")).unwrap()));
    assert!(is_zlib(&fs::read(temp.path().join("p2")).unwrap()));
    verify(temp.path(), 0, 12);
}

// =============================================================================
// Index Record Tests
// =============================================================================

#[test]
fn test_index_not_written_before_first_eviction() {
    let temp = TempDir::new().unwrap();
    let mut store = Store::open(config(temp.path(), 0)).unwrap();

    store.set(0, "a".to_string()).unwrap();
    assert!(!temp.path().join("pLen").exists());

    // Page 1 pushes page 0 out
    store.set(4, "b".to_string()).unwrap();
    assert!(temp.path().join("pLen").exists());
}

#[test]
fn test_unchanged_index_is_not_rewritten() {
    let temp = TempDir::new().unwrap();
    let index_path = temp.path().join("pLen");
    let mut store = Store::open(config(temp.path(), 0)).unwrap();

    for key in 0..8u64 {
        store.set(key, key.to_string()).unwrap();
    }
    // Page 0 back in, page 1 out: index now holds the final count
    store.get(&0).unwrap();
    let written = fs::read(&index_path).unwrap();

    fs::remove_file(&index_path).unwrap();
    // Page 1 back in, page 0 out: same pages, same count
    store.get(&4).unwrap();
    assert!(!index_path.exists());

    // A new page changes the aux state, so the index is written again
    store.set(8, "8".to_string()).unwrap();
    assert!(index_path.exists());
    assert_ne!(fs::read(&index_path).unwrap(), written);
}

#[test]
fn test_index_record_contents() {
    let temp = TempDir::new().unwrap();
    fill(temp.path(), 0, 10);

    let bytes = fs::read(temp.path().join("pLen")).unwrap();
    let record: IndexRecord<BTreeSet<u64>> = bincode::deserialize(&bytes).unwrap();

    assert_eq!(record.total_entry_count, 10);
    assert_eq!(record.aux, [0u64, 1, 2].into_iter().collect::<BTreeSet<u64>>());
}

#[test]
fn test_settings_record_holds_capacity() {
    let temp = TempDir::new().unwrap();
    drop(Store::open(config(temp.path(), 0)).unwrap());

    let record = SettingsRecord::read(&temp.path().join("pSet")).unwrap();
    assert_eq!(record, Some(SettingsRecord { page_capacity: 4 }));
}

// =============================================================================
// Pager Tests
// =============================================================================

type TestPager = Pager<u64, BTreeMap<u64, String>>;

fn setup_pager(dir: &Path) -> TestPager {
    Pager::new(FileLayout::new(dir, "g"), PageCodec::new(0))
}

#[test]
fn test_load_missing_page_is_error() {
    let temp = TempDir::new().unwrap();
    let mut pager = setup_pager(temp.path());

    let result = pager.load_page(3);

    assert!(matches!(result, Err(PageStoreError::PageNotFound(_))));
    assert_eq!(pager.resident_count(), 0);
}

#[test]
fn test_load_consumes_blob() {
    let temp = TempDir::new().unwrap();
    let mut pager = setup_pager(temp.path());

    pager.create_page(1);
    pager.resident_mut(&1).unwrap().insert(5, "five".to_string());
    assert_eq!(pager.save_page(&1).unwrap(), PageFate::Written);
    assert!(pager.has_blob(&1));
    assert!(!pager.is_resident(&1));

    pager.load_page(1).unwrap();
    assert!(!pager.has_blob(&1));
    assert_eq!(pager.page(&1).and_then(|p| p.get(&5)).map(String::as_str), Some("five"));
}

#[test]
fn test_save_empty_page_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let mut pager = setup_pager(temp.path());

    pager.create_page(2);
    assert_eq!(pager.save_page(&2).unwrap(), PageFate::Emptied);
    assert_eq!(pager.save_page(&2).unwrap(), PageFate::NotResident);

    assert!(!pager.has_blob(&2));
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_corrupt_blob_is_serialization_error() {
    let temp = TempDir::new().unwrap();
    let mut pager = setup_pager(temp.path());
    fs::write(temp.path().join("g9"), b"\x01\x02").unwrap();

    let result = pager.load_page(9);

    assert!(matches!(result, Err(PageStoreError::Serialization(_))));
}
