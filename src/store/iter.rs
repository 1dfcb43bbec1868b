//! Store Iterators
//!
//! Page-at-a-time scans. Each page is made resident only when the scan
//! reaches it, so a full scan never holds more than `max_resident_pages`
//! pages. The page key list is snapshotted when the iterator is created.

use std::vec;

use crate::error::Result;
use crate::partition::{Partitioner, ValueOf};

use super::PagedStore;

/// Iterator over every `(key, value)` in a store
pub struct Iter<'a, P: Partitioner> {
    store: &'a mut PagedStore<P>,
    page_keys: vec::IntoIter<P::PageKey>,
    current: vec::IntoIter<(P::Key, ValueOf<P>)>,
    failed: bool,
}

impl<'a, P: Partitioner> Iter<'a, P> {
    pub(super) fn new(store: &'a mut PagedStore<P>, page_keys: Vec<P::PageKey>) -> Self {
        Self {
            store,
            page_keys: page_keys.into_iter(),
            current: Vec::new().into_iter(),
            failed: false,
        }
    }
}

impl<P: Partitioner> Iterator for Iter<'_, P> {
    type Item = Result<(P::Key, ValueOf<P>)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.next() {
                return Some(Ok(entry));
            }
            if self.failed {
                return None;
            }

            let page_key = self.page_keys.next()?;
            match self.store.page_entries(&page_key) {
                Ok(entries) => self.current = entries.into_iter(),
                Err(e) => {
                    // Stop after reporting the first failure
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Iterator over every key in a store
pub struct Keys<'a, P: Partitioner> {
    store: &'a mut PagedStore<P>,
    page_keys: vec::IntoIter<P::PageKey>,
    current: vec::IntoIter<P::Key>,
    failed: bool,
}

impl<'a, P: Partitioner> Keys<'a, P> {
    pub(super) fn new(store: &'a mut PagedStore<P>, page_keys: Vec<P::PageKey>) -> Self {
        Self {
            store,
            page_keys: page_keys.into_iter(),
            current: Vec::new().into_iter(),
            failed: false,
        }
    }
}

impl<P: Partitioner> Iterator for Keys<'_, P> {
    type Item = Result<P::Key>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(key) = self.current.next() {
                return Some(Ok(key));
            }
            if self.failed {
                return None;
            }

            let page_key = self.page_keys.next()?;
            match self.store.page_keys(&page_key) {
                Ok(keys) => self.current = keys.into_iter(),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
