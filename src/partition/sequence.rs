//! Sequence Partitioner
//!
//! Routes dense `u64` keys to pages by integer division: key `k` lives in
//! page `k / capacity` at offset `k % capacity`. Pages are sorted maps, and
//! the set of pages holding data is kept as auxiliary index state so a scan
//! visits pages in key order without listing the directory.

use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

use super::{PagerOf, Partitioner};

/// Partitioner for `u64`-keyed stores
#[derive(Debug, Clone)]
pub struct SequencePartitioner<V> {
    /// Items per page
    capacity: u64,

    /// Pages that currently hold (or may hold) data
    pages: BTreeSet<u64>,

    _value: PhantomData<V>,
}

impl<V> SequencePartitioner<V> {
    /// Items per page
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Number of known pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl<V> Partitioner for SequencePartitioner<V>
where
    V: Clone + Serialize + DeserializeOwned,
{
    type Key = u64;
    type PageKey = u64;
    type Page = BTreeMap<u64, V>;
    type Aux = BTreeSet<u64>;

    fn with_capacity(page_capacity: usize) -> Self {
        Self {
            capacity: page_capacity.max(1) as u64,
            pages: BTreeSet::new(),
            _value: PhantomData,
        }
    }

    fn route(&self, key: &u64) -> (u64, u64) {
        (key / self.capacity, key % self.capacity)
    }

    fn logical_key(&self, page_key: &u64, sub_key: &u64) -> u64 {
        page_key * self.capacity + sub_key
    }

    fn materialize_page(&mut self, page_key: u64, pager: &mut PagerOf<Self>) -> Result<()> {
        self.pages.insert(page_key);
        pager.load_or_create(page_key)
    }

    fn enumerate_page_keys(&self) -> Vec<u64> {
        self.pages.iter().copied().collect()
    }

    fn on_page_emptied(&mut self, page_key: &u64) {
        self.pages.remove(page_key);
    }

    fn aux(&self) -> BTreeSet<u64> {
        self.pages.clone()
    }

    fn restore(&mut self, aux: BTreeSet<u64>) {
        self.pages = aux;
    }
}
