//! Page Module
//!
//! The in-memory representation of one page: a bounded mapping of sub-keys
//! to values. The store only talks to pages through the `Page` trait, so a
//! partitioner can pick a sorted or hashed layout.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A page held by the store
///
/// Pages are serialized as a whole when evicted, so they must round-trip
/// through serde. `Default` produces the empty page used for fresh page keys.
pub trait Page: Default + Serialize + DeserializeOwned {
    /// Key of an item within the page
    type SubKey: Clone;

    /// Stored value
    type Value: Clone;

    fn get(&self, key: &Self::SubKey) -> Option<&Self::Value>;

    fn get_mut(&mut self, key: &Self::SubKey) -> Option<&mut Self::Value>;

    /// Insert a value, returning the one it replaced
    fn insert(&mut self, key: Self::SubKey, value: Self::Value) -> Option<Self::Value>;

    /// Remove a value, returning it if it was present
    fn remove(&mut self, key: &Self::SubKey) -> Option<Self::Value>;

    fn contains(&self, key: &Self::SubKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of items in the page
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the page's sub-keys
    fn sub_keys(&self) -> Vec<Self::SubKey>;

    /// Snapshot of the page's items
    fn entries(&self) -> Vec<(Self::SubKey, Self::Value)>;
}

// =============================================================================
// Sorted pages
// =============================================================================

impl<K, V> Page for BTreeMap<K, V>
where
    K: Ord + Clone + Serialize + DeserializeOwned,
    V: Clone + Serialize + DeserializeOwned,
{
    type SubKey = K;
    type Value = V;

    fn get(&self, key: &K) -> Option<&V> {
        BTreeMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        BTreeMap::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        BTreeMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        BTreeMap::remove(self, key)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn sub_keys(&self) -> Vec<K> {
        self.keys().cloned().collect()
    }

    fn entries(&self) -> Vec<(K, V)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

// =============================================================================
// Hashed pages
// =============================================================================

impl<K, V> Page for HashMap<K, V>
where
    K: Eq + Hash + Clone + Serialize + DeserializeOwned,
    V: Clone + Serialize + DeserializeOwned,
{
    type SubKey = K;
    type Value = V;

    fn get(&self, key: &K) -> Option<&V> {
        HashMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        HashMap::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        HashMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        HashMap::remove(self, key)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn sub_keys(&self) -> Vec<K> {
        self.keys().cloned().collect()
    }

    fn entries(&self) -> Vec<(K, V)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}
