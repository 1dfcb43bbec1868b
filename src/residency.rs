//! Residency Module
//!
//! Tracks which pages are held in memory and in what order they were loaded.
//!
//! ## Responsibilities
//! - Own every resident page exclusively
//! - Record load order (oldest first) for eviction
//! - Keep the page map and the load-order queue in lockstep
//!
//! ## Eviction Order
//! ```text
//!   front (oldest load)                     back (newest load)
//!   ┌──────┬──────┬──────┬──────┐
//!   │  p3  │  p7  │  p1  │  p9  │  ← just materialized
//!   └──────┴──────┴──────┴──────┘
//!      ▲
//!      └── next victim, unless it is the page being protected
//! ```

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Resident page set plus its load-order queue
#[derive(Debug)]
pub struct Residency<K, P> {
    /// Resident pages keyed by page key
    pages: HashMap<K, P>,

    /// Page keys in load order, oldest first
    queue: VecDeque<K>,
}

impl<K, P> Residency<K, P>
where
    K: Clone + Eq + Hash,
{
    /// Create an empty residency set
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            queue: VecDeque::new(),
        }
    }

    /// Install a page as the most recently loaded one
    ///
    /// Re-inserting a resident key replaces the page and moves the key to
    /// the back of the queue, so the queue never holds duplicates.
    pub fn insert(&mut self, key: K, page: P) {
        if self.pages.insert(key.clone(), page).is_some() {
            self.queue.retain(|queued| queued != &key);
        }
        self.queue.push_back(key);
    }

    /// Remove a page from both the map and the queue
    pub fn remove(&mut self, key: &K) -> Option<P> {
        let page = self.pages.remove(key)?;
        self.queue.retain(|queued| queued != key);
        Some(page)
    }

    pub fn get(&self, key: &K) -> Option<&P> {
        self.pages.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut P> {
        self.pages.get_mut(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.pages.contains_key(key)
    }

    /// Number of resident pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Resident page keys in load order, oldest first
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.queue.iter()
    }

    /// Oldest resident page key
    pub fn oldest(&self) -> Option<&K> {
        self.queue.iter().find(|key| self.pages.contains_key(*key))
    }

    /// Pick the next page to evict
    ///
    /// Returns the oldest resident key. If that key is `protected` it is
    /// moved to the back of the queue once and the new front is chosen
    /// instead. Queue entries without a resident page are discarded on the
    /// way. Returns `None` when only the protected page is left.
    pub fn next_victim(&mut self, protected: &K) -> Option<K> {
        let mut rotated = false;

        while let Some(front) = self.queue.front() {
            if !self.pages.contains_key(front) {
                self.queue.pop_front();
                continue;
            }

            if front == protected {
                if rotated {
                    return None;
                }
                if let Some(key) = self.queue.pop_front() {
                    self.queue.push_back(key);
                }
                rotated = true;
                continue;
            }

            return Some(front.clone());
        }

        None
    }
}

impl<K, P> Default for Residency<K, P>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
