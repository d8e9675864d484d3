//! Arena-backed LRU keyed by an ordered id pair.

use crate::errors::{Result, StrataError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;

/// Direction-sensitive cache key: `(a, b)` and `(b, a)` are different keys.
///
/// The ids are kept apart rather than concatenated, so ids that contain the
/// display separator cannot collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub from: String,
    pub to: String,
}

impl CacheKey {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.from, self.to)
    }
}

/// A stored value and the time it was written
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub data: V,
    pub inserted_at: DateTime<Utc>,
}

/// Read-only cache introspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    /// Keys in `from|to` form, least- to most-recently used
    pub keys: Vec<String>,
}

#[derive(Debug)]
struct Node<V> {
    key: CacheKey,
    entry: CacheEntry<V>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Bounded least-recently-used cache
///
/// Nodes live in a `Vec` and are linked by index; `head` is the least
/// recently used node and `tail` the most recent. Slots are never freed
/// individually: once the cache is full, eviction reuses the head slot for
/// the incoming entry.
#[derive(Debug)]
pub struct PairCache<V> {
    index: HashMap<CacheKey, usize>,
    slots: Vec<Node<V>>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: NonZeroUsize,
}

impl<V> PairCache<V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity.get()),
            slots: Vec::with_capacity(capacity.get()),
            head: None,
            tail: None,
            capacity,
        }
    }

    /// # Errors
    ///
    /// `InvalidCacheCapacity` when `capacity` is zero
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        NonZeroUsize::new(capacity)
            .map(Self::new)
            .ok_or(StrataError::InvalidCacheCapacity)
    }

    /// Look up `(from, to)` and mark it most recently used.
    ///
    /// `None` is the miss signal; a hit always carries the stored value.
    pub fn get(&mut self, from: &str, to: &str) -> Option<&V> {
        let idx = *self.index.get(&CacheKey::new(from, to))?;
        self.touch(idx);
        Some(&self.slots[idx].entry.data)
    }

    /// Look up an entry without changing recency order
    pub fn peek(&self, from: &str, to: &str) -> Option<&CacheEntry<V>> {
        self.index
            .get(&CacheKey::new(from, to))
            .map(|&idx| &self.slots[idx].entry)
    }

    /// Insert or overwrite `(from, to)` as the most recently used entry.
    ///
    /// Overwriting never evicts. Inserting a new key into a full cache
    /// evicts exactly one entry, the least recently used, whose key is
    /// returned.
    pub fn set(&mut self, from: &str, to: &str, data: V) -> Option<CacheKey> {
        let key = CacheKey::new(from, to);
        let entry = CacheEntry {
            data,
            inserted_at: Utc::now(),
        };

        if let Some(&idx) = self.index.get(&key) {
            self.slots[idx].entry = entry;
            self.touch(idx);
            return None;
        }

        if self.slots.len() >= self.capacity.get() {
            if let Some(lru) = self.head {
                self.detach(lru);
                let evicted = std::mem::replace(&mut self.slots[lru].key, key.clone());
                self.index.remove(&evicted);
                self.slots[lru].entry = entry;
                self.index.insert(key, lru);
                self.attach_tail(lru);
                return Some(evicted);
            }
        }

        let idx = self.slots.len();
        self.slots.push(Node {
            key: key.clone(),
            entry,
            prev: None,
            next: None,
        });
        self.index.insert(key, idx);
        self.attach_tail(idx);
        None
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.head = None;
        self.tail = None;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            max_size: self.capacity.get(),
            keys: self.keys_lru_order().map(|k| k.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Membership test; does not refresh recency
    pub fn contains(&self, from: &str, to: &str) -> bool {
        self.index.contains_key(&CacheKey::new(from, to))
    }

    fn keys_lru_order(&self) -> impl Iterator<Item = &CacheKey> + '_ {
        std::iter::successors(self.head, move |&idx| self.slots[idx].next)
            .map(move |idx| &self.slots[idx].key)
    }

    fn touch(&mut self, idx: usize) {
        if self.tail != Some(idx) {
            self.detach(idx);
            self.attach_tail(idx);
        }
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
        self.slots[idx].prev = None;
        self.slots[idx].next = None;
    }

    fn attach_tail(&mut self, idx: usize) {
        self.slots[idx].prev = self.tail;
        self.slots[idx].next = None;
        match self.tail {
            Some(t) => self.slots[t].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }
}

impl<V> Default for PairCache<V> {
    fn default() -> Self {
        Self::new(super::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(cap: usize) -> PairCache<u32> {
        PairCache::with_capacity(cap).unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            PairCache::<u32>::with_capacity(0),
            Err(StrataError::InvalidCacheCapacity)
        ));
    }

    #[test]
    fn test_default_capacity_is_100() {
        let c: PairCache<u32> = PairCache::default();
        assert_eq!(c.capacity().get(), 100);
        assert!(c.is_empty());
    }

    #[test]
    fn test_single_slot_cache_replaces_in_place() {
        let mut c = cache(1);
        assert_eq!(c.set("a", "b", 1), None);
        assert_eq!(c.set("c", "d", 2), Some(CacheKey::new("a", "b")));
        assert_eq!(c.get("a", "b"), None);
        assert_eq!(c.get("c", "d"), Some(&2));
        assert_eq!(c.stats().keys, vec!["c|d"]);
    }

    #[test]
    fn test_links_stay_consistent_after_middle_touch() {
        let mut c = cache(3);
        c.set("1", "x", 1);
        c.set("2", "x", 2);
        c.set("3", "x", 3);
        c.get("2", "x");
        assert_eq!(c.stats().keys, vec!["1|x", "3|x", "2|x"]);
        c.get("1", "x");
        assert_eq!(c.stats().keys, vec!["3|x", "2|x", "1|x"]);
        assert_eq!(c.set("4", "x", 4), Some(CacheKey::new("3", "x")));
        assert_eq!(c.stats().keys, vec!["2|x", "1|x", "4|x"]);
    }

    #[test]
    fn test_peek_does_not_refresh() {
        let mut c = cache(2);
        c.set("a", "b", 1);
        c.set("c", "d", 2);
        assert_eq!(c.peek("a", "b").map(|e| e.data), Some(1));
        c.set("e", "f", 3);
        assert!(!c.contains("a", "b"));
    }

    #[test]
    fn test_separator_in_ids_does_not_collide() {
        let mut c = cache(4);
        c.set("a|b", "c", 1);
        c.set("a", "b|c", 2);
        assert_eq!(c.len(), 2);
        assert_eq!(c.get("a|b", "c"), Some(&1));
        assert_eq!(c.get("a", "b|c"), Some(&2));
    }
}
