use dashmap::DashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

pub trait GetOrdKey {
    type Output: Ord + Clone;
    fn get_order_key(&self) -> Self::Output;

    /// Values answering false are never chosen for eviction.
    fn is_evictable(&self) -> bool {
        true
    }
}

/// Multimap keeping values per key in insertion order, bounded in the total
/// number of values. Writers serialize on `lock_key`, which also holds the
/// value count; readers go straight to the shards.
pub struct LimitedMap<K, V> {
    records: DashMap<K, Vec<V>>,
    limit: usize,
    lock_key: Mutex<usize>,
}

impl<K, V> LimitedMap<K, V>
    where K: Eq + Hash + Clone, V: Clone + GetOrdKey {
    pub fn from(limit: usize) -> Self {
        LimitedMap {
            records: DashMap::new(),
            limit: limit.max(1),
            lock_key: Mutex::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        // the count stays consistent even if a writer panicked
        self.lock_key.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: &K) -> Vec<V> {
        self.records.get(key).map(|r| r.value().clone()).unwrap_or_default()
    }

    pub fn insert(&self, key: K, value: V) {
        let mut count = self.lock();
        self.insert_locked(&mut count, key, value);
    }

    fn insert_locked(&self, count: &mut usize, key: K, value: V) {
        //full: drop the tenth with the smallest order key first
        if *count >= self.limit {
            *count -= self.evict();
        }
        self.records.entry(key).or_insert_with(Vec::new).push(value);
        *count += 1;
    }

    /// Applies `update` to the first value under `key` accepted by `matches`,
    /// or inserts `new()` when there is none. Returns the resulting value.
    pub fn update_or_insert<F, U, N>(&self, key: K, matches: F, update: U, new: N) -> V
        where F: Fn(&V) -> bool, U: FnOnce(&mut V), N: FnOnce() -> V {
        let mut count = self.lock();
        if let Some(mut bucket) = self.records.get_mut(&key) {
            if let Some(value) = bucket.iter_mut().find(|v| matches(v)) {
                update(value);
                return value.clone();
            }
        }
        let value = new();
        self.insert_locked(&mut count, key, value.clone());
        value
    }

    /// Drops the values under `key` accepted by `matches`, then appends
    /// `value`. Returns how many values were dropped.
    pub fn replace<F>(&self, key: K, matches: F, value: V) -> usize where F: Fn(&V) -> bool {
        let mut count = self.lock();
        let mut removed = 0;
        if let Some(mut bucket) = self.records.get_mut(&key) {
            let before = bucket.len();
            bucket.retain(|v| !matches(v));
            removed = before - bucket.len();
        }
        *count -= removed;
        self.insert_locked(&mut count, key, value);
        removed
    }

    fn evict(&self) -> usize {
        let mut vec = Vec::new();
        self.records.iter().for_each(|e| {
            e.value().iter().enumerate()
                .filter(|(_, v)| v.is_evictable())
                .for_each(|(index, v)| vec.push((e.key().clone(), index, v.get_order_key())))
        });
        vec.sort_unstable_by(|a, b| a.2.cmp(&b.2));
        let mut victims: Vec<(K, usize)> = vec.into_iter()
            .take((self.limit / 10).max(1))
            .map(|(key, index, _)| (key, index))
            .collect();
        // highest index first so earlier removals do not shift later ones
        victims.sort_unstable_by(|a, b| b.1.cmp(&a.1));
        let removed = victims.len();
        if removed == 0 {
            return 0;
        }
        for (key, index) in victims {
            if let Some(mut bucket) = self.records.get_mut(&key) {
                bucket.remove(index);
            }
        }
        self.records.retain(|_, bucket| !bucket.is_empty());
        removed
    }

    /// Keeps the values accepted by `f` and returns the removed ones.
    pub fn retain<F>(&self, mut f: F) -> Vec<V> where F: FnMut(&K, &V) -> bool {
        let mut count = self.lock();
        let mut removed = Vec::new();
        self.records.retain(|key, bucket| {
            let mut kept = Vec::with_capacity(bucket.len());
            for value in bucket.drain(..) {
                if f(key, &value) {
                    kept.push(value);
                } else {
                    removed.push(value);
                }
            }
            *bucket = kept;
            !bucket.is_empty()
        });
        *count -= removed.len();
        removed
    }

    pub fn clear(&self) {
        let mut count = self.lock();
        self.records.clear();
        *count = 0;
    }

    pub fn len(&self) -> usize {
        *self.lock()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> Vec<V> {
        self.records.iter().flat_map(|e| e.value().clone()).collect()
    }
}
