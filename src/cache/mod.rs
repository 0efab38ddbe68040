mod limit_map;
mod record;

use crate::config::Config;
use crate::protocol::{encode_answers, Question, ResourceRecord, RESPONSE_FLAGS};
use crate::system::get_now;
use limit_map::LimitedMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub use record::{CacheEntry, EntryId};

type CacheKey = (String, u16);

/// Records observed on the link or advertised by this host, keyed by
/// (name, type) and kept in insertion order. Shared between the receive loop
/// and whoever advertises, so every write goes through the map's lock.
pub struct RecordCache {
    map: LimitedMap<CacheKey, CacheEntry>,
    next_id: AtomicU64,
}

fn key_of(record: &ResourceRecord) -> CacheKey {
    (record.name.clone(), record.get_type())
}

impl RecordCache {
    pub fn new(limit: usize) -> Self {
        RecordCache {
            map: LimitedMap::from(limit),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn from(config: &Config) -> Self {
        RecordCache::new(config.cache_limit)
    }

    fn next_id(&self) -> EntryId {
        EntryId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Appends an observed record; identical records are not merged.
    pub fn add(&self, record: ResourceRecord) -> EntryId {
        let entry = CacheEntry::observed(self.next_id(), record, get_now());
        let id = entry.id;
        self.map.insert(key_of(&entry.record), entry);
        id
    }

    /// Appends a record this host advertises. It never expires.
    pub fn add_local(&self, record: ResourceRecord) -> EntryId {
        let entry = CacheEntry::local(self.next_id(), record, get_now());
        let id = entry.id;
        self.map.insert(key_of(&entry.record), entry);
        id
    }

    /// Stores a record this host advertises in place of earlier local records
    /// with the same name and type, as the cache-flush bit asks of peers.
    pub fn replace_local(&self, record: ResourceRecord) -> EntryId {
        let entry = CacheEntry::local(self.next_id(), record, get_now());
        let id = entry.id;
        let class = entry.record.class;
        let superseded = self.map.replace(
            key_of(&entry.record),
            |e| e.is_local() && e.record.class == class,
            entry,
        );
        if superseded > 0 {
            debug!("{} local record(s) superseded", superseded);
        }
        id
    }

    /// Stores a copy of a record seen in a datagram. A record already held
    /// with the same data has its lifetime restarted instead of being
    /// appended again, so our own looped-back responses do not pile up.
    pub fn ingest(&self, record: &ResourceRecord) -> EntryId {
        let now = get_now();
        let entry = self.map.update_or_insert(
            key_of(record),
            |e| e.record.same_data(record),
            |e| e.refresh(record.ttl, now),
            || CacheEntry::observed(self.next_id(), record.clone(), now),
        );
        entry.id
    }

    pub fn remove(&self, id: EntryId) -> Option<ResourceRecord> {
        self.map.retain(|_, e| e.id != id).pop().map(|e| e.record)
    }

    /// Drops the local copies of `record`, used before sending its goodbye.
    pub fn withdraw_local(&self, record: &ResourceRecord) -> usize {
        self.map.retain(|_, e| !(e.is_local() && e.record.same_data(record))).len()
    }

    pub fn remove_all(&self) {
        self.map.clear();
        debug!("record cache cleared");
    }

    /// Removes observed entries whose ttl has run out.
    pub fn sweep(&self, now: u128) -> usize {
        let removed = self.map.retain(|_, e| !e.is_expired(now));
        for entry in removed.iter() {
            debug!("record expired: {}", entry.record);
        }
        removed.len()
    }

    /// Cached records answering `question`, in cache order.
    pub fn answers(&self, question: &Question) -> Vec<ResourceRecord> {
        self.map
            .get(&(question.name.clone(), question._type))
            .into_iter()
            .map(|e| e.record)
            .collect()
    }

    /// One single-answer authoritative response datagram per matching record.
    pub fn respond(&self, question: &Question) -> Vec<Vec<u8>> {
        let mut datagrams = Vec::new();
        for record in self.answers(question) {
            match encode_answers(RESPONSE_FLAGS, std::slice::from_ref(&record)) {
                Ok(bytes) => datagrams.push(bytes),
                Err(e) => error!("failed to encode cached answer {}: {}", record, e),
            }
        }
        datagrams
    }

    /// Every entry, oldest first.
    pub fn entries(&self) -> Vec<CacheEntry> {
        let mut entries = self.map.values();
        entries.sort_by_key(|e| e.id);
        entries
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
