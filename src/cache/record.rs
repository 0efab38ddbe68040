use crate::cache::limit_map::GetOrdKey;
use crate::protocol::ResourceRecord;
use crate::system::get_now;

/// Grace period kept for a record observed with ttl 0.
const GOODBYE_TTL_MS: u128 = 1000;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct EntryId(pub(crate) u64);

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub id: EntryId,
    pub record: ResourceRecord,
    pub create_time: u128,
    /// `None` for records this host advertises; they live until withdrawn.
    pub ttl_ms: Option<u128>,
}

impl CacheEntry {
    pub fn observed(id: EntryId, record: ResourceRecord, now: u128) -> Self {
        let ttl_ms = ttl_ms(record.ttl);
        CacheEntry {
            id,
            record,
            create_time: now,
            ttl_ms: Some(ttl_ms),
        }
    }

    pub fn local(id: EntryId, record: ResourceRecord, now: u128) -> Self {
        CacheEntry {
            id,
            record,
            create_time: now,
            ttl_ms: None,
        }
    }

    pub fn is_local(&self) -> bool {
        self.ttl_ms.is_none()
    }

    pub fn is_expired(&self, now: u128) -> bool {
        match self.ttl_ms {
            Some(ttl_ms) => ttl_ms < now.saturating_sub(self.create_time),
            None => false,
        }
    }

    pub fn get_remain_time(&self, now: u128) -> u128 {
        match self.ttl_ms {
            Some(ttl_ms) => ttl_ms.saturating_sub(now.saturating_sub(self.create_time)),
            None => u128::MAX,
        }
    }

    /// Restarts the lifetime with the ttl of a fresh observation.
    pub fn refresh(&mut self, ttl: u32, now: u128) {
        if self.is_local() {
            return;
        }
        self.record.ttl = ttl;
        self.create_time = now;
        self.ttl_ms = Some(ttl_ms(ttl));
    }
}

fn ttl_ms(ttl: u32) -> u128 {
    if ttl == 0 {
        GOODBYE_TTL_MS
    } else {
        ttl as u128 * 1000
    }
}

impl GetOrdKey for CacheEntry {
    type Output = u128;
    fn get_order_key(&self) -> Self::Output {
        self.get_remain_time(get_now())
    }

    fn is_evictable(&self) -> bool {
        !self.is_local()
    }
}

#[cfg(test)]
pub mod tests {
    use crate::cache::limit_map::GetOrdKey;
    use crate::cache::record::{CacheEntry, EntryId};
    use crate::protocol::ResourceRecord;
    use crate::system::TIME;

    pub fn get_test_record(ttl: u32) -> ResourceRecord {
        ResourceRecord::pointer("_presence._tcp.local", "alice._presence._tcp.local", ttl)
    }

    fn get_test_entry() -> CacheEntry {
        CacheEntry::observed(EntryId(1), get_test_record(1), 0)
    }

    #[test]
    fn should_return_true_when_check_expired_given_expired() {
        let entry = get_test_entry();

        let result = entry.is_expired(1001);

        assert!(result)
    }

    #[test]
    fn should_return_false_when_check_expired_given_not_expired() {
        let entry = get_test_entry();

        let result = entry.is_expired(999);

        assert!(!result)
    }

    #[test]
    fn should_return_remain_time_when_get_remain_time_given_not_expired() {
        let entry = get_test_entry();

        let result = entry.get_remain_time(999);

        assert_eq!(1, result)
    }

    #[test]
    fn should_return_0_when_get_remain_time_given_expired() {
        let entry = get_test_entry();

        let result = entry.get_remain_time(1001);

        assert_eq!(0, result)
    }

    #[test]
    fn should_keep_one_second_when_observed_given_goodbye_record() {
        let entry = CacheEntry::observed(EntryId(1), get_test_record(0), 0);

        assert!(!entry.is_expired(1000));
        assert!(entry.is_expired(1001))
    }

    #[test]
    fn should_never_expire_when_check_expired_given_local_entry() {
        let entry = CacheEntry::local(EntryId(1), get_test_record(1), 0);

        assert!(!entry.is_expired(u128::MAX))
    }

    #[test]
    fn should_restart_lifetime_when_refresh_given_new_ttl() {
        let mut entry = get_test_entry();

        entry.refresh(120, 5000);

        assert_eq!(120, entry.record.ttl);
        assert!(!entry.is_expired(124_000));
        assert!(entry.is_expired(125_001))
    }

    #[test]
    fn should_return_remain_time_when_get_order_key_given_test_entry() {
        let entry = get_test_entry();
        TIME.with(|t| {
            t.borrow_mut().set_timestamp(999);
        });

        let result: u128 = entry.get_order_key();

        assert_eq!(1, result)
    }
}
