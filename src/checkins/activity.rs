use std::collections::VecDeque;

use crate::models::CheckinRecord;

pub const DEFAULT_RECENT_CAPACITY: usize = 10;

/// Newest-first buffer of recent check-ins with a hard cap.
///
/// `insert` is the only way records get in, so the cap holds by construction.
#[derive(Debug, Clone)]
pub struct RecentActivityLog {
    records: VecDeque<CheckinRecord>,
    capacity: usize,
}

impl RecentActivityLog {
    /// A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Seeds the log from records that are already newest first. Anything
    /// past the capacity is dropped from the old end.
    pub fn from_newest_first(capacity: usize, records: Vec<CheckinRecord>) -> Self {
        let mut log = Self::new(capacity);
        for record in records.into_iter().rev() {
            log.insert(record);
        }
        log
    }

    /// Prepends `record`; returns the evicted tail record if the log was full.
    pub fn insert(&mut self, record: CheckinRecord) -> Option<CheckinRecord> {
        self.records.push_front(record);
        if self.records.len() > self.capacity {
            self.records.pop_back()
        } else {
            None
        }
    }

    pub fn age_all(&mut self, delta_minutes: f64) {
        for record in self.records.iter_mut() {
            record.advance_age(delta_minutes);
        }
    }

    pub fn top_n(&self, n: usize) -> Vec<CheckinRecord> {
        self.records.iter().take(n).cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckinRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RecentActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest(name: &str) -> CheckinRecord {
        CheckinRecord::arrive(
            name,
            ["Deep House", "Tech House", "Club Pop"].map(String::from),
        )
        .unwrap()
    }

    #[test]
    fn test_eleventh_insert_evicts_first() {
        let mut log = RecentActivityLog::default();
        let mut evicted = Vec::new();
        for i in 0..11 {
            if let Some(old) = log.insert(guest(&format!("Guest {i}"))) {
                evicted.push(old);
            }
            assert!(log.len() <= 10);
        }

        assert_eq!(log.len(), 10);
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].guest_name(), "Guest 0");

        let front = &log.top_n(1)[0];
        assert_eq!(front.guest_name(), "Guest 10");
        assert_eq!(front.age_minutes(), 0.0);
        assert!(log.iter().all(|r| r.guest_name() != "Guest 0"));
    }

    #[test]
    fn test_newest_first_order() {
        let mut log = RecentActivityLog::new(5);
        for name in ["a", "b", "c"] {
            log.insert(guest(name));
        }
        let names: Vec<_> = log.iter().map(|r| r.guest_name().to_string()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_age_all_is_additive() {
        let mut split = RecentActivityLog::new(3);
        let mut whole = RecentActivityLog::new(3);
        let record = guest("Jamie F.");
        split.insert(record.clone());
        whole.insert(record);

        split.age_all(0.3);
        split.age_all(0.45);
        whole.age_all(0.75);

        let a = split.top_n(1)[0].age_minutes();
        let b = whole.top_n(1)[0].age_minutes();
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_insert_after_aging_starts_fresh() {
        let mut log = RecentActivityLog::new(3);
        log.insert(guest("old"));
        log.age_all(2.0);
        log.insert(guest("new"));

        let records = log.top_n(2);
        assert_eq!(records[0].age_minutes(), 0.0);
        assert_eq!(records[1].age_minutes(), 2.0);
    }

    #[test]
    fn test_seed_truncates_oldest() {
        let records: Vec<_> = (0..4).map(|i| guest(&format!("g{i}"))).collect();
        let log = RecentActivityLog::from_newest_first(2, records);
        let names: Vec<_> = log.iter().map(|r| r.guest_name().to_string()).collect();
        assert_eq!(names, vec!["g0", "g1"]);
    }
}
