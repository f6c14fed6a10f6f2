//! The in-memory collection of attendance records.

use chrono::NaiveDate;
use log::debug;

use crate::models::AttendanceRecord;

/// What [`RecordStore::upsert`] did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// Attendance records, at most one per class per day.
///
/// Records are only ever added or replaced, never removed.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: Vec<AttendanceRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from existing records. Later records win over earlier ones with the same key.
    pub fn from_records(records: impl IntoIterator<Item = AttendanceRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.upsert(record);
        }
        store
    }

    /// Inserts a record, replacing the existing record for the same class and day if there is one.
    pub fn upsert(&mut self, record: AttendanceRecord) -> Upsert {
        match self
            .records
            .iter_mut()
            .find(|existing| existing.is_for(&record.class_id, record.date))
        {
            Some(existing) => {
                debug!("Replacing attendance record {}", record.id);
                *existing = record;
                Upsert::Replaced
            }
            None => {
                debug!("Adding attendance record {}", record.id);
                self.records.push(record);
                Upsert::Inserted
            }
        }
    }

    /// Returns every record matching `predicate`, in store order.
    pub fn query<P>(&self, mut predicate: P) -> Vec<&AttendanceRecord>
    where
        P: FnMut(&AttendanceRecord) -> bool,
    {
        self.records
            .iter()
            .filter(|record| predicate(record))
            .collect()
    }

    pub fn get(&self, class_id: &str, date: NaiveDate) -> Option<&AttendanceRecord> {
        self.records
            .iter()
            .find(|record| record.is_for(class_id, date))
    }

    pub fn for_class(&self, class_id: &str) -> Vec<&AttendanceRecord> {
        self.query(|record| record.class_id == class_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttendanceRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn record(
        class_id: &str,
        date: NaiveDate,
        present: &[&str],
        absent: &[&str],
    ) -> AttendanceRecord {
        let to_set = |ids: &[&str]| {
            ids.iter()
                .map(|id| id.to_string())
                .collect::<BTreeSet<_>>()
        };
        AttendanceRecord::new(class_id, date, to_set(present), to_set(absent))
    }

    #[test]
    fn upsert_appends_new_keys() {
        let mut store = RecordStore::new();

        assert_eq!(store.upsert(record("1", day(3), &["1"], &[])), Upsert::Inserted);
        assert_eq!(store.upsert(record("1", day(4), &["1"], &[])), Upsert::Inserted);
        assert_eq!(store.upsert(record("2", day(3), &["1"], &[])), Upsert::Inserted);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn upsert_replaces_same_class_and_day() {
        let mut store = RecordStore::new();
        store.upsert(record("1", day(3), &["1", "2"], &[]));
        store.upsert(record("1", day(4), &["1", "2"], &[]));

        let replacement = record("1", day(3), &["1"], &["2"]);
        assert_eq!(store.upsert(replacement.clone()), Upsert::Replaced);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("1", day(3)), Some(&replacement));
    }

    #[test]
    fn query_filters_in_store_order() {
        let store = RecordStore::from_records(vec![
            record("1", day(3), &["1"], &[]),
            record("2", day(3), &["1"], &[]),
            record("1", day(4), &["1"], &[]),
        ]);

        let dates: Vec<NaiveDate> = store.for_class("1").iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(3), day(4)]);

        assert!(store.query(|r| r.date == day(5)).is_empty());
    }

    #[test]
    fn iter_can_be_walked_more_than_once() {
        let store = RecordStore::from_records(vec![
            record("1", day(3), &["1"], &[]),
            record("2", day(4), &["1"], &["2"]),
        ]);

        let records = store.iter();
        let again = records.clone();

        assert_eq!(records.count(), 2);
        assert_eq!(again.map(|r| r.total_students).sum::<usize>(), 3);
    }
}
