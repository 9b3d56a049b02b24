//! Deduplicating, order-preserving record accumulator.

use std::collections::HashSet;

use crate::models::{CompositeKey, Record};

/// Records collected during one session, unique by [`CompositeKey`].
///
/// Records are only ever appended. The first occurrence of a key wins and
/// keeps its position.
#[derive(Debug, Default)]
pub struct RecordStore {
    seen: HashSet<CompositeKey>,
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page of rows, returning how many were new.
    pub fn add<I>(&mut self, rows: I) -> usize
    where
        I: IntoIterator<Item = Record>,
    {
        let before = self.records.len();
        for row in rows {
            if self.seen.insert(row.key()) {
                self.records.push(row);
            }
        }
        self.records.len() - before
    }

    pub fn contains(&self, key: &CompositeKey) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in first-seen order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, code: &str) -> Record {
        Record::from_cells([name, "VIA ROMA 1", "00100", "ROMA", "RM", "LAZIO", code, "IT000"])
    }

    #[test]
    fn test_add_counts_new_records() {
        let mut store = RecordStore::new();
        assert_eq!(store.add(vec![record("A", "1"), record("B", "2")]), 2);
        assert_eq!(store.add(vec![record("B", "2"), record("C", "3")]), 1);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut store = RecordStore::new();
        let page = vec![record("A", "1"), record("B", "2"), record("A", "1")];
        assert_eq!(store.add(page.clone()), 2);
        assert_eq!(store.add(page), 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_first_seen_wins() {
        let mut store = RecordStore::new();
        store.add(vec![record("FIRST", "1")]);
        store.add(vec![record("RENAMED", "1"), record("OTHER", "2")]);

        let names: Vec<&str> = store.records().iter().map(Record::denomination).collect();
        assert_eq!(names, vec!["FIRST", "OTHER"]);
    }

    #[test]
    fn test_no_duplicate_keys() {
        let mut store = RecordStore::new();
        for page in 0..5 {
            let rows = (0..10).map(|i| record(&format!("P{}", page), &((page + i) % 7).to_string()));
            store.add(rows);
        }
        let keys: HashSet<CompositeKey> = store.records().iter().map(Record::key).collect();
        assert_eq!(keys.len(), store.len());
        assert_eq!(store.len(), 7);
    }

    #[test]
    fn test_empty_rows_dedupe() {
        let mut store = RecordStore::new();
        let empty = Record::from_cells([""; 8]);
        assert_eq!(store.add(vec![empty.clone(), empty.clone()]), 1);
        assert!(store.contains(&empty.key()));
        assert_eq!(store.add(vec![Record::from_cells(Vec::<String>::new())]), 0);
    }
}
