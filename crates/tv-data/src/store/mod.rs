//! Time-ordered record storage

use std::ops::Range;
use std::sync::Arc;

use tv_core::{TimeRange, Timestamp};
use crate::index::NearestPointLocator;
use crate::record::{FieldIndex, Record};

/// Parsed records of one load, in source order.
///
/// Source order is trusted to be ascending by timestamp; it is checked once
/// and a warning is logged if it is not, but records are never re-sorted.
#[derive(Debug)]
pub struct RecordStore {
    records: Vec<Record>,
    fields: Arc<FieldIndex>,
    extent: Option<TimeRange>,
    sorted: bool,
}

impl RecordStore {
    pub fn new(records: Vec<Record>, fields: Arc<FieldIndex>) -> Self {
        let extent = records
            .iter()
            .map(|r| r.timestamp)
            .fold(None, |acc: Option<TimeRange>, t| match acc {
                None => Some(TimeRange::new(t, t)),
                Some(range) => Some(TimeRange::new(range.start.min(t), range.end.max(t))),
            });

        let sorted = records.windows(2).all(|w| w[0].timestamp <= w[1].timestamp);
        if !sorted {
            tracing::warn!(
                "Records are not in ascending time order; window lookups may be inaccurate"
            );
        }

        Self {
            records,
            fields,
            extent,
            sorted,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Arc::new(FieldIndex::new()))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn fields(&self) -> &FieldIndex {
        &self.fields
    }

    /// `[min timestamp, max timestamp]`, `None` for an empty store
    pub fn extent(&self) -> Option<TimeRange> {
        self.extent
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Index range of the records whose timestamps fall inside `range`
    pub fn range_indices(&self, range: &TimeRange) -> Range<usize> {
        let start = self.records.partition_point(|r| r.timestamp < range.start);
        let end = self.records.partition_point(|r| r.timestamp <= range.end);
        start..end.max(start)
    }

    /// Full-resolution records inside `range`
    pub fn slice_in(&self, range: &TimeRange) -> &[Record] {
        &self.records[self.range_indices(range)]
    }

    /// Index of the record nearest to `time`
    pub fn nearest_index(&self, time: Timestamp) -> Option<usize> {
        NearestPointLocator::new(&self.records).nearest_index(time)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use crate::record::Value;

    pub(crate) fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
    }

    /// Store with a single numeric field `v` holding the row index
    pub(crate) fn store_at(seconds: &[i64]) -> RecordStore {
        let mut fields = FieldIndex::new();
        fields.insert("v");
        let fields = Arc::new(fields);
        let records = seconds
            .iter()
            .enumerate()
            .map(|(i, &s)| Record::new(at(s), None, None, fields.clone(), vec![Value::Number(i as f64)]))
            .collect();
        RecordStore::new(records, fields)
    }

    #[test]
    fn test_extent() {
        let store = store_at(&[0, 5, 9]);
        assert_eq!(store.extent(), Some(TimeRange::new(at(0), at(9))));
        assert!(store.is_sorted());
        assert_eq!(RecordStore::empty().extent(), None);
    }

    #[test]
    fn test_extent_of_unsorted_input_uses_min_and_max() {
        let store = store_at(&[5, 0, 9, 3]);
        assert!(!store.is_sorted());
        assert_eq!(store.extent(), Some(TimeRange::new(at(0), at(9))));
        // Source order untouched
        assert_eq!(store.records()[0].timestamp, at(5));
    }

    #[test]
    fn test_slice_in_is_inclusive() {
        let store = store_at(&[0, 1, 2, 3, 4, 5]);
        let slice = store.slice_in(&TimeRange::new(at(2), at(4)));
        let values: Vec<_> = slice.iter().map(|r| r.timestamp).collect();
        assert_eq!(values, vec![at(2), at(3), at(4)]);

        assert!(store.slice_in(&TimeRange::new(at(10), at(20))).is_empty());
        assert!(store.slice_in(&TimeRange::new(at(4), at(2))).is_empty());
    }
}
