//! Nearest-timestamp lookup for cursor snapping

use tv_core::Timestamp;
use crate::record::Record;

/// Binary-search lookup over records sorted by ascending timestamp
pub struct NearestPointLocator<'a> {
    records: &'a [Record],
}

impl<'a> NearestPointLocator<'a> {
    pub fn new(records: &'a [Record]) -> Self {
        Self { records }
    }

    /// Index of the record closest to `query`.
    ///
    /// Outside the data the first or last record is returned. Between two
    /// records the strictly closer one wins; on a tie the later record wins.
    pub fn nearest_index(&self, query: Timestamp) -> Option<usize> {
        if self.records.is_empty() {
            return None;
        }

        let idx = self.records.partition_point(|r| r.timestamp < query);
        if idx == 0 {
            return Some(0);
        }
        if idx == self.records.len() {
            return Some(idx - 1);
        }

        let before = query - self.records[idx - 1].timestamp;
        let after = self.records[idx].timestamp - query;
        if before < after {
            Some(idx - 1)
        } else {
            Some(idx)
        }
    }

    pub fn nearest(&self, query: Timestamp) -> Option<&'a Record> {
        self.nearest_index(query).map(|i| &self.records[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{at, store_at};

    fn nearest(seconds: &[i64], query: i64) -> Option<usize> {
        let store = store_at(seconds);
        NearestPointLocator::new(store.records()).nearest_index(at(query))
    }

    #[test]
    fn test_exact_match_returns_that_record() {
        let seconds = [0, 10, 20, 30];
        for (i, &s) in seconds.iter().enumerate() {
            assert_eq!(nearest(&seconds, s), Some(i));
        }
    }

    #[test]
    fn test_outside_range_clamps() {
        assert_eq!(nearest(&[10, 20, 30], -100), Some(0));
        assert_eq!(nearest(&[10, 20, 30], 100), Some(2));
    }

    #[test]
    fn test_strictly_closer_neighbour_wins() {
        assert_eq!(nearest(&[0, 10], 4), Some(0));
        assert_eq!(nearest(&[0, 10], 6), Some(1));
    }

    #[test]
    fn test_tie_goes_to_successor() {
        assert_eq!(nearest(&[0, 10, 20], 5), Some(1));
        assert_eq!(nearest(&[0, 10, 20], 15), Some(2));
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(nearest(&[], 5), None);
        assert_eq!(nearest(&[7], 5), Some(0));
        assert_eq!(nearest(&[7], 9), Some(0));
    }

    #[test]
    fn test_returns_record() {
        let store = store_at(&[0, 10, 20]);
        let record = NearestPointLocator::new(store.records()).nearest(at(12)).unwrap();
        assert_eq!(record.timestamp, at(10));
        assert_eq!(store.nearest_index(at(19)), Some(2));
    }
}
