use std::fmt;
use serde::{Deserialize, Serialize};

use super::Timestamp;

/// A closed interval `[start, end]` on the time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeRange {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Same interval with the endpoints in ascending order
    pub fn normalized(self) -> Self {
        if self.is_inverted() {
            Self::new(self.end, self.start)
        } else {
            self
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    pub fn contains(&self, time: Timestamp) -> bool {
        self.start <= time && time <= self.end
    }

    pub fn contains_range(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn intersects(&self, other: &TimeRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Clamp both endpoints into `bounds` independently.
    ///
    /// No ordering check is made on the result; a range disjoint from
    /// `bounds` comes back inverted.
    pub fn clamp_to(&self, bounds: &TimeRange) -> TimeRange {
        TimeRange::new(self.start.max(bounds.start), self.end.min(bounds.end))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn t(secs: i64) -> Timestamp {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_clamp_to_bounds() {
        let bounds = TimeRange::new(t(10), t(20));
        let clamped = TimeRange::new(t(0), t(15)).clamp_to(&bounds);
        assert_eq!(clamped, TimeRange::new(t(10), t(15)));
        assert!(bounds.contains_range(&clamped));
    }

    #[test]
    fn test_clamp_disjoint_range_is_inverted() {
        let bounds = TimeRange::new(t(10), t(20));
        let clamped = TimeRange::new(t(0), t(5)).clamp_to(&bounds);
        assert!(clamped.is_inverted());
        assert!(!bounds.intersects(&TimeRange::new(t(0), t(5))));
    }

    #[test]
    fn test_normalized_swaps_endpoints() {
        let range = TimeRange::new(t(5), t(1)).normalized();
        assert_eq!(range, TimeRange::new(t(1), t(5)));
        assert_eq!(range.duration(), chrono::Duration::seconds(4));
    }
}
