//! Run-length segmentation of one field over time
//!
//! A field's values are split into maximal runs. Runs of a present value
//! become [`Segment`]s, runs of missing values become [`Gap`]s. Each run ends
//! at the timestamp of the record that starts the next run; the final run
//! ends at the last record. Segments and gaps together tile
//! `[first timestamp, last timestamp]` without overlap.

use tv_core::{TimeRange, Timestamp};
use crate::record::{Record, Value};

/// Contiguous run of one present value
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub value: Value,
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Contiguous run of missing values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Either kind of run, for consumers that want them in time order
#[derive(Debug, Clone, PartialEq)]
pub enum Interval {
    Segment(Segment),
    Gap(Gap),
}

impl Interval {
    pub fn start(&self) -> Timestamp {
        match self {
            Interval::Segment(s) => s.start,
            Interval::Gap(g) => g.start,
        }
    }

    pub fn end(&self) -> Timestamp {
        match self {
            Interval::Segment(s) => s.end,
            Interval::Gap(g) => g.end,
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start(), self.end())
    }
}

/// Segments and gaps of one field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSegments {
    pub segments: Vec<Segment>,
    pub gaps: Vec<Gap>,
}

impl FieldSegments {
    /// Segments and gaps merged in time order
    pub fn intervals(&self) -> Vec<Interval> {
        let mut intervals: Vec<Interval> = self
            .segments
            .iter()
            .cloned()
            .map(Interval::Segment)
            .chain(self.gaps.iter().copied().map(Interval::Gap))
            .collect();
        // Duplicate timestamps give zero-width runs; ordering by end keeps them ahead
        intervals.sort_by_key(|i| (i.start(), i.end()));
        intervals
    }
}

pub struct SegmentEncoder;

impl SegmentEncoder {
    /// Encode `field` over time-ordered `records`
    pub fn encode(records: &[Record], field: &str) -> FieldSegments {
        let mut out = FieldSegments::default();
        let Some(first) = records.first() else {
            return out;
        };

        let mut run_value = first.value(field);
        let mut run_start = first.timestamp;

        for record in &records[1..] {
            let value = record.value(field);
            if value != run_value {
                Self::close(&mut out, run_value, run_start, record.timestamp);
                run_value = value;
                run_start = record.timestamp;
            }
        }

        let last = records[records.len() - 1].timestamp;
        Self::close(&mut out, run_value, run_start, last);
        out
    }

    /// Present values of `field` in order of first appearance
    pub fn distinct_values(records: &[Record], field: &str) -> Vec<Value> {
        let mut seen: Vec<Value> = Vec::new();
        for record in records {
            let value = record.value(field);
            if !value.is_missing() && !seen.contains(value) {
                seen.push(value.clone());
            }
        }
        seen
    }

    fn close(out: &mut FieldSegments, value: &Value, start: Timestamp, end: Timestamp) {
        if value.is_missing() {
            out.gaps.push(Gap { start, end });
        } else {
            out.segments.push(Segment {
                value: value.clone(),
                start,
                end,
            });
        }
    }
}
