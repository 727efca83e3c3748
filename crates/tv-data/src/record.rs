//! Record model produced by schema inference

use std::fmt;
use std::sync::Arc;
use indexmap::IndexMap;

use tv_core::Timestamp;

/// A single cell of a plottable field
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(Arc<str>),
    Missing,
}

static MISSING: Value = Value::Missing;

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Missing => f.write_str("missing"),
        }
    }
}

/// Latitude or longitude cell.
///
/// Unparseable or non-finite input is kept as `Invalid` so consumers can
/// skip it instead of plotting NaN.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinate {
    Valid(f64),
    Invalid(Arc<str>),
}

impl Coordinate {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Coordinate::Valid(value),
            _ => Coordinate::Invalid(Arc::from(raw.trim())),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Coordinate::Valid(v) => Some(*v),
            Coordinate::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Coordinate::Valid(_))
    }
}

/// Name → slot mapping shared by every record of one load
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    slots: IndexMap<String, usize>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field name. Returns `false` if the name was already taken.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.slots.contains_key(name) {
            return false;
        }
        let slot = self.slots.len();
        self.slots.insert(name.to_string(), slot);
        true
    }

    pub fn slot(&self, name: &str) -> Option<usize> {
        self.slots.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// One time-stamped observation. Immutable once built.
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: Timestamp,
    pub latitude: Option<Coordinate>,
    pub longitude: Option<Coordinate>,
    fields: Arc<FieldIndex>,
    values: Vec<Value>,
}

impl Record {
    /// `values` must be laid out in `fields` slot order
    pub fn new(
        timestamp: Timestamp,
        latitude: Option<Coordinate>,
        longitude: Option<Coordinate>,
        fields: Arc<FieldIndex>,
        values: Vec<Value>,
    ) -> Self {
        debug_assert_eq!(fields.len(), values.len());
        Self {
            timestamp,
            latitude,
            longitude,
            fields,
            values,
        }
    }

    /// Value of `field`; unknown names read as missing
    pub fn value(&self, field: &str) -> &Value {
        self.get(field).unwrap_or(&MISSING)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.slot(field).and_then(|slot| self.values.get(slot))
    }

    /// Iterate `(field name, value)` in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.names().zip(self.values.iter())
    }

    /// `(lat, lon)` when both coordinates are present and valid
    pub fn position(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.as_ref()?.value()?;
        let lon = self.longitude.as_ref()?.value()?;
        Some((lat, lon))
    }

    /// True when the dataset has a coordinate column and this record's cell
    /// in it could not be parsed
    pub fn has_invalid_position(&self) -> bool {
        [&self.latitude, &self.longitude]
            .into_iter()
            .flatten()
            .any(|c| !c.is_valid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn fields() -> Arc<FieldIndex> {
        let mut index = FieldIndex::new();
        index.insert("temp");
        index.insert("status");
        Arc::new(index)
    }

    #[test]
    fn test_value_lookup_by_name() {
        let record = Record::new(
            Utc.timestamp_opt(0, 0).unwrap(),
            None,
            None,
            fields(),
            vec![Value::Number(1.5), Value::Text(Arc::from("A"))],
        );

        assert_eq!(record.value("temp").as_number(), Some(1.5));
        assert_eq!(record.value("status").as_text(), Some("A"));
        assert!(record.value("humidity").is_missing());
        assert_eq!(record.iter().map(|(name, _)| name).collect::<Vec<_>>(), vec!["temp", "status"]);
    }

    #[test]
    fn test_invalid_coordinates_are_flagged() {
        let record = Record::new(
            Utc.timestamp_opt(0, 0).unwrap(),
            Some(Coordinate::parse("51.5")),
            Some(Coordinate::parse("east")),
            fields(),
            vec![Value::Missing, Value::Missing],
        );

        assert!(record.has_invalid_position());
        assert_eq!(record.position(), None);
        assert_eq!(Coordinate::parse("NaN"), Coordinate::Invalid(Arc::from("NaN")));
    }

    #[test]
    fn test_duplicate_field_names_rejected() {
        let mut index = FieldIndex::new();
        assert!(index.insert("a"));
        assert!(!index.insert("a"));
        assert_eq!(index.len(), 1);
    }
}
