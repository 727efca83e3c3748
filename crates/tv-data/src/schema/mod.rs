//! Schema inference from raw text columns
//!
//! Roles are decided per header, first match wins:
//! 1. datetime: header contains `date` or `time`
//! 2. latitude: header contains `lat` or is exactly `y`
//! 3. longitude: header contains `lon`/`lng` or is exactly `x`
//! 4. numeric if every non-missing cell is a finite number (and there is at
//!    least one), categorical otherwise
//!
//! Matching is case-insensitive. Each of rules 1-3 is claimed by the first
//! header only; later headers that match an already claimed rule go straight
//! to rule 4.

use std::sync::Arc;
use ahash::{AHashMap, AHashSet};
use serde::{Serialize, Deserialize};

mod palette;

pub use palette::{field_color, Color, PALETTE};

use crate::config::IngestConfig;
use crate::record::{Coordinate, FieldIndex, Record, Value};
use crate::sources::{parse_timestamp, RawTable};
use crate::store::RecordStore;
use crate::DataError;

/// Role a column plays in the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldRole {
    DateTime,
    Latitude,
    Longitude,
    Numeric,
    Categorical,
}

impl FieldRole {
    /// Numeric and categorical columns are offered for plotting
    pub fn is_plottable(&self) -> bool {
        matches!(self, FieldRole::Numeric | FieldRole::Categorical)
    }
}

/// Plottable column metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub role: FieldRole,
    pub color: Color,
    pub selected: bool,
}

/// Source column indices of the special-purpose columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoles {
    pub datetime: Option<usize>,
    pub latitude: Option<usize>,
    pub longitude: Option<usize>,
}

/// Statistics about a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub name: String,
    pub column: usize,
    pub role: FieldRole,
    pub missing_count: usize,
    pub non_missing_count: usize,
    /// Number of distinct non-missing values, categorical columns only
    pub distinct_count: Option<usize>,
}

/// Information about an inferred schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaInfo {
    /// Plottable fields in header order
    pub descriptors: Vec<FieldDescriptor>,
    pub roles: ColumnRoles,
    /// One entry per source column
    pub column_stats: Vec<ColumnStats>,
}

/// Result of one inference pass
#[derive(Debug)]
pub struct Inferred {
    pub schema: SchemaInfo,
    pub store: RecordStore,
    /// Rows skipped because their datetime cell could not be parsed
    pub dropped_rows: usize,
}

/// Per-column tallies from the numeric test
#[derive(Debug, Default)]
struct ColumnScan {
    missing: usize,
    numeric: usize,
    non_numeric: usize,
}

impl ColumnScan {
    fn is_numeric(&self) -> bool {
        self.numeric > 0 && self.non_numeric == 0
    }
}

/// Classifies columns and builds the typed record sequence
pub struct SchemaInferencer<'a> {
    config: &'a IngestConfig,
}

impl<'a> SchemaInferencer<'a> {
    pub fn new(config: &'a IngestConfig) -> Self {
        Self { config }
    }

    /// Infer roles for every column and build records from every row
    pub fn infer(&self, table: &RawTable) -> Result<Inferred, DataError> {
        let (roles, column_roles, scans) = self.assign_roles(table);
        let datetime = column_roles.datetime.ok_or(DataError::MissingTimeColumn)?;

        // Plottable columns, header order, first occurrence of each name
        let mut fields = FieldIndex::new();
        let mut value_columns = Vec::new();
        for (column, role) in roles.iter().enumerate() {
            if !role.is_plottable() {
                continue;
            }
            let name = &table.headers[column];
            if fields.insert(name) {
                value_columns.push((column, *role));
            } else {
                tracing::warn!("Ignoring duplicate column '{}' at position {}", name, column);
            }
        }
        let fields = Arc::new(fields);

        let mut interner: AHashMap<String, Arc<str>> = AHashMap::new();
        let mut records = Vec::with_capacity(table.row_count());
        let mut dropped_rows = 0;

        for (row_idx, row) in table.rows.iter().enumerate() {
            let cell = |column: usize| row.get(column).map(String::as_str);

            let Some(timestamp) = cell(datetime).and_then(parse_timestamp) else {
                dropped_rows += 1;
                tracing::debug!("Dropping row {}: unparseable timestamp {:?}", row_idx + 1, cell(datetime));
                continue;
            };

            let latitude = column_roles
                .latitude
                .map(|column| Coordinate::parse(cell(column).unwrap_or_default()));
            let longitude = column_roles
                .longitude
                .map(|column| Coordinate::parse(cell(column).unwrap_or_default()));

            let values = value_columns
                .iter()
                .map(|&(column, role)| self.typed_value(cell(column), role, &mut interner))
                .collect();

            records.push(Record::new(timestamp, latitude, longitude, fields.clone(), values));
        }

        if dropped_rows > 0 {
            tracing::warn!(
                "Dropped {} of {} rows with unparseable '{}' values",
                dropped_rows,
                table.row_count(),
                table.headers[datetime]
            );
        }

        let descriptors = self.describe(table, &value_columns);
        let column_stats = self.column_stats(table, &roles, &scans);

        Ok(Inferred {
            schema: SchemaInfo {
                descriptors,
                roles: column_roles,
                column_stats,
            },
            store: RecordStore::new(records, fields),
            dropped_rows,
        })
    }

    /// Decide the role of every column in header order
    fn assign_roles(&self, table: &RawTable) -> (Vec<FieldRole>, ColumnRoles, Vec<ColumnScan>) {
        let mut claimed = ColumnRoles::default();
        let mut roles = Vec::with_capacity(table.headers.len());
        let mut scans = Vec::with_capacity(table.headers.len());

        for (column, header) in table.headers.iter().enumerate() {
            let scan = self.scan_column(table, column);

            let role = match header_rule(header) {
                Some(FieldRole::DateTime) if claimed.datetime.is_none() => {
                    claimed.datetime = Some(column);
                    FieldRole::DateTime
                }
                Some(FieldRole::Latitude) if claimed.latitude.is_none() => {
                    claimed.latitude = Some(column);
                    FieldRole::Latitude
                }
                Some(FieldRole::Longitude) if claimed.longitude.is_none() => {
                    claimed.longitude = Some(column);
                    FieldRole::Longitude
                }
                _ if scan.is_numeric() => FieldRole::Numeric,
                _ => FieldRole::Categorical,
            };

            tracing::debug!("Column '{}' classified as {:?}", header, role);
            roles.push(role);
            scans.push(scan);
        }

        (roles, claimed, scans)
    }

    /// Numeric test over every row of one column
    fn scan_column(&self, table: &RawTable, column: usize) -> ColumnScan {
        let mut scan = ColumnScan::default();
        for row in 0..table.row_count() {
            let cell = table.cell(row, column);
            if self.config.missing.is_missing_cell(cell) {
                scan.missing += 1;
            } else if cell.and_then(parse_finite).is_some() {
                scan.numeric += 1;
            } else {
                scan.non_numeric += 1;
            }
        }
        scan
    }

    fn typed_value(
        &self,
        cell: Option<&str>,
        role: FieldRole,
        interner: &mut AHashMap<String, Arc<str>>,
    ) -> Value {
        let raw = match cell {
            Some(raw) if !self.config.missing.is_missing(raw) => raw,
            _ => return Value::Missing,
        };

        match role {
            FieldRole::Numeric => parse_finite(raw).map_or(Value::Missing, Value::Number),
            _ => {
                if let Some(text) = interner.get(raw) {
                    return Value::Text(text.clone());
                }
                let text: Arc<str> = Arc::from(raw);
                interner.insert(raw.to_string(), text.clone());
                Value::Text(text)
            }
        }
    }

    /// Descriptors in header order; colors run over numeric fields first,
    /// then categorical
    fn describe(&self, table: &RawTable, value_columns: &[(usize, FieldRole)]) -> Vec<FieldDescriptor> {
        let numeric_total = value_columns
            .iter()
            .filter(|(_, role)| *role == FieldRole::Numeric)
            .count();
        let mut numeric_seen = 0;
        let mut categorical_seen = 0;

        value_columns
            .iter()
            .map(|&(column, role)| {
                let (color, selected) = if role == FieldRole::Numeric {
                    let rank = numeric_seen;
                    numeric_seen += 1;
                    (field_color(rank), rank < self.config.numeric_autoselect)
                } else {
                    let rank = categorical_seen;
                    categorical_seen += 1;
                    (field_color(numeric_total + rank), rank < self.config.categorical_autoselect)
                };

                let name = table.headers[column].clone();
                FieldDescriptor {
                    label: display_label(&name),
                    name,
                    role,
                    color,
                    selected,
                }
            })
            .collect()
    }

    fn column_stats(&self, table: &RawTable, roles: &[FieldRole], scans: &[ColumnScan]) -> Vec<ColumnStats> {
        roles
            .iter()
            .zip(scans)
            .enumerate()
            .map(|(column, (role, scan))| {
                let distinct_count = (*role == FieldRole::Categorical).then(|| {
                    (0..table.row_count())
                        .filter_map(|row| table.cell(row, column))
                        .filter(|cell| !self.config.missing.is_missing(cell))
                        .collect::<AHashSet<_>>()
                        .len()
                });

                ColumnStats {
                    name: table.headers[column].clone(),
                    column,
                    role: *role,
                    missing_count: scan.missing,
                    non_missing_count: scan.numeric + scan.non_numeric,
                    distinct_count,
                }
            })
            .collect()
    }
}

/// Role suggested by the header name alone
fn header_rule(header: &str) -> Option<FieldRole> {
    let header = header.to_lowercase();
    if header.contains("date") || header.contains("time") {
        Some(FieldRole::DateTime)
    } else if header.contains("lat") || header == "y" {
        Some(FieldRole::Latitude)
    } else if header.contains("lon") || header.contains("lng") || header == "x" {
        Some(FieldRole::Longitude)
    } else {
        None
    }
}

/// Parse a finite number; NaN and infinities do not count
fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn display_label(name: &str) -> String {
    name.replace(['_', '-'], " ").trim().to_string()
}
