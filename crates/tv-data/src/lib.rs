//! Record ingestion and render-data preparation for the time-series viewer
//!
//! Raw delimited text goes through [`SchemaInferencer`] into a [`RecordStore`];
//! views then pull decimated series, categorical segments and nearest-record
//! lookups from it, usually through a [`DatasetSession`].

pub mod cache;
pub mod config;
pub mod index;
pub mod record;
pub mod reduce;
pub mod schema;
pub mod segments;
pub mod session;
pub mod sources;
pub mod store;

use thiserror::Error;

// Re-exports
pub use cache::DerivedCache;
pub use config::{IngestConfig, MissingTokens};
pub use index::NearestPointLocator;
pub use record::{Coordinate, FieldIndex, Record, Value};
pub use reduce::SeriesReducer;
pub use schema::{ColumnRoles, ColumnStats, FieldDescriptor, FieldRole, SchemaInferencer, SchemaInfo};
pub use segments::{FieldSegments, Gap, Interval, Segment, SegmentEncoder};
pub use session::{Dataset, DatasetSession, RenderSeries};
pub use sources::{RawTable, TextSource};
pub use store::RecordStore;

/// Errors that can occur while loading data
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Input is empty: expected a header line")]
    EmptyInput,

    #[error("No datetime column: one header must contain \"date\" or \"time\"")]
    MissingTimeColumn,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}
