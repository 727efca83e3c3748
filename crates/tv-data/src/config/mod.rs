//! Ingestion configuration

pub mod ingest_config;
pub mod missing;

pub use ingest_config::IngestConfig;
pub use missing::MissingTokens;
