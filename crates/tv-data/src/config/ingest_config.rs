//! Load-time configuration

use serde::{Serialize, Deserialize};

use super::missing::MissingTokens;
use crate::DataError;

/// Configuration for one ingestion pass and the render budgets derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Missing-value tokens
    pub missing: MissingTokens,

    /// Point budget for the full-extent series
    pub overview_target: usize,

    /// Point budget for a zoomed window
    pub window_target: usize,

    /// Number of numeric fields selected after a load
    pub numeric_autoselect: usize,

    /// Number of categorical fields selected after a load
    pub categorical_autoselect: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            missing: MissingTokens::default(),
            overview_target: 2000,
            window_target: 1000,
            numeric_autoselect: 2,
            categorical_autoselect: 1,
        }
    }
}

impl IngestConfig {
    /// Parse a (possibly partial) JSON document; absent keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        serde_json::from_str(json).map_err(|e| DataError::Config(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String, DataError> {
        serde_json::to_string_pretty(self).map_err(|e| DataError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = IngestConfig::from_json_str(r#"{ "overview_target": 500 }"#).unwrap();
        assert_eq!(config.overview_target, 500);
        assert_eq!(config.window_target, 1000);
        assert_eq!(config.missing, MissingTokens::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = IngestConfig::default();
        let json = config.to_json_string().unwrap();
        assert_eq!(IngestConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let result = IngestConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(DataError::Config(_))));
    }
}
