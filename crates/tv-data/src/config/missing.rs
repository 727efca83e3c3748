//! Missing-value token handling

use serde::{Serialize, Deserialize};

/// Tokens that mark a cell as missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissingTokens {
    /// Literal tokens treated as missing
    pub tokens: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for MissingTokens {
    fn default() -> Self {
        Self {
            tokens: vec![
                String::new(),
                "null".to_string(),
                "NULL".to_string(),
                "undefined".to_string(),
            ],
            trim_whitespace: true,
            case_sensitive: true,
        }
    }
}

impl MissingTokens {
    /// Check if a raw cell is missing
    pub fn is_missing(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace {
            value.trim()
        } else {
            value
        };

        self.tokens.iter().any(|token| {
            if self.case_sensitive {
                test_value == token
            } else {
                test_value.eq_ignore_ascii_case(token)
            }
        })
    }

    /// An absent cell (short row) is always missing
    pub fn is_missing_cell(&self, value: Option<&str>) -> bool {
        value.map_or(true, |v| self.is_missing(v))
    }

    pub fn add_token(&mut self, token: String) {
        if !self.tokens.contains(&token) {
            self.tokens.push(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tokens() {
        let missing = MissingTokens::default();
        for token in ["", "  ", "null", "NULL", " undefined "] {
            assert!(missing.is_missing(token), "{:?} should be missing", token);
        }
        for token in ["Null", "UNDEFINED", "NaN", "N/A", "0"] {
            assert!(!missing.is_missing(token), "{:?} should not be missing", token);
        }
        assert!(missing.is_missing_cell(None));
    }

    #[test]
    fn test_case_insensitive_matching() {
        let mut missing = MissingTokens {
            case_sensitive: false,
            ..MissingTokens::default()
        };
        missing.add_token("n/a".to_string());
        assert!(missing.is_missing("N/A"));
        assert!(missing.is_missing("Null"));
    }
}
