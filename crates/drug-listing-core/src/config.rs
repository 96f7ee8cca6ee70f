//! Editor configuration.

use serde::Deserialize;

/// When display names are uppercased relative to the error check on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeOrder {
    /// Uppercase every dirty row, then check flags. A rejected save leaves
    /// the rows uppercased.
    #[default]
    BeforeCheck,
    /// Check flags first; uppercase only when the save goes ahead.
    AfterCheck,
}

/// Configuration for the listing editor and the local data service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum char count of the single-character code fields
    pub max_code_length: usize,
    /// Ordering of display name normalization on save
    pub normalize_order: NormalizeOrder,
    /// Permission required to save listings
    pub edit_permission: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_code_length: 1,
            normalize_order: NormalizeOrder::BeforeCheck,
            edit_permission: "drug_list_edit".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse configuration from JSON, filling missing keys with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.max_code_length, 1);
        assert_eq!(config.normalize_order, NormalizeOrder::BeforeCheck);
        assert_eq!(config.edit_permission, "drug_list_edit");
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(r#"{"normalize_order": "after_check"}"#).unwrap();
        assert_eq!(config.normalize_order, NormalizeOrder::AfterCheck);
        assert_eq!(config.max_code_length, 1);
    }

    #[test]
    fn test_invalid_json() {
        assert!(EditorConfig::from_json(r#"{"max_code_length": "one"}"#).is_err());
    }
}
