//! Construction-time configuration for the form structurer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::vocabulary::Vocabulary;
use super::ConfigError;
use crate::config::{DEFAULT_DOC_TYPE, DEFAULT_EXTRACTION_METHOD};

/// Static data the structurer is built from. Every key is optional in JSON;
/// missing keys fall back to the built-in tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Method identifier recorded in `source_quality_notes`.
    pub extraction_method: String,
    /// Used when the text has no recognizable title line.
    pub default_doc_type: String,
    /// Replacement regexes keyed by field name (`FieldRule::name`).
    pub field_patterns: BTreeMap<String, String>,
    pub vocabulary: Vocabulary,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            extraction_method: DEFAULT_EXTRACTION_METHOD.to_string(),
            default_doc_type: DEFAULT_DOC_TYPE.to_string(),
            field_patterns: BTreeMap::new(),
            vocabulary: Vocabulary::default(),
        }
    }
}

impl FormConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        let config = FormConfig::from_json("{}").unwrap();
        assert_eq!(config, FormConfig::default());
    }

    #[test]
    fn partial_vocabulary_override_keeps_other_tables() {
        let config = FormConfig::from_json(
            r#"{"vocabulary": {"symptom_terms": ["vertigo"]}, "extraction_method": "test"}"#,
        )
        .unwrap();
        assert_eq!(config.vocabulary.symptom_terms, vec!["vertigo".to_string()]);
        assert_eq!(config.vocabulary.redaction_markers, vec!["[redacted]".to_string()]);
        assert_eq!(config.extraction_method, "test");
        assert_eq!(config.default_doc_type, DEFAULT_DOC_TYPE);
    }

    #[test]
    fn temperature_methods_deserialize() {
        let config = FormConfig::from_json(
            r#"{"vocabulary": {"temperature_methods": [{"method": "oral", "keywords": ["mouth"]}]}}"#,
        )
        .unwrap();
        assert_eq!(config.vocabulary.temperature_methods.len(), 1);
        assert_eq!(config.vocabulary.temperature_methods[0].keywords, vec!["mouth"]);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            FormConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
