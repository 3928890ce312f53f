// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Feature-config documents for seqrec.
//!
//! A feature config lists every feature with its name, dtype, and role, plus
//! an optional grouping key. It is supplied either as a path to a JSON file or
//! as the JSON text itself (see [`FeatureConfigSource::parse`]).
#![forbid(unsafe_code)]

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use seqrec_core::{FeatureDescriptor, FeatureRole};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for feature-config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading the config file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON or unexpected document shape.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Two features share a name.
    #[error("duplicate feature name `{0}`")]
    DuplicateFeature(String),
    /// The document declares no features.
    #[error("feature config declares no features")]
    Empty,
}

/// Where a feature config comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureConfigSource {
    /// JSON document text.
    Inline(String),
    /// Path to a JSON document.
    Path(PathBuf),
}

impl FeatureConfigSource {
    /// Interprets a command-line style argument: text starting with `{` is
    /// inline JSON, anything else is a file path.
    #[must_use]
    pub fn parse(arg: &str) -> Self {
        if arg.trim_start().starts_with('{') {
            Self::Inline(arg.to_owned())
        } else {
            Self::Path(PathBuf::from(arg))
        }
    }
}

/// Parsed, validated feature config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Field whose value identifies a group (e.g. the query id).
    #[serde(default, alias = "query_key", skip_serializing_if = "Option::is_none")]
    group_key: Option<String>,
    /// Feature descriptors in declaration order.
    features: Vec<FeatureDescriptor>,
}

impl FeatureConfig {
    /// Builds a config from descriptors, applying the same validation as parsing.
    pub fn new(
        group_key: Option<String>,
        features: Vec<FeatureDescriptor>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            group_key,
            features,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads from a [`FeatureConfigSource`].
    pub fn load(source: &FeatureConfigSource) -> Result<Self, ConfigError> {
        match source {
            FeatureConfigSource::Inline(text) => Self::from_json_str(text),
            FeatureConfigSource::Path(path) => Self::from_path(path),
        }
    }

    /// Reads and parses a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)?;
        Self::from_json_slice(&bytes)
    }

    /// Parses JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Self::from_json_slice(text.as_bytes())
    }

    fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.features.is_empty() {
            return Err(ConfigError::Empty);
        }
        let mut seen = HashSet::with_capacity(self.features.len());
        for feature in &self.features {
            if !seen.insert(feature.name.as_str()) {
                return Err(ConfigError::DuplicateFeature(feature.name.clone()));
            }
        }
        Ok(())
    }

    /// Grouping key declared by the document, if any.
    #[must_use]
    pub fn group_key(&self) -> Option<&str> {
        self.group_key.as_deref()
    }

    /// All descriptors in declaration order.
    #[must_use]
    pub fn features(&self) -> &[FeatureDescriptor] {
        &self.features
    }

    /// Descriptors with [`FeatureRole::Context`], in declaration order.
    #[must_use]
    pub fn context_features(&self) -> Vec<FeatureDescriptor> {
        self.with_role(FeatureRole::Context)
    }

    /// Descriptors with [`FeatureRole::Sequence`], in declaration order.
    #[must_use]
    pub fn sequence_features(&self) -> Vec<FeatureDescriptor> {
        self.with_role(FeatureRole::Sequence)
    }

    /// `(context, sequence)` descriptor lists, ready for the group encoder.
    #[must_use]
    pub fn partition(&self) -> (Vec<FeatureDescriptor>, Vec<FeatureDescriptor>) {
        self.features
            .iter()
            .cloned()
            .partition(|f| f.role == FeatureRole::Context)
    }

    /// Pretty JSON rendering of the document.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn with_role(&self, role: FeatureRole) -> Vec<FeatureDescriptor> {
        self.features
            .iter()
            .filter(|f| f.role == role)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use seqrec_core::SemanticType;

    const DOC: &str = r#"{
        "query_key": "query_id",
        "features": [
            { "name": "query_id", "dtype": "string", "role": "context" },
            { "name": "score", "dtype": "float32", "role": "sequence" },
            { "name": "domain", "dtype": "string", "role": "context" },
            { "name": "click", "dtype": "int64", "tfrecord_type": "sequence",
              "serving_info": { "name": "clicked" } }
        ]
    }"#;

    #[test]
    fn source_parse_distinguishes_inline_json() {
        assert_eq!(
            FeatureConfigSource::parse("  {\"features\": []}"),
            FeatureConfigSource::Inline("  {\"features\": []}".into())
        );
        assert_eq!(
            FeatureConfigSource::parse("configs/features.json"),
            FeatureConfigSource::Path("configs/features.json".into())
        );
    }

    #[test]
    fn partition_keeps_declaration_order() {
        let config = FeatureConfig::from_json_str(DOC).unwrap();
        assert_eq!(config.group_key(), Some("query_id"));
        let (context, sequence) = config.partition();
        let names = |v: &[FeatureDescriptor]| v.iter().map(|f| f.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&context), ["query_id", "domain"]);
        assert_eq!(names(&sequence), ["score", "click"]);
        assert_eq!(config.context_features(), context);
        assert_eq!(config.sequence_features(), sequence);
        assert_eq!(sequence[0].semantic_type, SemanticType::Float);
        let serving = sequence[1].serving_info.as_ref().unwrap();
        assert_eq!(serving.name, "clicked");
        assert!(!serving.required);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let doc = r#"{"features": [
            { "name": "a", "dtype": "int", "role": "context" },
            { "name": "a", "dtype": "int", "role": "sequence" }
        ]}"#;
        assert!(matches!(
            FeatureConfig::from_json_str(doc),
            Err(ConfigError::DuplicateFeature(name)) if name == "a"
        ));
    }

    #[test]
    fn empty_feature_list_is_rejected() {
        assert!(matches!(
            FeatureConfig::from_json_str(r#"{"features": []}"#),
            Err(ConfigError::Empty)
        ));
        assert!(matches!(
            FeatureConfig::new(None, vec![]),
            Err(ConfigError::Empty)
        ));
    }

    #[test]
    fn unknown_role_is_a_serde_error() {
        let doc = r#"{"features": [{ "name": "a", "dtype": "int", "role": "label" }]}"#;
        assert!(matches!(
            FeatureConfig::from_json_str(doc),
            Err(ConfigError::Serde(_))
        ));
    }

    #[test]
    fn pretty_json_reparses_to_same_config() {
        let config = FeatureConfig::from_json_str(DOC).unwrap();
        let text = config.to_json_pretty().unwrap();
        assert_eq!(FeatureConfig::from_json_str(&text).unwrap(), config);
    }
}
