// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Feature descriptors: name, semantic type, and record role.

use core::fmt;

/// Semantic type tag used to select an encoder from the registry.
///
/// The three built-in tags have dedicated variants. Any other tag is kept as
/// [`SemanticType::Custom`] so it can be registered at startup (or rejected at
/// encode time when it is not).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum SemanticType {
    /// Text, encoded as a byte-string list.
    String,
    /// Numeric, encoded as a float list.
    Float,
    /// Integral, encoded as an int64 list.
    Int,
    /// Application-defined tag.
    Custom(String),
}

impl SemanticType {
    /// Parses a type tag, accepting the dtype spellings used by feature configs.
    ///
    /// Matching is case-insensitive for the built-in spellings; unknown tags
    /// are preserved verbatim as [`SemanticType::Custom`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "string" | "str" | "bytes" | "tf.string" => Self::String,
            "float" | "float32" | "float64" | "double" | "tf.float32" => Self::Float,
            "int" | "int64" | "integer" | "tf.int64" => Self::Int,
            _ => Self::Custom(tag.to_owned()),
        }
    }

    /// Folds a [`SemanticType::Custom`] that spells a built-in tag (e.g.
    /// `Custom("float32")`) into the built-in variant. Other values are
    /// returned unchanged.
    #[must_use]
    pub fn canonical(self) -> Self {
        match self {
            Self::Custom(tag) => Self::from_tag(&tag),
            builtin => builtin,
        }
    }

    /// Canonical tag string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Float => "float",
            Self::Int => "int",
            Self::Custom(tag) => tag,
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for SemanticType {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

impl From<String> for SemanticType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<SemanticType> for String {
    fn from(ty: SemanticType) -> Self {
        match ty {
            SemanticType::Custom(tag) => tag,
            other => other.as_str().to_owned(),
        }
    }
}

/// Where a feature lands in the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FeatureRole {
    /// One value per group, read from the first row.
    Context,
    /// One value per row, kept in row order.
    Sequence,
}

/// Serving-time metadata carried alongside a descriptor.
///
/// The encoder never reads it; inference tooling uses it to map request
/// fields onto feature names.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServingInfo {
    /// Field name at serving time.
    pub name: String,
    /// Whether the field must be present in serving requests.
    #[cfg_attr(feature = "serde", serde(default))]
    pub required: bool,
}

/// Metadata declaring one feature.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureDescriptor {
    /// Row field name, also the key in the encoded record.
    pub name: String,
    /// Encoder selector.
    #[cfg_attr(feature = "serde", serde(rename = "dtype", alias = "semantic_type"))]
    pub semantic_type: SemanticType,
    /// Context or sequence placement.
    #[cfg_attr(feature = "serde", serde(alias = "tfrecord_type"))]
    pub role: FeatureRole,
    /// Optional serving metadata.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub serving_info: Option<ServingInfo>,
}

impl FeatureDescriptor {
    /// Creates a descriptor.
    pub fn new(
        name: impl Into<String>,
        semantic_type: impl Into<SemanticType>,
        role: FeatureRole,
    ) -> Self {
        Self {
            name: name.into(),
            semantic_type: semantic_type.into(),
            role,
            serving_info: None,
        }
    }

    /// Creates a context descriptor.
    pub fn context(name: impl Into<String>, semantic_type: impl Into<SemanticType>) -> Self {
        Self::new(name, semantic_type, FeatureRole::Context)
    }

    /// Creates a sequence descriptor.
    pub fn sequence(name: impl Into<String>, semantic_type: impl Into<SemanticType>) -> Self {
        Self::new(name, semantic_type, FeatureRole::Sequence)
    }

    /// Attaches serving metadata.
    pub fn with_serving_info(mut self, name: impl Into<String>, required: bool) -> Self {
        self.serving_info = Some(ServingInfo {
            name: name.into(),
            required,
        });
        self
    }
}
