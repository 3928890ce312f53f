// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Semantic type → encoder dispatch table.
//!
//! The registry replaces per-value type branching with a lookup keyed by
//! [`SemanticType`]. It is built once at startup and read-only afterwards:
//!
//! - [`FeatureTypeRegistry::with_builtins`] installs the `string`, `float`, and
//!   `int` encoders.
//! - Additional tags are added with [`FeatureTypeRegistry::register`]; a tag can
//!   be registered at most once.
//! - [`install_global`] publishes a registry process-wide. [`global`] returns
//!   the installed registry, or the built-ins if nothing was installed first.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use thiserror::Error;

use crate::descriptor::SemanticType;
use crate::value::{RawValue, TypedFeatureValue};

/// Encoder for one semantic type.
///
/// Receives the raw values of one feature in order (a single value for context
/// features, the whole column for sequence features) and returns one typed
/// list holding all of them.
pub type EncodeFn = fn(&[&RawValue]) -> Result<TypedFeatureValue, ValueError>;

/// A raw value whose kind the encoder cannot represent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value {index} has kind {found}, expected {expected}")]
pub struct ValueError {
    /// Position of the offending value in the encoder input.
    pub index: usize,
    /// Kind accepted by the encoder.
    pub expected: &'static str,
    /// Kind actually found.
    pub found: &'static str,
}

impl ValueError {
    /// Creates a value error for position `index`.
    #[must_use]
    pub const fn new(index: usize, expected: &'static str, found: &'static str) -> Self {
        Self {
            index,
            expected,
            found,
        }
    }
}

/// No encoder is registered for the requested tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no encoder registered for semantic type `{tag}`")]
pub struct UnsupportedTypeError {
    /// The unregistered tag.
    pub tag: SemanticType,
}

/// Errors returned when building or installing a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Attempted to register two encoders for the same tag.
    #[error("duplicate encoder registration for semantic type `{0}`")]
    DuplicateType(SemanticType),
    /// The process-wide registry was already installed (or already read).
    #[error("global feature type registry already installed")]
    AlreadyInstalled,
}

/// Lookup table from semantic type to encoder.
#[derive(Clone, Default)]
pub struct FeatureTypeRegistry {
    encoders: HashMap<SemanticType, EncodeFn>,
}

impl FeatureTypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the `string`, `float`, and `int` encoders.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut encoders: HashMap<SemanticType, EncodeFn> = HashMap::with_capacity(3);
        encoders.insert(SemanticType::String, encode_bytes_list);
        encoders.insert(SemanticType::Float, encode_float_list);
        encoders.insert(SemanticType::Int, encode_int64_list);
        Self { encoders }
    }

    /// Registers `encoder` for `tag`.
    ///
    /// A [`SemanticType::Custom`] spelling of a built-in tag is folded into
    /// the built-in first, so it collides with the built-in encoder.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateType`] if `tag` already has an encoder.
    pub fn register(
        &mut self,
        tag: impl Into<SemanticType>,
        encoder: EncodeFn,
    ) -> Result<(), RegistryError> {
        let tag = tag.into().canonical();
        if self.encoders.contains_key(&tag) {
            return Err(RegistryError::DuplicateType(tag));
        }
        self.encoders.insert(tag, encoder);
        Ok(())
    }

    /// Returns the encoder registered for `tag` (if any).
    #[must_use]
    pub fn get(&self, tag: &SemanticType) -> Option<EncodeFn> {
        match tag {
            SemanticType::Custom(raw) => self.encoders.get(&SemanticType::from_tag(raw)),
            builtin => self.encoders.get(builtin),
        }
        .copied()
    }

    /// Returns the encoder registered for `tag`.
    ///
    /// # Errors
    /// Returns [`UnsupportedTypeError`] when `tag` is not registered.
    pub fn lookup(&self, tag: &SemanticType) -> Result<EncodeFn, UnsupportedTypeError> {
        self.get(tag)
            .ok_or_else(|| UnsupportedTypeError { tag: tag.clone() })
    }

    /// Returns `true` if `tag` has an encoder.
    #[must_use]
    pub fn contains(&self, tag: &SemanticType) -> bool {
        self.get(tag).is_some()
    }

    /// Registered tags, sorted for deterministic iteration.
    #[must_use]
    pub fn tags(&self) -> Vec<&SemanticType> {
        let mut tags: Vec<_> = self.encoders.keys().collect();
        tags.sort();
        tags
    }

    /// Number of registered tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }
}

impl fmt::Debug for FeatureTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureTypeRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

static GLOBAL_REGISTRY: OnceLock<FeatureTypeRegistry> = OnceLock::new();

/// Installs `registry` as the process-wide registry.
///
/// Must run before the first call to [`global`]; the registry is frozen once
/// read.
///
/// # Errors
/// Returns [`RegistryError::AlreadyInstalled`] if a registry was installed or
/// the built-in default was already materialised by [`global`].
pub fn install_global(
    registry: FeatureTypeRegistry,
) -> Result<&'static FeatureTypeRegistry, RegistryError> {
    GLOBAL_REGISTRY
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    Ok(global())
}

/// Returns the process-wide registry (built-ins unless one was installed).
pub fn global() -> &'static FeatureTypeRegistry {
    GLOBAL_REGISTRY.get_or_init(FeatureTypeRegistry::with_builtins)
}

fn encode_bytes_list(values: &[&RawValue]) -> Result<TypedFeatureValue, ValueError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            RawValue::Str(s) => Ok(s.as_bytes().to_vec()),
            other => Err(ValueError::new(index, "string", other.kind())),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(TypedFeatureValue::BytesList)
}

// Float lists are f32 on the wire; values are narrowed, never clamped.
#[allow(clippy::cast_precision_loss)]
fn encode_float_list(values: &[&RawValue]) -> Result<TypedFeatureValue, ValueError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            RawValue::Float(x) => Ok(*x as f32),
            RawValue::Int(n) => Ok(*n as f32),
            other => Err(ValueError::new(index, "float", other.kind())),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(TypedFeatureValue::FloatList)
}

fn encode_int64_list(values: &[&RawValue]) -> Result<TypedFeatureValue, ValueError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            RawValue::Int(n) => Ok(*n),
            RawValue::Bool(b) => Ok(i64::from(*b)),
            other => Err(ValueError::new(index, "int", other.kind())),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(TypedFeatureValue::Int64List)
}
