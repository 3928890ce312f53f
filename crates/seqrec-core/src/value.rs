// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Raw row scalars and typed feature values.
//!
//! Two value planes meet here:
//! - [`RawValue`] is what a row carries before encoding (untyped JSON-like scalar).
//! - [`TypedFeatureValue`] is what an encoder produces: one homogeneous list in
//!   the downstream element width (`bytes`, `f32`, `i64`).
//!
//! [`FeatureList`] is the per-column framing used by sequence features.

use core::fmt;

/// Untyped scalar read from a row.
///
/// JSON rows map as: string → [`RawValue::Str`], integral number →
/// [`RawValue::Int`], other number → [`RawValue::Float`], boolean →
/// [`RawValue::Bool`], `null` → [`RawValue::Null`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RawValue {
    /// Explicit null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// UTF-8 text.
    Str(String),
}

impl RawValue {
    /// Short name of the value kind, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Output of one encoder invocation: a homogeneous value list.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value"))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TypedFeatureValue {
    /// Byte strings (UTF-8 text transcoded to bytes).
    BytesList(Vec<Vec<u8>>),
    /// Single-precision floats.
    FloatList(Vec<f32>),
    /// Signed 64-bit integers.
    Int64List(Vec<i64>),
}

impl TypedFeatureValue {
    /// Number of elements in the underlying list.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::BytesList(v) => v.len(),
            Self::FloatList(v) => v.len(),
            Self::Int64List(v) => v.len(),
        }
    }

    /// Returns `true` when the underlying list has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the list kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BytesList(_) => "bytes_list",
            Self::FloatList(_) => "float_list",
            Self::Int64List(_) => "int64_list",
        }
    }

    /// Byte-string elements, if this is a bytes list.
    #[must_use]
    pub fn as_bytes_list(&self) -> Option<&[Vec<u8>]> {
        match self {
            Self::BytesList(v) => Some(v),
            _ => None,
        }
    }

    /// Float elements, if this is a float list.
    #[must_use]
    pub fn as_float_list(&self) -> Option<&[f32]> {
        match self {
            Self::FloatList(v) => Some(v),
            _ => None,
        }
    }

    /// Integer elements, if this is an int64 list.
    #[must_use]
    pub fn as_int64_list(&self) -> Option<&[i64]> {
        match self {
            Self::Int64List(v) => Some(v),
            _ => None,
        }
    }
}

/// Ordered list of typed values stored under one sequence feature name.
///
/// Columns produced by [`crate::GroupEncoder`] always hold exactly one
/// [`TypedFeatureValue`] carrying the whole column (see [`FeatureList::single`]).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FeatureList(Vec<TypedFeatureValue>);

impl FeatureList {
    /// Wraps one aggregated column value.
    #[must_use]
    pub fn single(value: TypedFeatureValue) -> Self {
        Self(vec![value])
    }

    /// Number of typed values in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the list holds no typed values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First typed value, if any.
    #[must_use]
    pub fn first(&self) -> Option<&TypedFeatureValue> {
        self.0.first()
    }

    /// Iterate the typed values in order.
    pub fn iter(&self) -> impl Iterator<Item = &TypedFeatureValue> {
        self.0.iter()
    }
}
