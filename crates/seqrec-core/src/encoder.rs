// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Group → context/sequence map encoding.
//!
//! Encoding is all-or-nothing per group: the first failing descriptor aborts the
//! call and no partial maps are returned.
//!
//! Framing rules:
//! - Context features read only the first row; other rows are not consulted
//!   and are not checked for agreement.
//! - Sequence features read the whole column in row order and encode it with a
//!   single encoder call. The resulting value is stored as a length-1
//!   [`FeatureList`], not one list entry per row.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, instrument, trace};

use crate::descriptor::{FeatureDescriptor, FeatureRole};
use crate::group::{Group, Row};
use crate::record::{Record, RecordBuilder};
use crate::registry::{self, FeatureTypeRegistry, UnsupportedTypeError};
use crate::value::{FeatureList, RawValue, TypedFeatureValue};

/// Context features keyed by name.
pub type ContextMap = BTreeMap<String, TypedFeatureValue>;

/// Sequence features keyed by name.
pub type SequenceMap = BTreeMap<String, FeatureList>;

/// Errors that abort encoding of a group.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The descriptor's semantic type has no registered encoder.
    #[error("feature `{feature}`: {source}")]
    UnsupportedType {
        /// Feature name.
        feature: String,
        /// Registry miss.
        #[source]
        source: UnsupportedTypeError,
    },
    /// A row lacks the descriptor's field.
    #[error("feature `{feature}`: field missing in row {row}")]
    FieldMissing {
        /// Feature name.
        feature: String,
        /// Index of the first row without the field.
        row: usize,
    },
    /// A context descriptor was processed against a zero-row group.
    #[error("feature `{feature}`: group has no rows to read a context value from")]
    EmptyGroup {
        /// Feature name.
        feature: String,
    },
    /// A raw value cannot be represented by the type's encoder.
    #[error("feature `{feature}`: row {row} has kind {found}, expected {expected}")]
    ValueType {
        /// Feature name.
        feature: String,
        /// Index of the offending row.
        row: usize,
        /// Kind accepted by the encoder.
        expected: &'static str,
        /// Kind actually found.
        found: &'static str,
    },
}

impl EncodeError {
    /// Name of the feature that failed.
    #[must_use]
    pub fn feature(&self) -> &str {
        match self {
            Self::UnsupportedType { feature, .. }
            | Self::FieldMissing { feature, .. }
            | Self::EmptyGroup { feature }
            | Self::ValueType { feature, .. } => feature,
        }
    }
}

/// Encoder output for one group, before record assembly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EncodedGroup {
    /// One single-element value per context feature.
    pub context: ContextMap,
    /// One length-1 feature list per sequence feature.
    pub sequence: SequenceMap,
}

impl EncodedGroup {
    /// Assembles the maps into a [`Record`].
    #[must_use]
    pub fn into_record(self) -> Record {
        RecordBuilder::build(self.context, self.sequence)
    }
}

/// Encodes groups against a read-only [`FeatureTypeRegistry`].
#[derive(Clone, Copy, Debug)]
pub struct GroupEncoder<'r> {
    registry: &'r FeatureTypeRegistry,
}

impl GroupEncoder<'static> {
    /// Encoder bound to the process-wide registry.
    #[must_use]
    pub fn global() -> Self {
        Self::new(registry::global())
    }
}

impl<'r> GroupEncoder<'r> {
    /// Encoder bound to `registry`.
    #[must_use]
    pub const fn new(registry: &'r FeatureTypeRegistry) -> Self {
        Self { registry }
    }

    /// Registry used for lookups.
    #[must_use]
    pub const fn registry(&self) -> &'r FeatureTypeRegistry {
        self.registry
    }

    /// Encodes one group into context and sequence maps.
    ///
    /// `context` descriptors are all encoded from the first row regardless of
    /// their role. Entries in `sequence` whose role is not
    /// [`FeatureRole::Sequence`] are skipped.
    ///
    /// # Errors
    /// - [`EncodeError::UnsupportedType`] when a descriptor's type is not registered.
    /// - [`EncodeError::EmptyGroup`] when a context descriptor meets a zero-row group.
    /// - [`EncodeError::FieldMissing`] when any consulted row lacks the field.
    /// - [`EncodeError::ValueType`] when the encoder rejects a value's kind.
    #[instrument(level = "debug", skip_all, fields(rows = group.len()))]
    pub fn encode(
        &self,
        group: &Group,
        context: &[FeatureDescriptor],
        sequence: &[FeatureDescriptor],
    ) -> Result<EncodedGroup, EncodeError> {
        let mut out = EncodedGroup::default();

        for descriptor in context {
            let value = self.encode_context(group, descriptor)?;
            out.context.insert(descriptor.name.clone(), value);
        }

        for descriptor in sequence {
            if descriptor.role != FeatureRole::Sequence {
                trace!(feature = %descriptor.name, "skipping non-sequence descriptor");
                continue;
            }
            let value = self.encode_sequence(group, descriptor)?;
            out.sequence
                .insert(descriptor.name.clone(), FeatureList::single(value));
        }

        debug!(
            context = out.context.len(),
            sequence = out.sequence.len(),
            "encoded group"
        );
        Ok(out)
    }

    /// Encodes one group and assembles the resulting [`Record`].
    ///
    /// # Errors
    /// Same as [`GroupEncoder::encode`].
    pub fn encode_record(
        &self,
        group: &Group,
        context: &[FeatureDescriptor],
        sequence: &[FeatureDescriptor],
    ) -> Result<Record, EncodeError> {
        self.encode(group, context, sequence)
            .map(EncodedGroup::into_record)
    }

    fn encode_context(
        &self,
        group: &Group,
        descriptor: &FeatureDescriptor,
    ) -> Result<TypedFeatureValue, EncodeError> {
        let encoder = self.lookup(descriptor)?;
        let first = group.first().ok_or_else(|| EncodeError::EmptyGroup {
            feature: descriptor.name.clone(),
        })?;
        let value = field(descriptor, first, 0)?;
        encoder(&[value]).map_err(|e| value_error(descriptor, e.index, e.expected, e.found))
    }

    fn encode_sequence(
        &self,
        group: &Group,
        descriptor: &FeatureDescriptor,
    ) -> Result<TypedFeatureValue, EncodeError> {
        let encoder = self.lookup(descriptor)?;
        let column = group
            .rows()
            .iter()
            .enumerate()
            .map(|(row, values)| field(descriptor, values, row))
            .collect::<Result<Vec<_>, _>>()?;
        encoder(&column).map_err(|e| value_error(descriptor, e.index, e.expected, e.found))
    }

    fn lookup(
        &self,
        descriptor: &FeatureDescriptor,
    ) -> Result<registry::EncodeFn, EncodeError> {
        self.registry
            .lookup(&descriptor.semantic_type)
            .map_err(|source| EncodeError::UnsupportedType {
                feature: descriptor.name.clone(),
                source,
            })
    }
}

fn field<'g>(
    descriptor: &FeatureDescriptor,
    row: &'g Row,
    index: usize,
) -> Result<&'g RawValue, EncodeError> {
    row.get(&descriptor.name)
        .ok_or_else(|| EncodeError::FieldMissing {
            feature: descriptor.name.clone(),
            row: index,
        })
}

fn value_error(
    descriptor: &FeatureDescriptor,
    row: usize,
    expected: &'static str,
    found: &'static str,
) -> EncodeError {
    EncodeError::ValueType {
        feature: descriptor.name.clone(),
        row,
        expected,
        found,
    }
}
