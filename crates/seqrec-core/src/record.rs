// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Two-tier encoded record and its builder.

use crate::encoder::{ContextMap, SequenceMap};
use crate::value::{FeatureList, TypedFeatureValue};

/// Encoded output for one group.
///
/// Invariants (established by [`crate::GroupEncoder`]):
/// - every context value wraps exactly one element;
/// - every sequence entry is a length-1 [`FeatureList`] whose value holds the
///   full column, one element per row.
///
/// A record exposes read-only accessors only; it is never mutated after
/// [`RecordBuilder::build`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Record {
    context_features: ContextMap,
    sequence_features: SequenceMap,
}

impl Record {
    /// Context value for `name`.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&TypedFeatureValue> {
        self.context_features.get(name)
    }

    /// Sequence feature list for `name`.
    #[must_use]
    pub fn sequence(&self, name: &str) -> Option<&FeatureList> {
        self.sequence_features.get(name)
    }

    /// All context features, ordered by name.
    #[must_use]
    pub fn context_features(&self) -> &ContextMap {
        &self.context_features
    }

    /// All sequence features, ordered by name.
    #[must_use]
    pub fn sequence_features(&self) -> &SequenceMap {
        &self.sequence_features
    }

    /// Returns `true` if the record has no features at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.context_features.is_empty() && self.sequence_features.is_empty()
    }
}

/// Assembles encoder maps into a [`Record`].
///
/// Kept apart from extraction so the framing of sequence columns can change
/// without touching [`crate::GroupEncoder`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RecordBuilder;

impl RecordBuilder {
    /// Builds a record from already-encoded maps. Never fails.
    #[must_use]
    pub fn build(context: ContextMap, sequence: SequenceMap) -> Record {
        Record {
            context_features: context,
            sequence_features: sequence,
        }
    }
}
