// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! seqrec-core: typed context/sequence encoding for ranking records.
//!
//! A caller hands over one group of rows (already grouped by query or session
//! key) plus two descriptor lists. The [`GroupEncoder`] dispatches every
//! descriptor through the [`FeatureTypeRegistry`] and [`RecordBuilder`] folds
//! the results into a [`Record`]:
//!
//! ```
//! use seqrec_core::{FeatureDescriptor, FeatureTypeRegistry, Group, GroupEncoder, Row};
//!
//! let registry = FeatureTypeRegistry::with_builtins();
//! let group = Group::new(vec![
//!     Row::new().with("query_id", "q1").with("score", 0.1),
//!     Row::new().with("query_id", "q1").with("score", 0.9),
//! ]);
//! let record = GroupEncoder::new(&registry)
//!     .encode_record(
//!         &group,
//!         &[FeatureDescriptor::context("query_id", "string")],
//!         &[FeatureDescriptor::sequence("score", "float")],
//!     )
//!     .unwrap();
//! assert_eq!(record.sequence("score").map(|l| l.len()), Some(1));
//! ```
//!
//! Encoding is pure and the registry is read-only once built, so independent
//! groups can be encoded from multiple threads without coordination.
#![forbid(unsafe_code)]

mod descriptor;
mod encoder;
mod group;
mod record;
pub mod registry;
mod value;

/// Feature descriptor types.
pub use descriptor::{FeatureDescriptor, FeatureRole, SemanticType, ServingInfo};
/// Group encoder, its maps, and its error taxonomy.
pub use encoder::{ContextMap, EncodeError, EncodedGroup, GroupEncoder, SequenceMap};
/// Input rows and groups.
pub use group::{Group, Row};
/// Record assembly.
pub use record::{Record, RecordBuilder};
/// Encoder registry.
pub use registry::{
    EncodeFn, FeatureTypeRegistry, RegistryError, UnsupportedTypeError, ValueError,
};
/// Raw and typed values.
pub use value::{FeatureList, RawValue, TypedFeatureValue};
