// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-group encoding loop and failure policy.

use std::io::Write;

use anyhow::{Context, Result};
use seqrec_core::{FeatureDescriptor, GroupEncoder, Record};
use serde::Serialize;
use tracing::{info, warn};

use crate::grouping::KeyedGroup;

/// What to do when one group fails to encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailurePolicy {
    /// Log the failure and continue with the next group.
    Skip,
    /// Abort the run on the first failure.
    FailFast,
}

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EncodeSummary {
    pub encoded: usize,
    pub skipped: usize,
}

#[derive(Serialize)]
struct OutputLine<'a> {
    key: &'a str,
    rows: usize,
    record: &'a Record,
}

/// Encodes every group and writes one JSON line per record to `out`.
pub(crate) fn encode_groups<W: Write>(
    encoder: GroupEncoder<'_>,
    groups: &[KeyedGroup],
    context: &[FeatureDescriptor],
    sequence: &[FeatureDescriptor],
    policy: FailurePolicy,
    out: &mut W,
) -> Result<EncodeSummary> {
    let mut summary = EncodeSummary::default();

    for KeyedGroup { key, group } in groups {
        let record = match encoder.encode_record(group, context, sequence) {
            Ok(record) => record,
            Err(err) if policy == FailurePolicy::Skip => {
                warn!(key = %key, feature = err.feature(), error = %err, "skipping group");
                summary.skipped += 1;
                continue;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("encode group `{key}`"));
            }
        };

        let line = OutputLine {
            key,
            rows: group.len(),
            record: &record,
        };
        serde_json::to_writer(&mut *out, &line).context("serialize record")?;
        out.write_all(b"\n").context("write record")?;
        summary.encoded += 1;
    }

    out.flush().context("flush output")?;
    info!(
        encoded = summary.encoded,
        skipped = summary.skipped,
        "encode finished"
    );
    Ok(summary)
}
