// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON-lines row reading and key-based grouping.

use std::collections::HashMap;
use std::io::BufRead;

use anyhow::{anyhow, Context, Result};
use seqrec_core::{Group, Row};

/// One keyed group in first-appearance order.
#[derive(Debug)]
pub(crate) struct KeyedGroup {
    pub key: String,
    pub group: Group,
}

/// Reads one JSON object per non-blank line.
pub(crate) fn read_rows(reader: impl BufRead) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let row: Row = serde_json::from_str(&line)
            .with_context(|| format!("parse row on line {}", index + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Groups rows by the value of `key`.
///
/// Groups are ordered by the first row carrying each key; rows keep their
/// input order within a group. Keys of different kinds never share a group,
/// even when they print the same (`7` and `"7"`).
pub(crate) fn group_rows(rows: Vec<Row>, key: &str) -> Result<Vec<KeyedGroup>> {
    let mut index: HashMap<(&'static str, String), usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<Row>)> = Vec::new();

    for (n, row) in rows.into_iter().enumerate() {
        let value = row
            .get(key)
            .ok_or_else(|| anyhow!("row {n} has no group key field `{key}`"))?;
        let text = value.to_string();
        let slot = *index
            .entry((value.kind(), text.clone()))
            .or_insert_with(|| {
                buckets.push((text, Vec::new()));
                buckets.len() - 1
            });
        buckets[slot].1.push(row);
    }

    Ok(buckets
        .into_iter()
        .map(|(key, rows)| KeyedGroup {
            key,
            group: Group::new(rows),
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use seqrec_core::RawValue;

    #[test]
    fn read_rows_skips_blank_lines() {
        let input = "{\"q\": \"a\"}\n\n  \n{\"q\": \"b\", \"n\": 2}\n";
        let rows = read_rows(input.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("n"), Some(&RawValue::Int(2)));
    }

    #[test]
    fn read_rows_reports_line_number() {
        let err = read_rows("{\"q\": 1}\nnot json\n".as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"), "{err:#}");
    }

    #[test]
    fn groups_follow_first_appearance() {
        let rows = vec![
            Row::new().with("q", "b").with("i", 0_i64),
            Row::new().with("q", "a").with("i", 1_i64),
            Row::new().with("q", "b").with("i", 2_i64),
            Row::new().with("q", 7_i64).with("i", 3_i64),
        ];
        let groups = group_rows(rows, "q").unwrap();
        let keys: Vec<_> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, ["b", "a", "7"]);
        let b: Vec<_> = groups[0]
            .group
            .rows()
            .iter()
            .map(|r| r.get("i").cloned().unwrap())
            .collect();
        assert_eq!(b, [RawValue::Int(0), RawValue::Int(2)]);
    }

    #[test]
    fn keys_of_different_kinds_stay_apart() {
        let rows = vec![
            Row::new().with("q", 7_i64),
            Row::new().with("q", "7"),
            Row::new().with("q", 1.0),
            Row::new().with("q", 1_i64),
            Row::new().with("q", "null"),
            Row::new().with("q", RawValue::Null),
            Row::new().with("q", 7_i64),
        ];
        let groups = group_rows(rows, "q").unwrap();
        assert_eq!(groups.len(), 6);
        let sizes: Vec<_> = groups.iter().map(|g| g.group.len()).collect();
        assert_eq!(sizes, [2, 1, 1, 1, 1, 1]);
        assert_eq!(groups[0].group.rows()[0].get("q"), Some(&RawValue::Int(7)));
        assert_eq!(groups[1].group.rows()[0].get("q"), Some(&RawValue::from("7")));
        assert_eq!(groups[5].group.rows()[0].get("q"), Some(&RawValue::Null));
    }

    #[test]
    fn missing_group_key_is_an_error() {
        let rows = vec![Row::new().with("q", "a"), Row::new()];
        let err = group_rows(rows, "q").unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }
}
