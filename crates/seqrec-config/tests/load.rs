// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use std::io::Write;

use seqrec_config::{ConfigError, FeatureConfig, FeatureConfigSource};
use seqrec_core::{FeatureTypeRegistry, Group, GroupEncoder, Row, TypedFeatureValue};

const DOC: &str = r#"{
    "query_key": "query_id",
    "features": [
        { "name": "query_id", "dtype": "string", "role": "context" },
        { "name": "score", "dtype": "float", "role": "sequence" }
    ]
}"#;

#[test]
fn file_and_inline_sources_load_the_same_config() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(DOC.as_bytes()).expect("write");

    let path = file.path().to_str().expect("utf-8 path").to_owned();
    let from_file = FeatureConfig::load(&FeatureConfigSource::parse(&path)).expect("file");
    let inline = FeatureConfig::load(&FeatureConfigSource::parse(DOC)).expect("inline");
    assert_eq!(from_file, inline);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FeatureConfigSource::Path(dir.path().join("absent.json"));
    assert!(matches!(
        FeatureConfig::load(&source),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn loaded_config_drives_the_encoder() {
    let config = FeatureConfig::from_json_str(DOC).expect("config");
    let (context, sequence) = config.partition();
    let registry = FeatureTypeRegistry::with_builtins();
    let group = Group::new(vec![
        Row::new().with("query_id", "q7").with("score", 2.0),
        Row::new().with("query_id", "q7").with("score", 1.0),
    ]);
    let record = GroupEncoder::new(&registry)
        .encode_record(&group, &context, &sequence)
        .expect("encode");
    assert_eq!(
        record.context("query_id"),
        Some(&TypedFeatureValue::BytesList(vec![b"q7".to_vec()]))
    );
    assert_eq!(
        record.sequence("score").and_then(|l| l.first()),
        Some(&TypedFeatureValue::FloatList(vec![2.0, 1.0]))
    );
}
