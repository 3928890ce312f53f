// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `seqrec` command-line driver.
//! Groups JSON-lines rows by a key field and emits one ranking record per group.

mod driver;
mod grouping;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use seqrec_config::{FeatureConfig, FeatureConfigSource};
use seqrec_core::GroupEncoder;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::driver::{encode_groups, FailurePolicy};
use crate::grouping::{group_rows, read_rows};

#[derive(Parser, Debug)]
#[command(author, version, about = "Sequence-example record encoder for ranking data")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode grouped rows into records, one JSON line per group
    Encode {
        /// Feature config: path to a JSON file, or the JSON text itself
        #[arg(long)]
        feature_config: String,
        /// JSON-lines input rows ("-" reads stdin)
        #[arg(long, default_value = "-")]
        input: PathBuf,
        /// Field identifying a group; defaults to the config's group_key
        #[arg(long)]
        group_key: Option<String>,
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Abort on the first group that fails to encode
        #[arg(long)]
        fail_fast: bool,
    },
    /// Validate a feature config against the registered types
    Check {
        /// Feature config: path to a JSON file, or the JSON text itself
        #[arg(long)]
        feature_config: String,
    },
    /// List the registered semantic type tags
    Types,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(io::stderr)
        .init();

    match args.command {
        Command::Encode {
            feature_config,
            input,
            group_key,
            output,
            fail_fast,
        } => encode(
            &feature_config,
            &input,
            group_key,
            output,
            if fail_fast {
                FailurePolicy::FailFast
            } else {
                FailurePolicy::Skip
            },
        ),
        Command::Check { feature_config } => check(&feature_config),
        Command::Types => types(),
    }
}

fn load_config(arg: &str) -> Result<FeatureConfig> {
    let source = FeatureConfigSource::parse(arg);
    FeatureConfig::load(&source).with_context(|| match &source {
        FeatureConfigSource::Inline(_) => "load inline feature config".to_owned(),
        FeatureConfigSource::Path(path) => format!("load feature config {}", path.display()),
    })
}

fn open_input(input: &Path) -> Result<Box<dyn BufRead>> {
    if input.as_os_str() == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(input).with_context(|| format!("open input {}", input.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn encode(
    feature_config: &str,
    input: &Path,
    group_key: Option<String>,
    output: Option<PathBuf>,
    policy: FailurePolicy,
) -> Result<()> {
    let config = load_config(feature_config)?;
    let key = group_key
        .or_else(|| config.group_key().map(str::to_owned))
        .ok_or_else(|| anyhow!("no --group-key given and the feature config declares none"))?;
    let (context, sequence) = config.partition();

    let rows = read_rows(open_input(input)?)?;
    let groups = group_rows(rows, &key)?;
    info!(
        groups = groups.len(),
        context = context.len(),
        sequence = sequence.len(),
        group_key = %key,
        "encoding"
    );

    let encoder = GroupEncoder::global();
    match output {
        Some(path) => {
            let file =
                File::create(&path).with_context(|| format!("create output {}", path.display()))?;
            let mut out = BufWriter::new(file);
            encode_groups(encoder, &groups, &context, &sequence, policy, &mut out)?;
        }
        None => {
            let mut out = io::stdout().lock();
            encode_groups(encoder, &groups, &context, &sequence, policy, &mut out)?;
        }
    }
    Ok(())
}

fn check(feature_config: &str) -> Result<()> {
    let config = load_config(feature_config)?;
    let registry = GroupEncoder::global().registry();

    let unknown: Vec<_> = config
        .features()
        .iter()
        .filter(|f| !registry.contains(&f.semantic_type))
        .collect();
    for feature in &unknown {
        warn!(feature = %feature.name, dtype = %feature.semantic_type, "unregistered type");
    }
    if !unknown.is_empty() {
        bail!("{} feature(s) use unregistered types", unknown.len());
    }

    let (context, sequence) = config.partition();
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "ok: {} context, {} sequence feature(s)",
        context.len(),
        sequence.len()
    )?;
    Ok(())
}

fn types() -> Result<()> {
    let mut out = io::stdout().lock();
    for tag in GroupEncoder::global().registry().tags() {
        writeln!(out, "{tag}")?;
    }
    Ok(())
}
