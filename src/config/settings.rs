//! Configuration settings for seqdedup
//!
//! Defines CLI arguments, subcommands, and the runtime configuration
//! derived from them.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{DedupError, Result};

/// seqdedup - alignment-free deduplication for short-read FASTQ and UMIs
#[derive(Parser, Debug, Clone)]
#[command(name = "seqdedup")]
#[command(author = "SeqDedup Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Alignment-free deduplication engine for short read FASTQ files and UMIs")]
#[command(long_about = r#"
seqdedup collapses PCR and optical duplicates from short-read FASTQ files
without aligning to a reference, using a compressed trie to find clusters
of near-identical sequences and one of three policies to pick a survivor
per cluster.

Examples:
  seqdedup dedup reads.fastq.gz -o dedup.fastq.gz
  seqdedup dedup r1.fastq.gz r2.fastq.gz -o r1.dedup.fastq.gz -o r2.dedup.fastq.gz --max-distance 2
  seqdedup tally reads.fastq.gz --output-format json
"#)]
pub struct CliArgs {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Output format for reports
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub output_format: OutputFormat,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Deduplicate one or more mate-synchronized FASTQ files
    #[command(name = "dedup")]
    Dedup {
        /// Input FASTQ file(s), gzip auto-detected by a `.gz` suffix
        #[arg(required = true)]
        input: Vec<PathBuf>,

        /// Output FASTQ file(s), one per input, in the same order
        #[arg(short = 'o', long = "output", required = true)]
        output: Vec<PathBuf>,

        /// Maximum distance between sequences in the same cluster
        #[arg(short = 'd', long, default_value = "0")]
        max_distance: u32,

        /// Use Levenshtein edit distance instead of Hamming distance
        #[arg(long)]
        use_edit: bool,

        /// Dissection policy used to pick a survivor per cluster
        #[arg(long, value_enum, default_value = "highest-count")]
        policy: DissectPolicy,

        /// Comma-separated slice spec selecting which part of each mate's
        /// sequence contributes to the dedup key (e.g. "8", "5:8",
        /// "::16"). One slice per input file; defaults to the whole
        /// sequence of every file.
        #[arg(long)]
        check_lengths: Option<String>,
    },

    /// Ingest sequences (e.g. UMIs) and report trie statistics without
    /// deduplicating
    #[command(name = "tally")]
    Tally {
        /// Input FASTQ file(s)
        #[arg(required = true)]
        input: Vec<PathBuf>,
    },
}

/// Output format for the stats report
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Cluster dissection policy selectable from the CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DissectPolicy {
    /// Keep the single highest-count representative
    #[default]
    #[value(name = "highest-count")]
    HighestCount,
    /// Iteratively keep the highest-count item and drop its neighbors
    Adjacency,
    /// Model PCR error chains absorbing lower-count neighbors
    Directional,
}

/// A parsed Python-style slice: `(start, stop, step)`, each optionally
/// absent (`None`).
pub type LengthSlice = (Option<i64>, Option<i64>, Option<i64>);

/// Parse a comma-separated slice spec into one [`LengthSlice`] per input
/// file, following the same `start:stop:step` grammar as the length
/// strings accepted upstream (a bare number is a `stop`-only slice, empty
/// or `None` fields stay `None`).
pub fn parse_length_spec(spec: &str) -> Result<Vec<LengthSlice>> {
    spec.split(',')
        .map(|part| {
            let values: Result<Vec<Option<i64>>> = part
                .split(':')
                .map(|field| {
                    if field.is_empty() || field == "None" {
                        Ok(None)
                    } else {
                        field
                            .parse::<i64>()
                            .map(Some)
                            .map_err(|_| {
                                DedupError::InvalidInput(format!(
                                    "invalid integer {:?} in length spec {:?}",
                                    field, spec
                                ))
                            })
                    }
                })
                .collect();
            let values = values?;
            match values.as_slice() {
                [stop] => Ok((None, *stop, None)),
                [start, stop] => Ok((*start, *stop, None)),
                [start, stop, step] => Ok((*start, *stop, *step)),
                _ => Err(DedupError::InvalidInput(format!(
                    "length spec slice {:?} must have 1 to 3 colon-separated fields",
                    part
                ))),
            }
        })
        .collect()
}

/// Runtime configuration for a `dedup` run, derived from CLI args.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Input FASTQ paths, mate-synchronized in order
    pub inputs: Vec<PathBuf>,
    /// Output FASTQ paths, one per input
    pub outputs: Vec<PathBuf>,
    /// Cluster distance bound
    pub max_distance: u32,
    /// Whether to use edit distance instead of Hamming
    pub use_edit: bool,
    /// Dissection policy
    pub policy: DissectPolicy,
    /// Per-input key slices, if restricting which part of each sequence
    /// contributes to the dedup key
    pub check_lengths: Option<Vec<LengthSlice>>,
}

impl DedupConfig {
    /// Build a [`DedupConfig`] from parsed `dedup` subcommand arguments.
    ///
    /// Fails with [`DedupError::InvalidInput`] if the input and output
    /// counts disagree, or if `check_lengths` is present but its slice
    /// count does not match the input count.
    pub fn from_dedup_args(
        input: Vec<PathBuf>,
        output: Vec<PathBuf>,
        max_distance: u32,
        use_edit: bool,
        policy: DissectPolicy,
        check_lengths: Option<String>,
    ) -> Result<Self> {
        if input.len() != output.len() {
            return Err(DedupError::InvalidInput(format!(
                "amount of output files ({}) must equal the amount of input files ({})",
                output.len(),
                input.len()
            )));
        }

        let check_lengths = check_lengths.map(|spec| parse_length_spec(&spec)).transpose()?;
        if let Some(slices) = &check_lengths {
            if slices.len() != input.len() {
                return Err(DedupError::InvalidInput(format!(
                    "amount of check-length slices ({}) must equal the amount of input files ({})",
                    slices.len(),
                    input.len()
                )));
            }
        }

        Ok(Self {
            inputs: input,
            outputs: output,
            max_distance,
            use_edit,
            policy,
            check_lengths,
        })
    }
}
