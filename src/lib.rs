//! # seqdedup - Alignment-Free Deduplication for Short-Read FASTQ
//!
//! seqdedup collapses PCR and optical duplicates from short-read FASTQ
//! files without aligning to a reference. Sequences (or UMIs) are inserted
//! into a compressed, count-bearing trie; clusters of near-identical
//! strings are then drained and dissected down to a representative set
//! under one of three PCR-artifact-rooted policies.
//!
//! ## Quick Start
//!
//! ```no_run
//! use seqdedup::config::{DedupConfig, DissectPolicy};
//! use seqdedup::pipeline::DedupPipeline;
//! use std::path::PathBuf;
//!
//! let config = DedupConfig::from_dedup_args(
//!     vec![PathBuf::from("reads.fastq.gz")],
//!     vec![PathBuf::from("dedup.fastq.gz")],
//!     1,
//!     false,
//!     DissectPolicy::HighestCount,
//!     None,
//! ).unwrap();
//!
//! let report = DedupPipeline::new(config).run().unwrap();
//! println!("{} of {} records retained", report.records_written, report.records_read);
//! ```
//!
//! ## Trie Core
//!
//! ```
//! use seqdedup::trie::Trie;
//!
//! let mut trie = Trie::new();
//! trie.insert(b"ACGTACGT").unwrap();
//! trie.insert(b"ACGTACGA").unwrap();
//! assert_eq!(trie.number_of_sequences(), 2);
//!
//! let cluster = trie.pop_cluster(1, false).unwrap();
//! assert_eq!(cluster.iter().map(|(count, _)| count).sum::<u64>(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alphabet;
pub mod config;
pub mod dissect;
pub mod distance;
pub mod error;
pub mod fastq;
pub mod pipeline;
pub mod progress;
pub mod quality;
pub mod trie;

pub use error::{DedupError, Result};
pub use pipeline::{DedupPipeline, DedupReport, TallyReport};
pub use progress::ProgressReporter;
pub use trie::Trie;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenient re-exports for common usage.
pub mod prelude {
    //! ```no_run
    //! use seqdedup::prelude::*;
    //! ```

    pub use crate::alphabet::Alphabet;
    pub use crate::config::{CliArgs, Commands, DedupConfig, DissectPolicy, OutputFormat};
    pub use crate::distance::{edit_within, hamming_within};
    pub use crate::error::{DedupError, Result};
    pub use crate::fastq::{FastqRecord, MateReader, Reader, Writer};
    pub use crate::pipeline::{DedupPipeline, DedupReport, TallyReport};
    pub use crate::progress::ProgressReporter;
    pub use crate::quality::average_error_rate;
    pub use crate::trie::Trie;
}
