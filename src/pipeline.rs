//! Pipeline glue tying the trie, dissection policies, and FASTQ I/O
//! together into the two CLI workflows: `dedup` and `tally`.
//!
//! Grounded on `fastqdedup.deduplicate_cluster` (original_source) and
//! structurally on the teacher's copy engine: a single-threaded
//! orchestrator that reads, dedups, and writes in two passes so that the
//! trie never has to hold the whole file's worth of output in memory.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{DedupConfig, DissectPolicy, LengthSlice};
use crate::dissect;
use crate::error::Result;
use crate::fastq::{FastqRecord, MateReader, Writer};
use crate::progress::ProgressReporter;
use crate::trie::Trie;

/// Summary of a completed `dedup` run.
#[derive(Debug, Clone, Serialize)]
pub struct DedupReport {
    /// Number of mate-groups read from the input files.
    pub records_read: u64,
    /// Number of distinct keys seen (trie population before draining).
    pub distinct_keys: u64,
    /// Number of clusters drained from the trie.
    pub clusters: u64,
    /// Number of mate-groups written to the output files.
    pub records_written: u64,
    /// Wall-clock duration of the run, in seconds.
    pub elapsed_secs: f64,
}

/// Summary of a completed `tally` run.
#[derive(Debug, Clone, Serialize)]
pub struct TallyReport {
    /// Number of mate-groups read from the input files.
    pub records_read: u64,
    /// Number of distinct keys inserted into the trie.
    pub distinct_keys: u64,
    /// Per-depth node population, see [`Trie::raw_stats`].
    pub raw_stats: Vec<Vec<u64>>,
    /// Approximate resident byte size of the trie, see [`Trie::memory_size`].
    pub memory_size: usize,
}

/// Orchestrates a full deduplication run over mate-synchronized FASTQ
/// files: build a trie of keys, drain it cluster by cluster keeping one
/// representative per cluster, then re-stream the inputs writing only
/// the retained records.
pub struct DedupPipeline {
    config: DedupConfig,
    progress: Option<ProgressReporter>,
}

impl DedupPipeline {
    /// Build a pipeline from a validated configuration.
    pub fn new(config: DedupConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Attach a progress reporter; records and bytes are reported as both
    /// read passes stream through the input files.
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run the full two-pass dedup workflow.
    pub fn run(&self) -> Result<DedupReport> {
        let start = Instant::now();

        if let Some(progress) = &self.progress {
            let total_bytes: u64 = self
                .config
                .inputs
                .iter()
                .filter_map(|p| std::fs::metadata(p).ok())
                .map(|m| m.len())
                .sum();
            progress.set_total_bytes(total_bytes);
            progress.set_status("reading input and building trie");
        }

        let mut trie = Trie::new();
        let mut records_read: u64 = 0;
        {
            let mut reader = MateReader::open(&self.config.inputs)?;
            while let Some(group) = reader.read_group()? {
                let key = self.derive_key(&group);
                trie.insert(&key)?;
                records_read += 1;
                if let Some(progress) = &self.progress {
                    progress.increment_records(1);
                    let bytes: u64 = group.iter().map(|r| r.sequence.len() as u64).sum();
                    progress.increment_bytes(bytes);
                }
            }
        }
        let distinct_keys = trie.number_of_sequences();
        debug!(records_read, distinct_keys, "ingested input into trie");

        if let Some(progress) = &self.progress {
            progress.set_status("draining clusters");
        }

        let mut retained_hashes: HashSet<u64> = HashSet::new();
        let mut clusters: u64 = 0;
        while !trie.is_empty() {
            let cluster = trie.pop_cluster(self.config.max_distance, self.config.use_edit)?;
            clusters += 1;
            let representatives = dissect_cluster(self.config.policy, &cluster, self.config.max_distance);
            for key in representatives {
                retained_hashes.insert(hash_key(&key));
            }
        }
        info!(clusters, retained = retained_hashes.len(), "drained trie");

        if let Some(progress) = &self.progress {
            progress.set_status("writing retained records");
        }

        let mut writers = self
            .config
            .outputs
            .iter()
            .map(Writer::create)
            .collect::<Result<Vec<_>>>()?;

        let mut records_written: u64 = 0;
        {
            let mut reader = MateReader::open(&self.config.inputs)?;
            while let Some(group) = reader.read_group()? {
                let key = self.derive_key(&group);
                if retained_hashes.contains(&hash_key(&key)) {
                    for (writer, record) in writers.iter_mut().zip(group.iter()) {
                        writer.write_record(record)?;
                    }
                    records_written += 1;
                }
            }
        }
        for writer in writers {
            writer.finish()?;
        }

        let report = DedupReport {
            records_read,
            distinct_keys,
            clusters,
            records_written,
            elapsed_secs: start.elapsed().as_secs_f64(),
        };

        if let Some(progress) = &self.progress {
            progress.finish_success(&format!(
                "{} of {} records retained",
                report.records_written, report.records_read
            ));
        }

        Ok(report)
    }

    fn derive_key(&self, group: &[FastqRecord]) -> Vec<u8> {
        match &self.config.check_lengths {
            None => group.iter().flat_map(|r| r.sequence.iter().copied()).collect(),
            Some(slices) => group
                .iter()
                .zip(slices.iter())
                .flat_map(|(record, slice)| apply_slice(&record.sequence, *slice))
                .collect(),
        }
    }
}

/// Ingest sequences from one or more FASTQ files into a trie and report
/// its statistics, without deduplicating or writing anything back out.
pub fn tally(inputs: &[PathBuf]) -> Result<TallyReport> {
    let mut trie = Trie::new();
    let mut records_read: u64 = 0;

    let mut reader = MateReader::open(inputs)?;
    while let Some(group) = reader.read_group()? {
        let key: Vec<u8> = group.iter().flat_map(|r| r.sequence.iter().copied()).collect();
        trie.insert(&key)?;
        records_read += 1;
    }

    Ok(TallyReport {
        records_read,
        distinct_keys: trie.number_of_sequences(),
        raw_stats: trie.raw_stats(),
        memory_size: trie.memory_size(),
    })
}

fn dissect_cluster(policy: DissectPolicy, cluster: &[(u64, Vec<u8>)], max_distance: u32) -> Vec<Vec<u8>> {
    match policy {
        DissectPolicy::HighestCount => dissect::highest_count(cluster),
        DissectPolicy::Adjacency => dissect::adjacency(cluster, max_distance),
        DissectPolicy::Directional => dissect::directional(cluster, max_distance),
    }
}

fn hash_key(key: &[u8]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

fn normalize_index(index: i64, len: i64) -> i64 {
    if index < 0 {
        index + len
    } else {
        index
    }
}

/// Resolve a `(start, stop, step)` triple against a concrete length the
/// way Python's `slice.indices()` does: negative indices count from the
/// end, and out-of-range bounds clamp rather than error.
fn slice_bounds(len: usize, start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> (i64, i64, i64) {
    let len = len as i64;
    let step = step.unwrap_or(1);
    let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };

    let start = match start {
        Some(s) => {
            let s = normalize_index(s, len);
            if step > 0 { s.clamp(0, len) } else { s.clamp(-1, len - 1) }
        }
        None => {
            if step > 0 {
                lower
            } else {
                upper
            }
        }
    };

    let stop = match stop {
        Some(s) => {
            let s = normalize_index(s, len);
            if step > 0 { s.clamp(0, len) } else { s.clamp(-1, len - 1) }
        }
        None => {
            if step > 0 {
                upper
            } else {
                lower
            }
        }
    };

    (start, stop, step)
}

/// Apply a parsed length slice to a sequence, Python-`seq[start:stop:step]`
/// style.
fn apply_slice(seq: &[u8], slice: LengthSlice) -> Vec<u8> {
    let (start, stop, step) = slice;
    let (start, stop, step) = slice_bounds(seq.len(), start, stop, step);
    let mut out = Vec::new();
    if step > 0 {
        let mut i = start;
        while i < stop {
            out.push(seq[i as usize]);
            i += step;
        }
    } else {
        let mut i = start;
        while i > stop {
            out.push(seq[i as usize]);
            i += step;
        }
    }
    out
}
