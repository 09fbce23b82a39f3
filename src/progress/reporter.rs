//! Progress reporter implementation
//!
//! Uses indicatif for progress bars over:
//! - Record count progress
//! - Byte throughput
//! - ETA display

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Progress reporter for a dedup pipeline run.
pub struct ProgressReporter {
    /// Multi-progress container
    multi: MultiProgress,
    /// Main progress bar (bytes)
    bytes_bar: ProgressBar,
    /// Record count progress bar
    records_bar: ProgressBar,
    /// Current status message
    status: ProgressBar,
    /// Start time
    start_time: Instant,
    /// Total bytes to read
    total_bytes: AtomicU64,
    /// Total records expected (0 if unknown ahead of time)
    total_records: AtomicU64,
    /// Bytes read so far
    bytes_read: AtomicU64,
    /// Records read so far
    records_read: AtomicU64,
    /// Is progress enabled
    enabled: AtomicBool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let multi = MultiProgress::new();

        let status = multi.add(ProgressBar::new_spinner());
        status.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );

        let records_bar = multi.add(ProgressBar::new(0));
        records_bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos}/{len} records ({percent}%)")
                .expect("invalid template")
                .progress_chars("=> "),
        );
        records_bar.set_prefix("Records");

        let bytes_bar = multi.add(ProgressBar::new(0));
        bytes_bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.dim} [{bar:40.green/white}] {bytes}/{total_bytes} ({bytes_per_sec}, ETA {eta})")
                .expect("invalid template")
                .progress_chars("=> "),
        );
        bytes_bar.set_prefix("Data   ");

        Self {
            multi,
            bytes_bar,
            records_bar,
            status,
            start_time: Instant::now(),
            total_bytes: AtomicU64::new(0),
            total_records: AtomicU64::new(0),
            bytes_read: AtomicU64::new(0),
            records_read: AtomicU64::new(0),
            enabled: AtomicBool::new(true),
        }
    }

    /// Create a disabled progress reporter (for quiet mode)
    pub fn disabled() -> Self {
        let reporter = Self::new();
        reporter.enabled.store(false, Ordering::SeqCst);
        reporter.multi.set_draw_target(ProgressDrawTarget::hidden());
        reporter
    }

    /// Set total bytes expected to be read
    pub fn set_total_bytes(&self, total: u64) {
        self.total_bytes.store(total, Ordering::Relaxed);
        self.bytes_bar.set_length(total);
    }

    /// Set total records expected
    pub fn set_total_records(&self, total: u64) {
        self.total_records.store(total, Ordering::Relaxed);
        self.records_bar.set_length(total);
    }

    /// Record that `bytes` more bytes were read
    pub fn increment_bytes(&self, bytes: u64) {
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
        self.bytes_bar.inc(bytes);
    }

    /// Record that `count` more records were read
    pub fn increment_records(&self, count: u64) {
        self.records_read.fetch_add(count, Ordering::Relaxed);
        self.records_bar.inc(count);
    }

    /// Set current status message
    pub fn set_status(&self, msg: &str) {
        self.status.set_message(msg.to_string());
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get current throughput in bytes/second
    pub fn throughput(&self) -> f64 {
        let bytes = self.bytes_read.load(Ordering::Relaxed);
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            bytes as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Finish progress with success message
    pub fn finish_success(&self, message: &str) {
        self.status.finish_with_message(format!("done: {}", message));
        self.records_bar.finish();
        self.bytes_bar.finish();
    }

    /// Finish progress with error message
    pub fn finish_error(&self, message: &str) {
        self.status.finish_with_message(format!("failed: {}", message));
        self.records_bar.abandon();
        self.bytes_bar.abandon();
    }

    /// Check if progress is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Get progress summary
    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary {
            total_bytes: self.total_bytes.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            total_records: self.total_records.load(Ordering::Relaxed),
            records_read: self.records_read.load(Ordering::Relaxed),
            elapsed: self.elapsed(),
            throughput: self.throughput(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress summary
#[derive(Debug, Clone)]
pub struct ProgressSummary {
    /// Total bytes expected to be read
    pub total_bytes: u64,
    /// Bytes read so far
    pub bytes_read: u64,
    /// Total records expected
    pub total_records: u64,
    /// Records read so far
    pub records_read: u64,
    /// Elapsed time
    pub elapsed: Duration,
    /// Throughput in bytes/second
    pub throughput: f64,
}

impl ProgressSummary {
    /// Get completion percentage
    pub fn percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            (self.bytes_read as f64 / self.total_bytes as f64) * 100.0
        }
    }

    /// Print summary to console
    pub fn print(&self) {
        println!("Progress: {:.1}%", self.percentage());
        println!("Records:  {}/{}", self.records_read, self.total_records);
        println!(
            "Bytes:    {}/{}",
            humansize::format_size(self.bytes_read, humansize::BINARY),
            humansize::format_size(self.total_bytes, humansize::BINARY)
        );
        println!("Elapsed:  {:.1?}", self.elapsed);
        println!(
            "Speed:    {}/s",
            humansize::format_size(self.throughput as u64, humansize::BINARY)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_reporter() {
        let reporter = ProgressReporter::disabled();

        reporter.set_total_bytes(1000);
        reporter.set_total_records(10);

        reporter.increment_bytes(500);
        reporter.increment_records(5);

        let summary = reporter.summary();
        assert_eq!(summary.bytes_read, 500);
        assert_eq!(summary.records_read, 5);
        assert_eq!(summary.percentage(), 50.0);
    }
}
