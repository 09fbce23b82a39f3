//! Error types for seqdedup
//!
//! This module defines all error types produced by the trie, the distance
//! and quality kernels, the dissection policies, and the FASTQ pipeline
//! built on top of them.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for seqdedup operations
#[derive(Error, Debug)]
pub enum DedupError {
    /// A caller-supplied argument violates a documented precondition: a
    /// malformed alphabet, an out-of-range length spec, a zero-length
    /// sequence, mismatched input/output file counts.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation that requires at least one element was asked to run on
    /// none, e.g. dissecting an empty cluster or popping from an empty trie.
    #[error("operation requires a non-empty input: {0}")]
    Empty(String),

    /// Input bytes could not be parsed as the expected format: FASTQ record
    /// framing, mate-file desynchronization, a quality string whose length
    /// does not match its sequence.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A fallible allocation path could not obtain memory. Most allocation
    /// failure in Rust aborts the process before reaching this variant; it
    /// exists for the trie's bulk arena growth, which goes through a
    /// fallible reservation.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// I/O error during FASTQ file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File or directory not found
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Configuration error: a malformed CLI argument combination or config
    /// file value.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Stats report serialization error
    #[error("report error: {0}")]
    ReportError(String),

    /// Multiple errors occurred, e.g. across mate files processed together.
    #[error("multiple errors occurred ({count} errors)")]
    MultipleErrors {
        count: usize,
        errors: Vec<DedupError>,
    },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DedupError>,
    },
}

impl DedupError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this error is a permission issue
    pub fn is_permission_error(&self) -> bool {
        match self {
            Self::PermissionDenied(_) => true,
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::PermissionDenied,
            _ => false,
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::NotFound(path) | Self::PermissionDenied(path) => {
                Some(path)
            }
            _ => None,
        }
    }
}

/// Result type alias for seqdedup operations
pub type Result<T> = std::result::Result<T, DedupError>;

impl From<std::io::Error> for DedupError {
    fn from(err: std::io::Error) -> Self {
        DedupError::Io {
            path: std::path::PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for DedupError {
    fn from(err: serde_json::Error) -> Self {
        DedupError::ReportError(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| DedupError::io(path, e))
    }
}

/// Collects multiple results into a single result
pub fn collect_errors<T>(results: Vec<Result<T>>) -> Result<Vec<T>> {
    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(value) => successes.push(value),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(successes)
    } else if errors.len() == 1 {
        Err(errors.into_iter().next().unwrap())
    } else {
        Err(DedupError::MultipleErrors {
            count: errors.len(),
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = DedupError::io("/test/path", io_err);
        assert!(err.path().is_some());
        assert_eq!(err.path().unwrap(), &PathBuf::from("/test/path"));
    }

    #[test]
    fn test_invalid_input_renders_message() {
        let err = DedupError::InvalidInput("bad alphabet".to_string());
        assert_eq!(err.to_string(), "invalid input: bad alphabet");
    }

    #[test]
    fn test_collect_errors() {
        let results: Vec<Result<i32>> = vec![Ok(1), Ok(2), Ok(3)];
        let collected = collect_errors(results);
        assert!(collected.is_ok());
        assert_eq!(collected.unwrap(), vec![1, 2, 3]);

        let results: Vec<Result<i32>> = vec![
            Ok(1),
            Err(DedupError::Empty("cluster".to_string())),
            Err(DedupError::MalformedInput("mate desync".to_string())),
        ];
        let collected = collect_errors(results);
        assert!(collected.is_err());
    }
}
