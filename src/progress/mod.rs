//! Progress reporting module
//!
//! Provides real-time progress visualization for dedup pipeline runs,
//! with ETA calculation and throughput display.

mod reporter;

pub use reporter::*;
