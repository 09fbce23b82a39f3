//! Configuration module for seqdedup
//!
//! Provides CLI argument parsing and the runtime configuration derived
//! from it.

mod settings;

pub use settings::*;
