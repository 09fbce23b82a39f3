//! Phred quality-score interpretation.
//!
//! FASTQ quality strings encode a per-base error probability as
//! `Q = -10 * log10(p)`, offset by an ASCII base (33 for Phred+33, the only
//! encoding this crate supports). This module turns a quality string into
//! an average error rate using a precomputed lookup table so the expensive
//! `10^(-Q/10)` call happens at most 256 times total, not once per base.

use crate::error::{DedupError, Result};

/// ASCII offset for Phred+33 quality encoding (the universal modern FASTQ
/// encoding; Phred+64 is not supported as a default, though any offset can
/// be passed explicitly to [`average_error_rate`]).
pub const PHRED33_OFFSET: u8 = 33;

/// Highest legal ASCII byte for an encoded quality score, regardless of
/// offset (the printable-ASCII ceiling).
const MAX_ASCII_BYTE: u8 = 126;

/// Precomputed `score -> error probability` table.
///
/// `table[q]` is the error probability for Phred score `q`, covering every
/// score reachable by any legal `(byte, offset)` pair (`q = byte - offset`,
/// up to `MAX_ASCII_BYTE` when `offset` is 0).
fn error_rate_table() -> [f64; 256] {
    let mut table = [0.0f64; 256];
    for (q, slot) in table.iter_mut().enumerate().take(MAX_ASCII_BYTE as usize + 1) {
        *slot = 10f64.powf(-(q as f64) / 10.0);
    }
    table
}

/// Compute the mean per-base error probability implied by a quality string
/// encoded with the given ASCII `offset` (33 for Sanger Phred+33).
///
/// Fails with [`DedupError::InvalidInput`] if `quality` is empty, if any
/// byte has the high bit set (not ASCII), or if any byte falls outside
/// `[offset, 126]`.
pub fn average_error_rate(quality: &[u8], offset: u8) -> Result<f64> {
    if quality.is_empty() {
        return Err(DedupError::InvalidInput(
            "quality string must not be empty".to_string(),
        ));
    }

    let table = error_rate_table();
    let mut sum = 0.0f64;
    for &byte in quality {
        if byte >= 128 {
            return Err(DedupError::InvalidInput(format!(
                "byte {byte} is not ASCII (high bit set)"
            )));
        }
        if byte < offset || byte > MAX_ASCII_BYTE {
            return Err(DedupError::InvalidInput(format!(
                "byte {:?} is outside the legal Phred range [{}, {}]",
                byte as char, offset, MAX_ASCII_BYTE
            )));
        }
        let q = (byte - offset) as usize;
        sum += table[q];
    }
    Ok(sum / quality.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_quality_gives_near_zero_error() {
        // 'I' is Phred 40, error rate 1e-4.
        let rate = average_error_rate(b"IIII", PHRED33_OFFSET).unwrap();
        assert!((rate - 1e-4).abs() < 1e-9);
    }

    #[test]
    fn lowest_quality_gives_highest_error() {
        // '!' is Phred 0, error rate 1.0.
        let rate = average_error_rate(b"!!!!", PHRED33_OFFSET).unwrap();
        assert!((rate - 1.0).abs() < 1e-9);
    }

    #[test]
    fn mixed_quality_averages() {
        let rate = average_error_rate(b"I!", PHRED33_OFFSET).unwrap();
        let expected = (1e-4 + 1.0) / 2.0;
        assert!((rate - expected).abs() < 1e-9);
    }

    #[test]
    fn empty_quality_is_invalid() {
        let err = average_error_rate(b"", PHRED33_OFFSET).unwrap_err();
        assert!(matches!(err, DedupError::InvalidInput(_)));
    }

    #[test]
    fn byte_below_offset_is_invalid() {
        let err = average_error_rate(&[20], PHRED33_OFFSET).unwrap_err();
        assert!(matches!(err, DedupError::InvalidInput(_)));
    }

    #[test]
    fn non_ascii_byte_is_invalid() {
        let err = average_error_rate(&[200], PHRED33_OFFSET).unwrap_err();
        assert!(matches!(err, DedupError::InvalidInput(_)));
    }

    #[test]
    fn zero_offset_matches_reference_scenario() {
        let rate = average_error_rate(&[10, 30], 0).unwrap();
        assert!((rate - 0.0505).abs() < 1e-12);
    }

    #[test]
    fn default_and_zero_offset_agree_on_equivalent_bytes() {
        let default_rate = average_error_rate(b"+?", PHRED33_OFFSET).unwrap();
        let zero_offset_rate = average_error_rate(&[10, 30], 0).unwrap();
        assert!((default_rate - zero_offset_rate).abs() < 1e-12);
    }
}
