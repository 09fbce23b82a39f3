//! Adaptive symbol alphabet for the trie.
//!
//! Maps raw bytes to dense indices so branch nodes can use small
//! array-indexed child slots instead of a sparse map. The alphabet can be
//! fixed at construction (e.g. `ACGTN`) or grow lazily as unseen bytes are
//! inserted.

use crate::error::{DedupError, Result};

/// Sentinel stored in the lookup table for a byte that has not been seen.
const ABSENT: u16 = u16::MAX;

/// Maximum number of distinct symbols a single alphabet can hold.
pub const MAX_ALPHABET_SIZE: usize = 256;

/// Ordered, append-only set of byte symbols with O(1) byte-to-index lookup.
#[derive(Debug, Clone)]
pub struct Alphabet {
    /// Symbols in the order they were first observed (or supplied).
    symbols: Vec<u8>,
    /// 256-entry lookup table: byte -> index, or `ABSENT`.
    index_of: Box<[u16; 256]>,
}

impl Alphabet {
    /// Create an empty alphabet that grows lazily as symbols are seen.
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            index_of: Box::new([ABSENT; 256]),
        }
    }

    /// Create an alphabet fixed to the given bytes, in order.
    ///
    /// Fails with [`DedupError::InvalidInput`] if `symbols` contains a
    /// duplicate byte or exceeds [`MAX_ALPHABET_SIZE`].
    pub fn with_symbols(symbols: &[u8]) -> Result<Self> {
        if symbols.len() > MAX_ALPHABET_SIZE {
            return Err(DedupError::InvalidInput(format!(
                "alphabet of {} symbols exceeds the {}-byte ceiling",
                symbols.len(),
                MAX_ALPHABET_SIZE
            )));
        }
        let mut alphabet = Self::new();
        for &byte in symbols {
            if alphabet.index_of[byte as usize] != ABSENT {
                return Err(DedupError::InvalidInput(format!(
                    "duplicate symbol {:?} in alphabet",
                    byte as char
                )));
            }
            let idx = alphabet.symbols.len() as u16;
            alphabet.symbols.push(byte);
            alphabet.index_of[byte as usize] = idx;
        }
        Ok(alphabet)
    }

    /// Number of distinct symbols currently known.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the alphabet has observed no symbols yet.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbols in index order.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Byte for a given index, if it has been assigned.
    pub fn symbol(&self, index: usize) -> Option<u8> {
        self.symbols.get(index).copied()
    }

    /// Look up the index for `byte` without mutating the alphabet.
    pub fn index(&self, byte: u8) -> Option<usize> {
        let idx = self.index_of[byte as usize];
        if idx == ABSENT {
            None
        } else {
            Some(idx as usize)
        }
    }

    /// Look up the index for `byte`, appending it to the alphabet if unseen.
    ///
    /// Fails with [`DedupError::InvalidInput`] if the alphabet is already at
    /// the 256-symbol ceiling.
    pub fn index_or_insert(&mut self, byte: u8) -> Result<usize> {
        if let Some(idx) = self.index(byte) {
            return Ok(idx);
        }
        if self.symbols.len() >= MAX_ALPHABET_SIZE {
            return Err(DedupError::InvalidInput(format!(
                "cannot grow alphabet past the {}-byte ceiling with symbol {:?}",
                MAX_ALPHABET_SIZE, byte as char
            )));
        }
        let idx = self.symbols.len() as u16;
        self.symbols.push(byte);
        self.index_of[byte as usize] = idx;
        Ok(idx as usize)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_alphabet_assigns_stable_indices() {
        let alphabet = Alphabet::with_symbols(b"ACGTN").unwrap();
        assert_eq!(alphabet.len(), 5);
        assert_eq!(alphabet.index(b'A'), Some(0));
        assert_eq!(alphabet.index(b'N'), Some(4));
        assert_eq!(alphabet.index(b'X'), None);
    }

    #[test]
    fn duplicate_symbol_rejected() {
        let err = Alphabet::with_symbols(b"ACGTA").unwrap_err();
        assert!(matches!(err, DedupError::InvalidInput(_)));
    }

    #[test]
    fn lazy_growth_assigns_in_first_seen_order() {
        let mut alphabet = Alphabet::new();
        assert_eq!(alphabet.index_or_insert(b'G').unwrap(), 0);
        assert_eq!(alphabet.index_or_insert(b'A').unwrap(), 1);
        assert_eq!(alphabet.index_or_insert(b'G').unwrap(), 0);
        assert_eq!(alphabet.symbols(), b"GA");
    }

    #[test]
    fn growth_is_monotonic_prefix_preserving() {
        let mut alphabet = Alphabet::new();
        alphabet.index_or_insert(b'A').unwrap();
        alphabet.index_or_insert(b'C').unwrap();
        let snapshot = alphabet.symbols().to_vec();
        alphabet.index_or_insert(b'G').unwrap();
        assert!(alphabet.symbols().starts_with(&snapshot));
    }
}
