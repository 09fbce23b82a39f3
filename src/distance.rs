//! Bounded distance predicates over short byte strings.
//!
//! Both kernels answer a yes/no question ("is the distance at most k?")
//! rather than computing the exact distance, which lets them bail out as
//! soon as the budget is exhausted instead of finishing the full
//! computation.

/// True iff `a` and `b` have equal length and differ in at most `k`
/// positions.
///
/// Returns `false` immediately for unequal-length inputs regardless of `k`.
pub fn hamming_within(a: &[u8], b: &[u8], k: u32) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut mismatches = 0u32;
    for (x, y) in a.iter().zip(b.iter()) {
        if x != y {
            mismatches += 1;
            if mismatches > k {
                return false;
            }
        }
    }
    true
}

/// True iff the Levenshtein edit distance between `a` and `b` is at most
/// `k`, under unit cost for insertion, deletion, and substitution.
///
/// Uses a banded dynamic program of width `2k + 1`: cells outside the band
/// are treated as infinity, so the work is `O((2k + 1) * max(len))` rather
/// than the full `O(len_a * len_b)` table. Two rolling rows are used in
/// place of the full matrix.
pub fn edit_within(a: &[u8], b: &[u8], k: u32) -> bool {
    let len_diff = a.len().abs_diff(b.len());
    if len_diff as u32 > k {
        return false;
    }

    let k = k as usize;
    let (a, b) = (a, b);
    let n = a.len();
    let m = b.len();

    // `prev[j]` / `cur[j]` hold the edit distance between `a[..i]` and
    // `b[..j]`, but only for `j` within the band around `i`.
    const INF: u32 = u32::MAX / 2;
    let width = 2 * k + 1;
    let mut prev = vec![INF; width];
    let mut cur = vec![INF; width];

    // Band for row 0 covers j in [0, k].
    for (j, slot) in prev.iter_mut().enumerate().take(k + 1) {
        *slot = j as u32;
    }

    for i in 1..=n {
        cur.iter_mut().for_each(|v| *v = INF);

        // j ranges over the band [i - k, i + k] intersected with [0, m].
        let lo = i.saturating_sub(k);
        let hi = (i + k).min(m);
        let mut row_min = INF;

        for j in lo..=hi {
            let sub_cost = if a[i - 1] == b[j.saturating_sub(1)] { 0 } else { 1 };

            let from_diag = if j == 0 {
                INF
            } else if let Some(v) = band_get(&prev, i - 1, j - 1, k) {
                v.saturating_add(if j >= 1 { sub_cost } else { 1 })
            } else {
                INF
            };
            let from_up = band_get(&prev, i - 1, j, k)
                .map(|v| v.saturating_add(1))
                .unwrap_or(INF);
            let from_left = if j == 0 {
                i as u32
            } else {
                band_get(&cur, i, j - 1, k)
                    .map(|v| v.saturating_add(1))
                    .unwrap_or(INF)
            };

            let value = from_diag.min(from_up).min(from_left);
            band_set(&mut cur, i, j, k, value);
            row_min = row_min.min(value);
        }

        if row_min > k as u32 {
            return false;
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    band_get(&prev, n, m, k)
        .map(|v| v <= k as u32)
        .unwrap_or(false)
}

/// Index into a banded row: column `j` for row `i`, band half-width `k`.
/// The band for row `i` covers columns `[i - k, i + k]`; `j` outside that
/// range has no slot.
fn band_get(row: &[u32], i: usize, j: usize, k: usize) -> Option<u32> {
    let lo = i.saturating_sub(k);
    if j < lo || j > i + k {
        return None;
    }
    row.get(j - lo).copied()
}

fn band_set(row: &mut [u32], i: usize, j: usize, k: usize, value: u32) {
    let lo = i.saturating_sub(k);
    if let Some(slot) = row.get_mut(j - lo) {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hamming_exact_match() {
        assert!(hamming_within(b"AAAA", b"AAAA", 0));
    }

    #[test]
    fn hamming_rejects_unequal_length_regardless_of_k() {
        assert!(!hamming_within(b"AAAA", b"AAA", 3));
    }

    #[test]
    fn hamming_counts_mismatches() {
        assert!(hamming_within(b"AAAA", b"AAAC", 1));
        assert!(!hamming_within(b"AAAA", b"AAAC", 0));
        assert!(hamming_within(b"AACA", b"AAAC", 2));
        assert!(!hamming_within(b"AACC", b"CCAA", 3));
    }

    #[test]
    fn edit_exact_and_insertions() {
        assert!(edit_within(b"AAAA", b"AAAA", 0));
        assert!(edit_within(b"AAAA", b"AAA", 1));
        assert!(edit_within(b"AAAA", b"A", 3));
    }

    #[test]
    fn edit_respects_budget() {
        assert!(!edit_within(b"AAA", b"C", 2));
        assert!(edit_within(b"AAA", b"C", 3));
        assert!(edit_within(b"AAAA", b"AAAC", 1));
        assert!(!edit_within(b"AAAA", b"AAAC", 0));
        assert!(edit_within(b"AACA", b"AAAC", 2));
        assert!(!edit_within(b"AACC", b"CCAA", 3));
    }

    #[test]
    fn edit_matches_gattaca_scenario() {
        assert!(edit_within(b"GATTACA", b"GATTA", 2));
    }

    /// Full, unbanded DP used as an oracle to check `edit_within` against.
    fn naive_edit_distance(a: &[u8], b: &[u8]) -> u32 {
        let (n, m) = (a.len(), b.len());
        let mut row: Vec<u32> = (0..=m as u32).collect();
        for i in 1..=n {
            let mut prev_diag = row[0];
            row[0] = i as u32;
            for j in 1..=m {
                let above = row[j];
                let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
                let value = (prev_diag + cost).min(above + 1).min(row[j - 1] + 1);
                prev_diag = above;
                row[j] = value;
            }
        }
        row[m]
    }

    proptest::proptest! {
        #[test]
        fn hamming_within_zero_iff_equal(a in "[ACGTN]{0,12}", b in "[ACGTN]{0,12}") {
            let (a, b) = (a.as_bytes(), b.as_bytes());
            proptest::prop_assert_eq!(hamming_within(a, b, 0), a == b);
        }

        #[test]
        fn hamming_within_agrees_with_k_bound(a in "[ACGTN]{1,12}", k in 0u32..6) {
            let bytes = a.as_bytes();
            proptest::prop_assert!(hamming_within(bytes, bytes, k));
        }

        #[test]
        fn edit_within_matches_naive_oracle(a in "[ACGT]{0,10}", b in "[ACGT]{0,10}", k in 0u32..5) {
            let (a, b) = (a.as_bytes(), b.as_bytes());
            let expected = naive_edit_distance(a, b) <= k;
            proptest::prop_assert_eq!(edit_within(a, b, k), expected);
        }

        #[test]
        fn edit_within_is_symmetric(a in "[ACGT]{0,10}", b in "[ACGT]{0,10}", k in 0u32..5) {
            let (a, b) = (a.as_bytes(), b.as_bytes());
            proptest::prop_assert_eq!(edit_within(a, b, k), edit_within(b, a, k));
        }
    }
}
