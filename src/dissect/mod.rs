//! Cluster dissection policies.
//!
//! Each policy takes a cluster of `(count, string)` pairs produced by
//! [`crate::trie::Trie::pop_cluster`] and picks which strings survive as
//! representatives. None of the policies mutate the caller's input list
//! observably: each works off its own copy.

use crate::distance::hamming_within;

/// A cluster member: how many ingestions collapsed onto this exact string,
/// and the string itself.
pub type ClusterItem = (u64, Vec<u8>);

/// Return exactly one representative: the member with the greatest count,
/// ties broken by the lexicographically greatest string.
pub fn highest_count(cluster: &[ClusterItem]) -> Vec<Vec<u8>> {
    let best = cluster
        .iter()
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
        .map(|(_, s)| s.clone());
    best.into_iter().collect()
}

/// Repeatedly pick the remaining item with the greatest count (ties:
/// lexicographic max), emit it, then remove every remaining item within
/// Hamming distance `d` of it. Continue until the pool is empty.
pub fn adjacency(cluster: &[ClusterItem], d: u32) -> Vec<Vec<u8>> {
    let mut pool: Vec<ClusterItem> = cluster.to_vec();
    let mut representatives = Vec::new();

    while !pool.is_empty() {
        let best_idx = pool
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
            .map(|(i, _)| i)
            .expect("pool is non-empty");
        let (_, representative) = pool.swap_remove(best_idx);

        pool.retain(|(_, s)| !hamming_within(s, &representative, d));
        representatives.push(representative);
    }

    representatives
}

/// Models the PCR-error-generation process: a chain of templates absorbs
/// lower-count neighbors whose count is consistent with having arisen as
/// an error copy of some template already in the chain.
pub fn directional(cluster: &[ClusterItem], d: u32) -> Vec<Vec<u8>> {
    let mut pool: Vec<ClusterItem> = cluster.to_vec();
    let mut representatives = Vec::new();

    while !pool.is_empty() {
        let origin_idx = pool
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
            .map(|(i, _)| i)
            .expect("pool is non-empty");
        let origin = pool.swap_remove(origin_idx);
        representatives.push(origin.1.clone());

        let mut chain = vec![origin];
        loop {
            let mut absorbed_any = false;
            let mut remaining = Vec::with_capacity(pool.len());

            for item @ (c, s) in pool.drain(..) {
                let absorbed = chain
                    .iter()
                    .any(|(ct, t)| hamming_within(&s, t, d) && 2 * c as i64 - 1 <= *ct as i64);
                if absorbed {
                    chain.push(item);
                    absorbed_any = true;
                } else {
                    remaining.push((c, s));
                }
            }

            pool = remaining;
            if !absorbed_any {
                break;
            }
        }
    }

    representatives
}
