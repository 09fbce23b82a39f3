//! Destructive cluster extraction (`pop_cluster`).
//!
//! A naive Hamming BFS over stored strings is quadratic; this exploits
//! trie locality instead. Two strings within a small Hamming distance
//! share a long common prefix along one walk with at most `max_distance`
//! off-path excursions, so a bounded trie walk from the root finds all of
//! a string's near-duplicates in roughly linear time.

use std::collections::{HashSet, VecDeque};

use crate::distance::{edit_within, hamming_within};
use crate::error::{DedupError, Result};

use super::node::Node;
use super::{BranchLoc, NodeIdx, Trie};

/// What a matched leaf/terminal removal needs in order to be applied:
/// clear the owning slot, then walk back to the root decrementing counts
/// and pruning branches that drop to zero.
#[derive(Debug, Clone)]
struct RemovalPlan {
    /// Edges from the root down to (but not including) `owner`.
    edges: Vec<(BranchLoc, usize)>,
    owner: BranchLoc,
    removal: Removal,
}

#[derive(Debug, Clone, Copy)]
enum Removal {
    Terminal,
    Leaf { slot: usize, idx: NodeIdx },
}

/// Identity of a match, used only to deduplicate the edit-distance DFS
/// (which can reach the same node via more than one alignment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MatchKey {
    Terminal(BranchLoc),
    Leaf(NodeIdx),
}

impl Trie {
    /// Destructively extract one connected component of near-duplicate
    /// sequences, under the given distance bound and metric.
    ///
    /// Fails with [`DedupError::Empty`] if the trie currently holds no
    /// sequences.
    pub fn pop_cluster(&mut self, max_distance: u32, use_edit: bool) -> Result<Vec<(u64, Vec<u8>)>> {
        if self.root.count == 0 {
            return Err(DedupError::Empty(
                "pop_cluster called on an empty trie".to_string(),
            ));
        }

        let mut cluster = Vec::new();
        let mut queue = VecDeque::new();

        let (seed_count, seed_string) = self.extract_seed();
        cluster.push((seed_count, seed_string.clone()));
        queue.push_back(seed_string);

        while let Some(s) = queue.pop_front() {
            let matches = self.find_all_within(&s, max_distance, use_edit);
            for (plan, string, expected_count) in matches {
                let removed = self.apply_removal(plan);
                debug_assert_eq!(removed, expected_count);
                cluster.push((removed, string.clone()));
                queue.push_back(string);
            }
        }

        Ok(cluster)
    }

    /// Find and detach the first leaf or terminal-at-branch occupant
    /// reachable by always descending into the lowest-indexed occupied
    /// slot. Used to seed a new cluster.
    fn extract_seed(&mut self) -> (u64, Vec<u8>) {
        let mut loc = BranchLoc::Root;
        let mut edges = Vec::new();
        let mut path_bytes = Vec::new();

        loop {
            let (children, terminal) = self.branch_view(loc);
            if terminal > 0 {
                let plan = RemovalPlan {
                    edges,
                    owner: loc,
                    removal: Removal::Terminal,
                };
                let count = self.apply_removal(plan);
                return (count, path_bytes);
            }

            let children_len = children.len();
            let mut found = None;
            for k in 0..children_len {
                if let Some(idx) = children[k] {
                    found = Some((k, idx));
                    break;
                }
            }
            let (k, idx) = found.expect("non-empty branch has an occupied slot or terminal");
            let sym = self
                .alphabet()
                .symbol(k)
                .expect("occupied slot index is within the alphabet");

            match self.node(idx) {
                Node::Leaf(leaf) => {
                    path_bytes.push(sym);
                    path_bytes.extend_from_slice(&leaf.suffix);
                    let plan = RemovalPlan {
                        edges,
                        owner: loc,
                        removal: Removal::Leaf { slot: k, idx },
                    };
                    let count = self.apply_removal(plan);
                    return (count, path_bytes);
                }
                Node::Branch(_) => {
                    edges.push((loc, k));
                    path_bytes.push(sym);
                    loc = BranchLoc::Node(idx);
                }
            }
        }
    }

    /// Every currently-stored string within `max_distance` of `seq`, each
    /// paired with the removal plan needed to detach it.
    fn find_all_within(
        &self,
        seq: &[u8],
        max_distance: u32,
        use_edit: bool,
    ) -> Vec<(RemovalPlan, Vec<u8>, u64)> {
        let mut out = Vec::new();
        let mut edges = Vec::new();
        let mut path_bytes = Vec::new();
        if use_edit {
            self.collect_edit(
                BranchLoc::Root,
                &mut edges,
                &mut path_bytes,
                seq,
                0,
                max_distance,
                &mut out,
            );
        } else {
            self.collect_hamming(
                BranchLoc::Root,
                &mut edges,
                &mut path_bytes,
                seq,
                0,
                max_distance,
                &mut out,
            );
        }

        let mut seen = HashSet::new();
        out.retain(|(plan, _, _)| {
            let key = match plan.removal {
                Removal::Terminal => MatchKey::Terminal(plan.owner),
                Removal::Leaf { idx, .. } => MatchKey::Leaf(idx),
            };
            seen.insert(key)
        });
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn collect_hamming(
        &self,
        loc: BranchLoc,
        edges: &mut Vec<(BranchLoc, usize)>,
        path_bytes: &mut Vec<u8>,
        seq: &[u8],
        i: usize,
        budget: u32,
        out: &mut Vec<(RemovalPlan, Vec<u8>, u64)>,
    ) {
        let (children, terminal) = self.branch_view(loc);
        if i == seq.len() {
            if terminal > 0 {
                out.push((
                    RemovalPlan {
                        edges: edges.clone(),
                        owner: loc,
                        removal: Removal::Terminal,
                    },
                    path_bytes.clone(),
                    terminal,
                ));
            }
            return;
        }

        let k_match = self.alphabet().index(seq[i]);
        for k in 0..children.len() {
            let Some(child_idx) = children[k] else {
                continue;
            };
            let cost = if Some(k) == k_match { 0 } else { 1 };
            if cost > budget {
                continue;
            }
            let sym = self.alphabet().symbol(k).unwrap();
            match self.node(child_idx) {
                Node::Leaf(leaf) => {
                    if hamming_within(&seq[i + 1..], &leaf.suffix, budget - cost) {
                        let mut full = path_bytes.clone();
                        full.push(sym);
                        full.extend_from_slice(&leaf.suffix);
                        out.push((
                            RemovalPlan {
                                edges: edges.clone(),
                                owner: loc,
                                removal: Removal::Leaf {
                                    slot: k,
                                    idx: child_idx,
                                },
                            },
                            full,
                            leaf.count,
                        ));
                    }
                }
                Node::Branch(_) => {
                    edges.push((loc, k));
                    path_bytes.push(sym);
                    self.collect_hamming(
                        BranchLoc::Node(child_idx),
                        edges,
                        path_bytes,
                        seq,
                        i + 1,
                        budget - cost,
                        out,
                    );
                    path_bytes.pop();
                    edges.pop();
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn collect_edit(
        &self,
        loc: BranchLoc,
        edges: &mut Vec<(BranchLoc, usize)>,
        path_bytes: &mut Vec<u8>,
        seq: &[u8],
        i: usize,
        budget: u32,
        out: &mut Vec<(RemovalPlan, Vec<u8>, u64)>,
    ) {
        let (children, terminal) = self.branch_view(loc);
        if terminal > 0 && edit_within(&seq[i..], b"", budget) {
            out.push((
                RemovalPlan {
                    edges: edges.clone(),
                    owner: loc,
                    removal: Removal::Terminal,
                },
                path_bytes.clone(),
                terminal,
            ));
        }

        for k in 0..children.len() {
            let Some(child_idx) = children[k] else {
                continue;
            };
            let sym = self.alphabet().symbol(k);
            match self.node(child_idx) {
                Node::Leaf(leaf) => {
                    let mut candidate = vec![sym.unwrap()];
                    candidate.extend_from_slice(&leaf.suffix);
                    if edit_within(&seq[i..], &candidate, budget) {
                        let mut full = path_bytes.clone();
                        full.extend_from_slice(&candidate);
                        out.push((
                            RemovalPlan {
                                edges: edges.clone(),
                                owner: loc,
                                removal: Removal::Leaf {
                                    slot: k,
                                    idx: child_idx,
                                },
                            },
                            full,
                            leaf.count,
                        ));
                    }
                }
                Node::Branch(_) => {
                    edges.push((loc, k));
                    path_bytes.push(sym.unwrap());
                    if i < seq.len() {
                        let cost = if sym == Some(seq[i]) { 0 } else { 1 };
                        if cost <= budget {
                            self.collect_edit(
                                BranchLoc::Node(child_idx),
                                edges,
                                path_bytes,
                                seq,
                                i + 1,
                                budget - cost,
                                out,
                            );
                        }
                    }
                    if budget >= 1 {
                        self.collect_edit(
                            BranchLoc::Node(child_idx),
                            edges,
                            path_bytes,
                            seq,
                            i,
                            budget - 1,
                            out,
                        );
                    }
                    path_bytes.pop();
                    edges.pop();
                }
            }
        }

        if i < seq.len() && budget >= 1 {
            self.collect_edit(loc, edges, path_bytes, seq, i + 1, budget - 1, out);
        }
    }

    /// Clear the removed item's slot, then decrement and prune every
    /// ancestor on the path back to the root. Returns the count that was
    /// removed.
    fn apply_removal(&mut self, plan: RemovalPlan) -> u64 {
        let removed_count = match plan.removal {
            Removal::Terminal => {
                let b = self.branch_mut(plan.owner);
                let c = b.terminal;
                b.terminal = 0;
                c
            }
            Removal::Leaf { slot, idx } => {
                let c = match self.node(idx) {
                    Node::Leaf(leaf) => leaf.count,
                    Node::Branch(_) => unreachable!(),
                };
                self.free_node(idx);
                self.branch_mut(plan.owner).children[slot] = None;
                c
            }
        };

        let mut loc = plan.owner;
        let mut edges = plan.edges;
        loop {
            let count_after = {
                let b = self.branch_mut(loc);
                b.count -= removed_count;
                b.count
            };
            let prune = count_after == 0 && !matches!(loc, BranchLoc::Root);
            if prune {
                if let BranchLoc::Node(idx) = loc {
                    self.free_node(idx);
                }
            }
            match edges.pop() {
                Some((parent_loc, slot)) => {
                    if prune {
                        self.branch_mut(parent_loc).children[slot] = None;
                    }
                    loc = parent_loc;
                }
                None => break,
            }
        }

        removed_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_sorted(trie: &mut Trie, max_distance: u32, use_edit: bool) -> Vec<(u64, Vec<u8>)> {
        let mut cluster = trie.pop_cluster(max_distance, use_edit).unwrap();
        cluster.sort();
        cluster
    }

    #[test]
    fn pop_cluster_on_empty_trie_fails() {
        let mut trie = Trie::new();
        let err = trie.pop_cluster(1, false).unwrap_err();
        assert!(matches!(err, DedupError::Empty(_)));
    }

    #[test]
    fn pop_cluster_extracts_single_sequence() {
        let mut trie = Trie::new();
        trie.insert(b"GATTACA").unwrap();
        let cluster = collect_sorted(&mut trie, 0, false);
        assert_eq!(cluster, vec![(1, b"GATTACA".to_vec())]);
        assert_eq!(trie.number_of_sequences(), 0);
    }

    #[test]
    fn pop_cluster_groups_hamming_neighbors() {
        let mut trie = Trie::new();
        trie.insert(b"AAAA").unwrap();
        trie.insert(b"AAAC").unwrap();
        trie.insert(b"CCCC").unwrap();
        let cluster = collect_sorted(&mut trie, 1, false);
        assert_eq!(
            cluster,
            vec![(1, b"AAAA".to_vec()), (1, b"AAAC".to_vec())]
        );
        assert_eq!(trie.number_of_sequences(), 1);

        let remainder = collect_sorted(&mut trie, 1, false);
        assert_eq!(remainder, vec![(1, b"CCCC".to_vec())]);
        assert_eq!(trie.number_of_sequences(), 0);
    }

    #[test]
    fn pop_cluster_preserves_counts_for_repeated_inserts() {
        let mut trie = Trie::new();
        trie.insert(b"GATTACA").unwrap();
        trie.insert(b"GATTACA").unwrap();
        trie.insert(b"GATTACA").unwrap();
        let cluster = collect_sorted(&mut trie, 0, false);
        assert_eq!(cluster, vec![(3, b"GATTACA".to_vec())]);
    }

    #[test]
    fn pop_cluster_groups_prefix_terminal_occurrence() {
        let mut trie = Trie::new();
        trie.insert(b"GATTACA").unwrap();
        trie.insert(b"GATTA").unwrap();
        let cluster = collect_sorted(&mut trie, 2, true);
        assert_eq!(
            cluster,
            vec![(1, b"GATTA".to_vec()), (1, b"GATTACA".to_vec())]
        );
        assert_eq!(trie.number_of_sequences(), 0);
    }

    #[test]
    fn repeated_pop_cluster_drains_trie_entirely() {
        let mut trie = Trie::new();
        let seqs: &[&[u8]] = &[b"AAAA", b"CCCC", b"GGGG", b"TTTT"];
        for s in seqs {
            trie.insert(s).unwrap();
        }
        let mut total = 0;
        while !trie.is_empty() {
            let cluster = trie.pop_cluster(0, false).unwrap();
            total += cluster.len();
        }
        assert_eq!(total, seqs.len());
        assert_eq!(trie.number_of_sequences(), 0);
    }
}
