//! Non-mutating observability: node-population histograms and an
//! approximate resident memory size, grounded on the Python reference's
//! `trie_stats` report (`original_source/src/fastqdedup/__init__.py`).

use std::mem::size_of;

use super::node::{Node, NodeIdx};
use super::{BranchLoc, Trie};

impl Trie {
    /// Per-depth node population: `row[0]` is the number of branches at
    /// that depth carrying a terminal-at-branch occurrence; `row[j]` for
    /// `j >= 1` is the number of branches at that depth with exactly `j`
    /// occupied child slots.
    pub fn raw_stats(&self) -> Vec<Vec<u64>> {
        let mut layers = Vec::new();
        let mut frontier = vec![BranchLoc::Root];

        while !frontier.is_empty() {
            let mut row = vec![0u64; self.alphabet.len() + 1];
            let mut next = Vec::new();

            for loc in frontier {
                let (children, terminal) = self.branch_view(loc);
                if terminal > 0 {
                    row[0] += 1;
                }
                let occupied = children.iter().filter(|c| c.is_some()).count();
                if occupied > 0 {
                    if occupied >= row.len() {
                        row.resize(occupied + 1, 0);
                    }
                    row[occupied] += 1;
                }
                for child in children.iter().flatten() {
                    if let Node::Branch(_) = self.node(*child) {
                        next.push(BranchLoc::Node(*child));
                    }
                }
            }

            layers.push(row);
            frontier = next;
        }

        layers
    }

    /// Approximate resident byte count of everything the trie owns: node
    /// slab, child arrays, and leaf suffix buffers.
    pub fn memory_size(&self) -> usize {
        let mut total = size_of::<Trie>();
        total += self.root.children.capacity() * size_of::<Option<NodeIdx>>();
        total += self.nodes.capacity() * size_of::<Option<Node>>();
        total += self.free.capacity() * size_of::<NodeIdx>();

        for slot in &self.nodes {
            if let Some(node) = slot {
                match node {
                    Node::Leaf(leaf) => total += leaf.suffix.capacity(),
                    Node::Branch(branch) => {
                        total += branch.children.capacity() * size_of::<Option<NodeIdx>>()
                    }
                }
            }
        }

        total += self.alphabet.symbols().len();
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_stats_counts_terminal_at_root_for_empty_string_insert() {
        let mut trie = Trie::new();
        trie.insert(b"").unwrap();
        let stats = trie.raw_stats();
        assert_eq!(stats[0][0], 1);
    }

    #[test]
    fn raw_stats_has_one_row_per_depth() {
        let mut trie = Trie::new();
        trie.insert(b"AC").unwrap();
        trie.insert(b"AG").unwrap();
        let stats = trie.raw_stats();
        // depth 0: root, 1 occupied slot (symbol 'A')
        assert_eq!(stats[0][1], 1);
        // depth 1: the 'A' branch, 2 occupied slots ('C' and 'G')
        assert_eq!(stats[1][2], 1);
    }

    #[test]
    fn memory_size_grows_with_content() {
        let mut trie = Trie::new();
        let empty_size = trie.memory_size();
        trie.insert(b"GATTACAGATTACA").unwrap();
        assert!(trie.memory_size() > empty_size);
    }
}
