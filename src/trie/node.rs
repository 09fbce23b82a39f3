//! Arena node representation for the trie.
//!
//! Non-root nodes live in a `Vec<Option<Node>>` slab addressed by `u32`
//! indices, the way the teacher's `PatriciaTree` (`src/fs/patricia.rs`)
//! arena-allocates path nodes. Unlike that tree, nodes here are freed by
//! `pop_cluster`, so the slab also carries a free list of reusable slots.

/// Index into the node slab. `u32` keeps nodes compact; trie depth for
/// short reads never approaches the index space.
pub(super) type NodeIdx = u32;

/// A leaf: the tail of an ingested string past the point it first became
/// unique, plus how many ingestions terminated here.
#[derive(Debug, Clone)]
pub(super) struct Leaf {
    pub(super) suffix: Vec<u8>,
    pub(super) count: u64,
}

/// A branch: child references indexed by alphabet index, a running sum of
/// all counts beneath it, and a terminal-at-branch occurrence count for
/// strings that end exactly at this node.
#[derive(Debug, Clone)]
pub(super) struct BranchData {
    pub(super) children: Vec<Option<NodeIdx>>,
    pub(super) terminal: u64,
    pub(super) count: u64,
}

impl BranchData {
    pub(super) fn new() -> Self {
        Self {
            children: Vec::new(),
            terminal: 0,
            count: 0,
        }
    }

    pub(super) fn occupied_children(&self) -> usize {
        self.children.iter().filter(|c| c.is_some()).count()
    }
}

#[derive(Debug, Clone)]
pub(super) enum Node {
    Leaf(Leaf),
    Branch(BranchData),
}
