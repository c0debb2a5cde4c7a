//! Statistics and TrieStats.

use crate::trie::node::{Node, NodeId, ROOT};
use crate::trie::types::PruningTrie;

/// A snapshot of trie statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieStats {
    /// Number of distinct terms.
    pub num_terms: usize,
    /// Number of nodes, including the root and branch points.
    pub num_nodes: usize,
    /// Number of edges.
    pub num_edges: usize,
    /// Bytes of label text held by the label arena.
    pub label_bytes: usize,
    /// Longest root-to-leaf path, in edges.
    pub max_depth: usize,
}

impl PruningTrie {
    /// Returns trie statistics.
    pub fn stats(&self) -> TrieStats {
        TrieStats {
            num_terms: self.term_count,
            num_nodes: self.nodes.len(),
            num_edges: self.nodes.iter().map(Node::num_children).sum(),
            label_bytes: self.labels.len(),
            max_depth: self.max_depth(),
        }
    }

    fn max_depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(NodeId, usize)> = vec![(ROOT, 0)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(self.nodes[id].edges.iter().map(|e| (e.node, depth + 1)));
        }
        deepest
    }
}

impl TrieStats {
    /// Returns approximate memory usage in bytes.
    pub fn memory_usage_bytes(&self) -> usize {
        self.num_nodes * std::mem::size_of::<Node>() + self.label_bytes
    }
}

impl core::fmt::Display for TrieStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} terms, {} nodes, {} edges, {} label bytes, depth {}",
            self.num_terms, self.num_nodes, self.num_edges, self.label_bytes, self.max_depth
        )
    }
}
