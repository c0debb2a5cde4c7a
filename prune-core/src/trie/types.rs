//! Trie container and metrics.

use crate::arena::LabelArena;
use crate::trie::node::Nodes;
use prune_types::TrieConfig;

use core::sync::atomic::{AtomicU64, Ordering};

/// Ancestor paths up to this depth stay on the stack.
pub const INLINE_PATH_DEPTH: usize = 32;

/// Score-pruned radix trie for top-K prefix completion.
pub struct PruningTrie {
    pub(crate) nodes: Nodes,
    pub(crate) labels: LabelArena,
    pub(crate) config: TrieConfig,
    /// Number of distinct terms ever created; never decremented
    pub(crate) term_count: usize,
    /// Total number of successful inserts
    pub(crate) inserts_applied: u64,
    /// Total number of queries executed. Atomic so queries can take `&self`.
    pub(crate) query_count: AtomicU64,
}

impl Default for PruningTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PruningTrie {
    /// Creates a new, empty trie.
    pub fn new() -> Self {
        Self::with_config(TrieConfig::default())
    }

    /// Creates a new trie with custom configuration.
    pub fn with_config(config: TrieConfig) -> Self {
        Self {
            nodes: Nodes::with_capacity(config.node_capacity),
            labels: LabelArena::with_capacity(config.label_capacity),
            config,
            term_count: 0,
            inserts_applied: 0,
            query_count: AtomicU64::new(0),
        }
    }

    /// Returns the number of distinct terms inserted so far.
    ///
    /// A term counts once, when it is first created. Later inserts of the
    /// same term do not change the count, even if they take its score to
    /// zero or below.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.term_count
    }

    /// Returns `true` if no term has been inserted.
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.term_count == 0
    }

    /// Returns the configuration the trie was created with.
    #[inline(always)]
    pub fn config(&self) -> TrieConfig {
        self.config
    }

    /// Removes all terms and resets the trie.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.labels.clear();
        self.term_count = 0;
        self.inserts_applied = 0;
        self.query_count.store(0, Ordering::Relaxed);
    }

    /// Returns basic metrics about the trie's operation.
    #[inline(always)]
    #[must_use]
    pub fn metrics(&self) -> TrieMetrics {
        TrieMetrics {
            inserts_applied: self.inserts_applied,
            queries_executed: self.query_count.load(Ordering::Relaxed),
            term_count: self.term_count as u64,
        }
    }
}

/// Basic operational metrics for the trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieMetrics {
    /// Total number of accepted inserts, including repeated terms.
    pub inserts_applied: u64,
    /// Total number of top-K queries executed.
    pub queries_executed: u64,
    /// Number of distinct terms, as returned by `len`.
    pub term_count: u64,
}
