//! Pruning policies for top-K search.
//!
//! The search asks the policy two questions while it walks the trie. The
//! default [`ScorePruning`] answers them from the cached subtree maxima;
//! [`Exhaustive`] never prunes and exists to check the pruned search
//! against a full walk.

use crate::trie::node::Node;
use crate::trie::search::TopK;

/// Decides which parts of the trie a top-K search may skip.
pub trait PruningPolicy {
    /// True when no node strictly below `node` can enter `results`.
    fn skip_subtree(&self, node: &Node, results: &TopK) -> bool;

    /// True when neither `node` itself nor anything below it can enter
    /// `results`.
    fn skip_node_and_subtree(&self, node: &Node, results: &TopK) -> bool {
        self.skip_subtree(node, results)
            && results
                .cutoff()
                .is_some_and(|worst| node.score() <= worst)
    }
}

/// Skips everything whose cached maximum cannot beat the worst kept result.
///
/// Only applies once the buffer is full. A candidate that merely ties the
/// worst kept score would be appended after it and dropped, so ties are
/// pruned as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScorePruning;

impl PruningPolicy for ScorePruning {
    #[inline(always)]
    fn skip_subtree(&self, node: &Node, results: &TopK) -> bool {
        results
            .cutoff()
            .is_some_and(|worst| node.max_descendant_score() <= worst)
    }
}

/// Visits every matching node.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exhaustive;

impl PruningPolicy for Exhaustive {
    #[inline(always)]
    fn skip_subtree(&self, _node: &Node, _results: &TopK) -> bool {
        false
    }
}
