//! Score-pruned top-K prefix search.

use crate::trie::node::{NodeId, ROOT};
use crate::trie::policy::{PruningPolicy, ScorePruning};
use crate::trie::types::{PruningTrie, INLINE_PATH_DEPTH};
use prune_types::Entry;

use core::sync::atomic::Ordering;
use smallvec::SmallVec;
use tracing::trace;

/// Bounded result buffer, sorted by descending score.
///
/// Entries with equal scores keep the order in which they were offered.
#[derive(Debug, Clone)]
pub struct TopK {
    limit: usize,
    entries: Vec<Entry>,
}

impl TopK {
    /// Creates an empty buffer holding at most `limit` entries.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            entries: Vec::with_capacity(limit.min(64)),
        }
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.limit
    }

    /// Score of the worst kept entry, once the buffer is full.
    #[inline(always)]
    pub fn cutoff(&self) -> Option<f64> {
        if self.is_full() {
            self.entries.last().map(|e| e.score)
        } else {
            None
        }
    }

    /// Offers a candidate. It lands after every kept entry with an equal or
    /// higher score; the lowest entry falls off when the buffer overflows.
    pub fn offer(&mut self, term: &str, score: f64) {
        let pos = self.entries.partition_point(|e| e.score >= score);
        if pos >= self.limit {
            return;
        }
        self.entries.insert(pos, Entry::new(term, score));
        self.entries.truncate(self.limit);
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[Entry] {
        &self.entries
    }

    #[inline(always)]
    pub fn into_vec(self) -> Vec<Entry> {
        self.entries
    }
}

/// One node whose edges are being scanned.
#[derive(Clone, Copy)]
struct Frame<'q> {
    node: NodeId,
    /// Next edge to look at
    next: usize,
    /// Part of the query prefix still to be matched; empty once the walk
    /// is inside the prefix's subtree.
    restrict: &'q str,
    /// Length of the term spelled by the path to `node`
    term_len: usize,
}

impl PruningTrie {
    /// Returns up to `k` terms starting with `prefix`, highest score first.
    ///
    /// Equal scores keep the order in which the walk reached them. An
    /// empty prefix matches every term; `k == 0` returns nothing without
    /// touching the trie.
    #[inline(never)]
    pub fn top_k(&self, prefix: &str, k: usize) -> Vec<Entry> {
        self.top_k_with(prefix, k, &ScorePruning)
    }

    /// [`top_k`](Self::top_k) with a custom pruning policy.
    ///
    /// The walk has two modes. While *restricted* it follows the single
    /// edge that agrees with the rest of the prefix. Once an edge absorbs
    /// what is left of the prefix it switches to *unrestricted* and
    /// collects candidates from the whole subtree, visiting children in
    /// descending cache order and asking `policy` what can be skipped.
    pub fn top_k_with<P>(&self, prefix: &str, k: usize, policy: &P) -> Vec<Entry>
    where
        P: PruningPolicy + ?Sized,
    {
        self.query_count.fetch_add(1, Ordering::Relaxed);

        if k == 0 {
            return Vec::new();
        }

        let mut results = TopK::new(k);
        if policy.skip_subtree(&self.nodes[ROOT], &results) {
            return Vec::new();
        }

        let mut term = String::with_capacity(prefix.len() + 32);
        let mut stack: SmallVec<[Frame<'_>; INLINE_PATH_DEPTH]> = SmallVec::new();
        stack.push(Frame {
            node: ROOT,
            next: 0,
            restrict: prefix,
            term_len: 0,
        });

        loop {
            let Some(top) = stack.last_mut() else {
                break;
            };
            let frame = *top;
            top.next += 1;

            let node = &self.nodes[frame.node];
            let restricted = !frame.restrict.is_empty();
            let slot = if restricted {
                // At most one sibling can start with the restriction's first char
                match (frame.next, frame.restrict.chars().next()) {
                    (0, Some(lead)) => node.find_edge(lead),
                    _ => None,
                }
            } else {
                Some(frame.next)
            };

            let Some(&edge) = slot.and_then(|i| node.edges.get(i)) else {
                stack.pop();
                continue;
            };

            let child = &self.nodes[edge.node];

            if policy.skip_node_and_subtree(child, &results) {
                // Siblings are ordered by cache, not by own score, so a
                // later sibling may still qualify when unrestricted.
                if restricted {
                    stack.pop();
                }
                continue;
            }

            let label = self.labels.get(edge.label);
            term.truncate(frame.term_len);

            if !restricted || label.starts_with(frame.restrict) {
                term.push_str(label);
                if child.is_terminal() {
                    results.offer(&term, child.score());
                }
                if restricted {
                    stack.pop();
                }
                if child.has_children() && !policy.skip_subtree(child, &results) {
                    stack.push(Frame {
                        node: edge.node,
                        next: 0,
                        restrict: "",
                        term_len: term.len(),
                    });
                }
            } else if let Some(rest) = frame.restrict.strip_prefix(label) {
                stack.pop();
                if child.has_children() && !policy.skip_subtree(child, &results) {
                    term.push_str(label);
                    stack.push(Frame {
                        node: edge.node,
                        next: 0,
                        restrict: rest,
                        term_len: term.len(),
                    });
                }
            }
        }

        trace!(prefix, k, found = results.len(), "top-k query");
        results.into_vec()
    }
}
