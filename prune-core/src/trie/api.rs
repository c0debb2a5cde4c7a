//! Public API for adding and looking up terms.

use crate::trie::node::{NodeId, ROOT};
use crate::trie::types::PruningTrie;
use prune_types::{TermError, MAX_TERM_LENGTH};
use tracing::debug;

impl PruningTrie {
    /// Adds `score` to `term`, creating the term if it is new.
    ///
    /// A term whose accumulated score is not positive is kept in the trie
    /// as a branch point but is never returned by queries.
    ///
    /// # Errors
    ///
    /// Returns `TermError::Empty` for the empty term.
    /// Returns `TermError::TooLarge` if the term exceeds 64KB.
    /// Returns `TermError::NonFiniteScore` if the score is NaN or infinite.
    /// Returns `TermError::CapacityExceeded` if the label buffer is full.
    #[inline(never)]
    pub fn insert(&mut self, term: &str, score: f64) -> Result<(), TermError> {
        if term.is_empty() {
            return Err(TermError::Empty);
        }

        if term.len() > MAX_TERM_LENGTH {
            return Err(TermError::TooLarge {
                size: term.len(),
                max_size: MAX_TERM_LENGTH,
            });
        }

        if !score.is_finite() {
            return Err(TermError::NonFiniteScore { score });
        }

        self.insert_term(term, score)
    }

    /// Inserts multiple terms.
    ///
    /// Returns a tuple of (success_count, error_count) and the last error encountered.
    pub fn insert_batch<I, S>(&mut self, items: I) -> (usize, usize, Option<TermError>)
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut added = 0;
        let mut failed = 0;
        let mut last_error = None;

        for (term, score) in items {
            match self.insert(term.as_ref(), score) {
                Ok(()) => added += 1,
                Err(e) => {
                    failed += 1;
                    last_error = Some(e);
                }
            }
        }

        debug!(added, failed, terms = self.len(), "batch insert finished");
        (added, failed, last_error)
    }

    /// Returns the score of `term` if it is a stored term.
    pub fn get(&self, term: &str) -> Option<f64> {
        let (id, _) = self.locate(term)?;
        let node = &self.nodes[id];
        node.is_terminal().then(|| node.score())
    }

    /// Returns `true` if `term` is a stored term.
    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.get(term).is_some()
    }

    /// Finds the node spelled exactly by `term`, with its depth in edges
    /// below the root's children (children of the root are at depth 0).
    ///
    /// Branch points are found too, terminal or not.
    pub(crate) fn locate(&self, term: &str) -> Option<(NodeId, usize)> {
        let mut node = ROOT;
        let mut rest = term;
        let mut depth = 0;

        loop {
            let lead = rest.chars().next()?;
            let index = self.nodes[node].find_edge(lead)?;
            let edge = self.nodes[node].edges[index];
            rest = rest.strip_prefix(self.labels.get(edge.label))?;
            if rest.is_empty() {
                return Some((edge.node, depth));
            }
            node = edge.node;
            depth += 1;
        }
    }
}
