//! Core types shared by the pruning radix trie crates.
//!
//! This crate provides the types that cross crate boundaries: the result
//! record returned by queries, the insertion error and the trie
//! configuration. Keeping them here means:
//!
//! - **No dependencies**: loaders and frontends can share the types without
//!   pulling in the trie itself
//! - **Clean boundaries**: no circular dependencies between crates

#![warn(missing_docs)]

use core::fmt;

/// Maximum term length in bytes.
///
/// Edge labels are stored as `(u32 offset, u16 len)` spans, so a single
/// label (and therefore a single term) cannot exceed `u16::MAX` bytes.
pub const MAX_TERM_LENGTH: usize = u16::MAX as usize;

/// A term together with its accumulated score.
///
/// Returned by top-K queries in descending score order and produced by
/// input providers as the records to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// The complete term.
    pub term: String,
    /// Score of the term (higher is better).
    pub score: f64,
}

impl Entry {
    /// Creates a new entry.
    #[inline]
    pub fn new(term: impl Into<String>, score: f64) -> Self {
        Self {
            term: term.into(),
            score,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3})", self.term, self.score)
    }
}

impl From<(String, f64)> for Entry {
    #[inline]
    fn from((term, score): (String, f64)) -> Self {
        Self { term, score }
    }
}

impl From<(&str, f64)> for Entry {
    #[inline]
    fn from((term, score): (&str, f64)) -> Self {
        Self::new(term, score)
    }
}

/// Errors that can occur when inserting a term into the trie.
///
/// All checks happen before the trie is touched, so a rejected insert
/// leaves the trie unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TermError {
    /// The term is the empty string. The root represents the empty string
    /// and never carries a score.
    Empty,
    /// Term exceeds the maximum allowed length.
    TooLarge {
        /// The actual size of the term in bytes.
        size: usize,
        /// The maximum allowed size in bytes.
        max_size: usize,
    },
    /// The score is NaN or infinite.
    NonFiniteScore {
        /// The rejected score.
        score: f64,
    },
    /// The label buffer cannot address any more bytes.
    CapacityExceeded,
}

impl fmt::Display for TermError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermError::Empty => write!(f, "term is empty"),
            TermError::TooLarge { size, max_size } => {
                write!(f, "term too large: {} bytes (max: {} bytes)", size, max_size)
            }
            TermError::NonFiniteScore { score } => {
                write!(f, "score must be finite, got {}", score)
            }
            TermError::CapacityExceeded => write!(f, "label storage capacity exceeded"),
        }
    }
}

impl core::error::Error for TermError {}

/// Trie sizing options.
///
/// Only affects pre-allocation; the arenas grow on demand either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieConfig {
    /// Initial capacity of the label buffer, in bytes.
    pub label_capacity: usize,
    /// Initial capacity of the node arena, in nodes.
    pub node_capacity: usize,
}

impl Default for TrieConfig {
    fn default() -> Self {
        Self {
            label_capacity: 64 * 1024,
            node_capacity: 1024,
        }
    }
}

impl TrieConfig {
    /// Sizing for a bulk load of roughly `terms` terms averaging
    /// `avg_term_len` bytes.
    ///
    /// A radix trie has at most `2 * terms` nodes (every insert adds a
    /// leaf and at most one branching node) and never stores more label
    /// bytes than the input contains.
    pub const fn for_terms(terms: usize, avg_term_len: usize) -> Self {
        Self {
            label_capacity: terms * avg_term_len,
            node_capacity: terms * 2 + 1,
        }
    }
}
