//! In-memory autocomplete index.
//!
//! Terms and their scores live in a radix trie whose nodes cache the best
//! score anywhere below them. Top-K prefix queries use that cache to skip
//! whole subtrees that cannot beat the results already found.
//!
//! ```
//! use prune_core::PruningTrie;
//!
//! let mut trie = PruningTrie::new();
//! trie.insert("flower", 40.0).unwrap();
//! trie.insert("flowchart", 17.0).unwrap();
//! trie.insert("flower", 5.0).unwrap();
//!
//! let top = trie.top_k("flo", 1);
//! assert_eq!(top[0].term, "flower");
//! assert_eq!(top[0].score, 45.0);
//! ```

pub mod arena;
pub mod input;
pub mod trie;

pub use input::{CsvProvider, InputProvider, JsonProvider, LoadError};
pub use prune_types::{Entry, TermError, TrieConfig, MAX_TERM_LENGTH};
pub use trie::{Exhaustive, PruningPolicy, PruningTrie, ScorePruning, TopK, TrieMetrics, TrieStats};
