//! Input providers.
//!
//! Providers turn files into `(term, score)` records for bulk loading.
//! Each provider knows one file format and how to derive a score from a
//! record. Records that are malformed (missing term, unparsable score,
//! empty or oversized term, non-finite score) are counted and skipped;
//! only an unreadable or structurally broken file is an error.
//!
//! Loaded records are ordered longest term first. Inserting long terms
//! first means later, shorter terms split existing edges instead of
//! walking past them, which keeps the bulk load fast.

pub mod csv;
pub mod json;

pub use self::csv::CsvProvider;
pub use self::json::JsonProvider;

use crate::trie::PruningTrie;
use prune_types::{Entry, TrieConfig, MAX_TERM_LENGTH};

use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while reading an input file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    /// The CSV input could not be read.
    #[error("invalid CSV input: {0}")]
    Csv(#[from] ::csv::Error),
    /// The file is not valid JSON.
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON document has no top-level `data` array.
    #[error("JSON input has no \"data\" array")]
    MissingData,
    /// The CSV input is empty although a header line was expected.
    #[error("CSV input has no header line")]
    MissingHeader,
    /// CSV separators must be single ASCII bytes.
    #[error("CSV separator {0:#04x} is not an ASCII character")]
    InvalidSeparator(u8),
}

/// Records parsed from one input, before ordering.
#[derive(Debug, Default)]
pub struct Loaded {
    /// Well-formed records, in file order.
    pub entries: Vec<Entry>,
    /// Number of records that were skipped as malformed.
    pub rejected: usize,
}

impl Loaded {
    /// Keeps the record if it can be inserted, counts it as rejected
    /// otherwise.
    pub(crate) fn push(&mut self, record: Option<(&str, f64)>) {
        match record {
            Some((term, score))
                if !term.is_empty() && term.len() <= MAX_TERM_LENGTH && score.is_finite() =>
            {
                self.entries.push(Entry::new(term, score));
            }
            _ => self.rejected += 1,
        }
    }

    /// Entries ordered longest term first; equal lengths keep file order.
    pub fn into_sorted(mut self) -> Vec<Entry> {
        self.entries
            .sort_by_key(|e| core::cmp::Reverse(e.term.len()));
        self.entries
    }
}

/// Reads `(term, score)` records from one file format.
pub trait InputProvider {
    /// Parses the full contents of an input.
    fn parse(&self, input: &str) -> Result<Loaded, LoadError>;

    /// Reads and parses the file at `path`, longest term first.
    fn read_input(&self, path: &Path) -> Result<Vec<Entry>, LoadError> {
        let input = std::fs::read_to_string(path)?;
        let loaded = self.parse(&input)?;
        info!(
            path = %path.display(),
            loaded = loaded.entries.len(),
            rejected = loaded.rejected,
            "finished loading entries"
        );
        Ok(loaded.into_sorted())
    }
}

impl PruningTrie {
    /// Builds a trie from the file at `path`.
    ///
    /// The arenas are sized for the loaded records up front.
    pub fn from_provider<P>(path: impl AsRef<Path>, provider: &P) -> Result<Self, LoadError>
    where
        P: InputProvider + ?Sized,
    {
        let entries = provider.read_input(path.as_ref())?;
        let total_len: usize = entries.iter().map(|e| e.term.len()).sum();
        let avg_len = total_len / entries.len().max(1);

        let mut trie = Self::with_config(TrieConfig::for_terms(entries.len(), avg_len));
        trie.insert_entries(&entries);
        Ok(trie)
    }

    /// Inserts every record of the file at `path`.
    ///
    /// Returns the number of records inserted.
    pub fn load<P>(&mut self, path: impl AsRef<Path>, provider: &P) -> Result<usize, LoadError>
    where
        P: InputProvider + ?Sized,
    {
        let entries = provider.read_input(path.as_ref())?;
        Ok(self.insert_entries(&entries))
    }

    fn insert_entries(&mut self, entries: &[Entry]) -> usize {
        let (added, failed, last_error) =
            self.insert_batch(entries.iter().map(|e| (e.term.as_str(), e.score)));
        if let Some(err) = last_error {
            warn!(failed, error = %err, "some records could not be inserted");
        }
        added
    }
}
