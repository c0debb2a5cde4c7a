//! Delimiter-separated input.
//!
//! Records are read with the `csv` crate, so quoted fields may contain the
//! separator, doubled quotes and line breaks. Records may have any number
//! of fields.
//!
//! Blank lines hold no record. They are skipped without being counted as
//! rejected, which also lets files end with any number of newlines.

use crate::input::{InputProvider, LoadError, Loaded};

use ::csv::{ReaderBuilder, StringRecord};
use smallvec::SmallVec;

/// Fields of one record, kept inline for typical column counts.
type Fields<'a> = SmallVec<[&'a str; 8]>;

/// Reads one record at a time, taking the term from a fixed column and
/// deriving the score from the record's fields.
pub struct CsvProvider<F> {
    separator: u8,
    term_column: usize,
    has_header: bool,
    score_fn: F,
}

impl<F> CsvProvider<F>
where
    F: Fn(&[&str]) -> Option<f64>,
{
    /// Creates a provider for input with a header line.
    ///
    /// `score_fn` sees every field of a record and returns `None` if the
    /// record is malformed.
    pub fn new(separator: u8, term_column: usize, score_fn: F) -> Self {
        Self {
            separator,
            term_column,
            has_header: true,
            score_fn,
        }
    }

    /// Treats the first line as a record instead of a header.
    pub fn without_header(mut self) -> Self {
        self.has_header = false;
        self
    }
}

fn second_column(fields: &[&str]) -> Option<f64> {
    fields.get(1)?.trim().parse().ok()
}

impl CsvProvider<fn(&[&str]) -> Option<f64>> {
    /// Provider for `term<sep>score` input with a header line.
    pub fn term_score(separator: u8) -> Self {
        Self::new(separator, 0, second_column)
    }
}

impl<F> InputProvider for CsvProvider<F>
where
    F: Fn(&[&str]) -> Option<f64>,
{
    fn parse(&self, input: &str) -> Result<Loaded, LoadError> {
        // Any other byte could split a UTF-8 sequence
        if !self.separator.is_ascii() {
            return Err(LoadError::InvalidSeparator(self.separator));
        }

        let mut reader = ReaderBuilder::new()
            .delimiter(self.separator)
            .has_headers(self.has_header)
            .flexible(true)
            .from_reader(input.as_bytes());

        if self.has_header && reader.headers()?.is_empty() {
            return Err(LoadError::MissingHeader);
        }

        let mut loaded = Loaded::default();
        let mut record = StringRecord::new();
        while reader.read_record(&mut record)? {
            let fields: Fields<'_> = record.iter().collect();
            let entry = fields
                .get(self.term_column)
                .and_then(|term| Some((*term, (self.score_fn)(&fields[..])?)));
            loaded.push(entry);
        }

        Ok(loaded)
    }
}
