//! JSON input.
//!
//! The document must be an object with a `data` array. Each element that
//! is an object with a string under the term key is a record; anything
//! else is counted as rejected.

use crate::input::{InputProvider, LoadError, Loaded};

use serde::Deserialize;
use serde_json::{Map, Value};

/// Map type handed to the score function.
pub type Record = Map<String, Value>;

#[derive(Deserialize)]
struct Document {
    data: Option<Vec<Value>>,
}

/// Reads records from the `data` array of a JSON document.
pub struct JsonProvider<F> {
    term_key: String,
    score_fn: F,
}

impl<F> JsonProvider<F>
where
    F: Fn(&Record) -> Option<f64>,
{
    /// Creates a provider that takes the term from `term_key`.
    ///
    /// `score_fn` returns `None` if the record is malformed.
    pub fn new(term_key: impl Into<String>, score_fn: F) -> Self {
        Self {
            term_key: term_key.into(),
            score_fn,
        }
    }
}

impl<F> InputProvider for JsonProvider<F>
where
    F: Fn(&Record) -> Option<f64>,
{
    fn parse(&self, input: &str) -> Result<Loaded, LoadError> {
        let document: Document = serde_json::from_str(input)?;
        let records = document.data.ok_or(LoadError::MissingData)?;

        let mut loaded = Loaded::default();
        for value in &records {
            let record = value.as_object().and_then(|record| {
                let term = record.get(&self.term_key)?.as_str()?;
                Some((term, (self.score_fn)(record)?))
            });
            loaded.push(record);
        }

        Ok(loaded)
    }
}
