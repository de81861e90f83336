//! In-memory quote collection.
//!
//! Quotes are parsed and normalized once from a JSON source and never change
//! afterwards, so a single [`QuoteStore`] can be shared across every request
//! handler behind an `Arc`.

pub mod error;
pub mod types;

pub use error::{QuoteError, QuoteResult};
pub use types::{PageRequest, PageResult, Quote, QuoteEntry, QuoteSource, UNKNOWN_AUTHOR};

use std::collections::HashMap;
use std::path::Path;

use rand::seq::SliceRandom;
use serde_json::Value;

/// Immutable, queryable set of quotes.
#[derive(Debug, Default)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
    by_id: HashMap<String, usize>,
}

impl QuoteStore {
    /// Build a store from already-normalized quotes.
    ///
    /// When ids collide, lookups resolve to the first quote carrying the id.
    #[must_use]
    pub fn new(quotes: Vec<Quote>) -> Self {
        let mut by_id = HashMap::with_capacity(quotes.len());
        for (idx, quote) in quotes.iter().enumerate() {
            by_id.entry(quote.id.clone()).or_insert(idx);
        }
        Self { quotes, by_id }
    }

    /// Build a store from parsed JSON.
    ///
    /// Accepts a bare array of entries or `{ "quotes": [...] }`. Entries may be
    /// strings or objects with `id`, `text` (or `quote`) and `author`.
    ///
    /// # Errors
    /// Returns [`QuoteError::Format`] for any other shape.
    pub fn from_json(value: Value) -> QuoteResult<Self> {
        let quotes = QuoteSource::try_from(value)?
            .into_entries()
            .into_iter()
            .map(|entry| QuoteEntry::try_from(entry)?.normalize())
            .collect::<QuoteResult<Vec<_>>>()?;

        Ok(Self::new(quotes))
    }

    /// Read and parse a JSON quote file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not JSON, or has an
    /// unsupported shape.
    pub fn load(path: impl AsRef<Path>) -> QuoteResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&raw)?;
        let store = Self::from_json(value)?;
        tracing::info!("Loaded {} quotes from {}", store.count(), path.display());
        Ok(store)
    }

    /// Number of quotes held.
    #[must_use]
    pub fn count(&self) -> usize {
        self.quotes.len()
    }

    /// Every quote, in load order.
    #[must_use]
    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    /// Pick one quote uniformly at random.
    ///
    /// # Errors
    /// Returns [`QuoteError::EmptyStore`] when no quotes are loaded.
    pub fn random_one(&self) -> QuoteResult<&Quote> {
        self.quotes
            .choose(&mut rand::thread_rng())
            .ok_or(QuoteError::EmptyStore)
    }

    /// Exact lookup by id.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&Quote> {
        self.by_id.get(id).and_then(|idx| self.quotes.get(*idx))
    }

    /// Up to `n` distinct quotes in random order.
    #[must_use]
    pub fn sample(&self, n: usize) -> Vec<&Quote> {
        let mut picked: Vec<&Quote> = self.quotes.iter().collect();
        picked.shuffle(&mut rand::thread_rng());
        picked.truncate(n);
        picked
    }

    /// Case-insensitive substring search over text and author, then paginate.
    ///
    /// A missing or empty term behaves exactly like [`Self::paginate`].
    #[must_use]
    pub fn search(&self, term: Option<&str>, page: usize, limit: usize) -> PageResult {
        let Some(needle) = term.filter(|t| !t.is_empty()).map(str::to_lowercase) else {
            return self.paginate(page, limit);
        };

        let matching: Vec<&Quote> = self
            .quotes
            .iter()
            .filter(|q| {
                q.text.to_lowercase().contains(&needle) || q.author.to_lowercase().contains(&needle)
            })
            .collect();

        tracing::debug!("Search {needle:?} matched {} quotes", matching.len());
        PageResult::from_matches(&matching, page, limit)
    }

    /// Slice the full collection into pages.
    #[must_use]
    pub fn paginate(&self, page: usize, limit: usize) -> PageResult {
        let all: Vec<&Quote> = self.quotes.iter().collect();
        PageResult::from_matches(&all, page, limit)
    }
}
