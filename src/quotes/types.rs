//! Core types for the quote collection.

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{QuoteError, QuoteResult};

/// Author used when an entry does not name one.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Length of generated quote ids.
const FRESH_ID_LEN: usize = 9;

/// A single normalized quote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Identifier, unique within a load (best effort for generated ids).
    pub id: String,
    /// The quotation body. Never empty.
    pub text: String,
    /// Who said it. Never empty.
    pub author: String,
}

impl Quote {
    /// Build a quote, substituting [`UNKNOWN_AUTHOR`] for a blank author.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>, author: Option<&str>) -> Self {
        let author = author
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR);
        Self {
            id: id.into(),
            text: text.into(),
            author: author.to_string(),
        }
    }

    /// Render as `"text" - author`.
    #[must_use]
    pub fn attributed(&self) -> String {
        format!("\"{}\" - {}", self.text, self.author)
    }
}

/// One page of quotes plus the size of the full (filtered) set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    /// Quotes on the requested page, in collection order.
    pub quotes: Vec<Quote>,
    /// Number of quotes matching the filter.
    pub total: usize,
    /// Requested page (1-based).
    pub page: usize,
    /// Requested page size.
    pub limit: usize,
    /// `ceil(total / limit)`, or 0 when `limit` is 0.
    pub total_pages: usize,
}

impl PageResult {
    /// Slice `matching` into the requested page.
    #[must_use]
    pub fn from_matches(matching: &[&Quote], page: usize, limit: usize) -> Self {
        let total = matching.len();
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };

        let quotes = page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(limit))
            .filter(|start| *start < total)
            .map(|start| {
                let end = start.saturating_add(limit).min(total);
                matching[start..end].iter().map(|&q| q.clone()).collect()
            })
            .unwrap_or_default();

        Self {
            quotes,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// Page parameters after coercion and clamping at the HTTP boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: usize,
    /// Page size, between 1 and the configured maximum.
    pub limit: usize,
}

impl PageRequest {
    /// Coerce raw query values into a clamped page request.
    ///
    /// Values that do not parse as integers fall back to the defaults
    /// (page 1, `default_limit`).
    #[must_use]
    pub fn from_query(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: usize,
        max_limit: usize,
    ) -> Self {
        let page = page.and_then(parse_int).unwrap_or(1).max(1);
        let limit = limit
            .and_then(parse_int)
            .map_or(default_limit, |l| usize::try_from(l.max(1)).unwrap_or(usize::MAX))
            .clamp(1, max_limit.max(1));

        Self {
            page: usize::try_from(page).unwrap_or(usize::MAX),
            limit,
        }
    }
}

/// Parse an integer-like string, ignoring surrounding whitespace.
fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Generate a short random lowercase alphanumeric id.
#[must_use]
pub fn fresh_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(FRESH_ID_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// The two accepted top-level shapes of a quote source.
#[derive(Debug)]
pub enum QuoteSource {
    /// A bare array of entries.
    List(Vec<Value>),
    /// An object whose `quotes` field holds the entries.
    Wrapped(Vec<Value>),
}

impl QuoteSource {
    /// Consume the source and return its raw entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<Value> {
        match self {
            Self::List(entries) | Self::Wrapped(entries) => entries,
        }
    }
}

impl TryFrom<Value> for QuoteSource {
    type Error = QuoteError;

    fn try_from(value: Value) -> QuoteResult<Self> {
        match value {
            Value::Array(entries) => Ok(Self::List(entries)),
            Value::Object(mut map) => match map.remove("quotes") {
                Some(Value::Array(entries)) => Ok(Self::Wrapped(entries)),
                _ => Err(QuoteError::invalid_file()),
            },
            _ => Err(QuoteError::invalid_file()),
        }
    }
}

/// A single raw entry, before normalization.
#[derive(Debug, PartialEq, Eq)]
pub enum QuoteEntry {
    /// A plain string: the quote text.
    Text(String),
    /// A partial object.
    Record {
        /// Explicit id, if any.
        id: Option<String>,
        /// `text`, or `quote` when `text` is absent.
        text: Option<String>,
        /// Author, if any.
        author: Option<String>,
    },
}

impl QuoteEntry {
    /// Normalize into a [`Quote`], generating an id where needed.
    ///
    /// # Errors
    /// Returns a format error when the entry has no usable text.
    pub fn normalize(self) -> QuoteResult<Quote> {
        match self {
            Self::Text(text) if !text.trim().is_empty() => Ok(Quote::new(fresh_id(), text, None)),
            Self::Record {
                id,
                text: Some(text),
                author,
            } if !text.trim().is_empty() => {
                let id = id.filter(|id| !id.is_empty()).unwrap_or_else(fresh_id);
                Ok(Quote::new(id, text, author.as_deref()))
            }
            // An entry without text fails the whole load rather than being
            // stored as an empty quote.
            _ => Err(QuoteError::invalid_quote()),
        }
    }
}

impl TryFrom<Value> for QuoteEntry {
    type Error = QuoteError;

    fn try_from(value: Value) -> QuoteResult<Self> {
        match value {
            Value::String(text) => Ok(Self::Text(text)),
            Value::Object(map) => {
                let id = match map.get("id") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(Value::Number(n)) => Some(n.to_string()),
                    Some(_) => return Err(QuoteError::invalid_quote()),
                };
                let text = match optional_str(&map, "text")? {
                    Some(text) => Some(text),
                    None => optional_str(&map, "quote")?,
                };
                let author = optional_str(&map, "author")?;
                Ok(Self::Record { id, text, author })
            }
            _ => Err(QuoteError::invalid_quote()),
        }
    }
}

/// Read a string field, treating `null` as absent.
fn optional_str(map: &Map<String, Value>, key: &str) -> QuoteResult<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(QuoteError::invalid_quote()),
    }
}
