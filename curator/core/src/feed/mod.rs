//! Feed Source Abstraction
//!
//! Trait definitions for tabular data feeds. This abstraction allows the
//! Curator to work with different feed providers (spreadsheet macro
//! endpoints, static JSON files, test doubles) without changing core logic.
//!
//! # Design Philosophy
//!
//! The feed is duck-typed at the wire: a JSON array of row objects whose
//! values may be strings, booleans, or missing entirely. All validation
//! happens here, at the ingestion boundary - every field of [`FeedRow`] is
//! optional, blank strings are legal everywhere, and boolean-ish flags
//! accept whatever a spreadsheet is likely to emit (`true`, `"TRUE"`,
//! `"yes"`, `1`, ...). Downstream code never sees a malformed row.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod sheet;

pub use sheet::SheetFeed;

/// Errors from fetching or decoding the feed
///
/// Network errors and non-success statuses ("fetch failure") are kept
/// separate from body decode errors ("parse failure") for logging; the
/// Curator collapses both into a single load-failed condition.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network-level failure (connect, timeout, TLS, ...)
    #[error("feed request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("feed returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, best effort
        body: String,
    },

    /// Body was not a JSON array of row objects
    #[error("feed body was not a JSON array of rows: {0}")]
    Decode(#[source] serde_json::Error),
}

/// One row of the tabular feed
///
/// All fields are optional and free-form; absence and blank strings are
/// valid and must be tolerated. Unknown keys are ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedRow {
    /// Asset title
    pub title: Option<String>,
    /// Asset author
    pub author: Option<String>,
    /// Image URL (may be blank or the literal token "blank")
    pub image: Option<String>,
    /// Destination URL
    pub link: Option<String>,
    /// Free-form status token ("new", "updated", "fix", "soon", "blank", ...)
    pub status: Option<String>,
    /// Featured flag (boolean-ish)
    #[serde(deserialize_with = "flag")]
    pub featured: bool,
    /// New flag (boolean-ish)
    #[serde(deserialize_with = "flag")]
    pub new: bool,
    /// Fixed flag (boolean-ish)
    #[serde(deserialize_with = "flag")]
    pub fixed: bool,
}

impl FeedRow {
    /// Whether every field of this row is absent or blank
    ///
    /// Fully blank rows are dropped before rendering; a row with at least
    /// one non-blank field produces exactly one card.
    pub fn is_blank(&self) -> bool {
        [&self.title, &self.author, &self.image, &self.link, &self.status]
            .iter()
            .all(|field| blank(field))
            && !self.featured
            && !self.new
            && !self.fixed
    }
}

/// True when an optional field is absent or whitespace-only
pub(crate) fn blank(field: &Option<String>) -> bool {
    match field.as_deref() {
        Some(s) => s.trim().is_empty(),
        None => true,
    }
}

/// Deserialize a boolean-ish scalar: bool, number, or string
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(truthy(&value))
}

/// Spreadsheet truthiness: `true`, nonzero numbers, and a small set of
/// affirmative strings count as set; everything else (including null) does not.
fn truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "yes" | "on" | "1" | "x"
        ),
        _ => false,
    }
}

/// Feed source trait
///
/// Implement this trait to add support for different feed providers.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Get the source name for logs (e.g., "sheet")
    fn name(&self) -> &str;

    /// Fetch the full row set
    ///
    /// Returns every row the feed currently holds; the Curator re-renders
    /// the whole gallery from scratch on each fetch.
    async fn fetch_rows(&self) -> Result<Vec<FeedRow>, FeedError>;
}
