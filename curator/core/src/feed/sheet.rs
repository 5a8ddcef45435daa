//! Sheet Feed Implementation
//!
//! Feed source for spreadsheet-backed macro endpoints: a single `GET`
//! returning the whole table as a JSON array of row objects. There is no
//! paging or querying at the wire level; the gallery does all of that
//! locally over the delivered rows.

use std::time::Duration;

use async_trait::async_trait;

use super::{FeedError, FeedRow, FeedSource};
use crate::config::FeedConfig;

/// Spreadsheet macro endpoint client
#[derive(Clone)]
pub struct SheetFeed {
    /// Endpoint URL
    endpoint: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl SheetFeed {
    /// Create a new sheet feed against the given endpoint
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Create from [`FeedConfig`]
    #[must_use]
    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.endpoint.clone(), config.request_timeout())
    }

    /// The endpoint this feed reads from
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FeedSource for SheetFeed {
    fn name(&self) -> &str {
        "sheet"
    }

    async fn fetch_rows(&self) -> Result<Vec<FeedRow>, FeedError> {
        let response = self.http_client.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status { status, body });
        }

        // Decode by hand rather than response.json() so a non-array body is
        // reported as a parse failure, not a request failure.
        let body = response.text().await?;
        let rows: Vec<FeedRow> = serde_json::from_str(&body).map_err(FeedError::Decode)?;

        tracing::debug!(rows = rows.len(), "Fetched feed rows");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_feed_creation() {
        let feed = SheetFeed::new("https://example.com/macro?out=json", Duration::from_secs(30));
        assert_eq!(feed.endpoint(), "https://example.com/macro?out=json");
        assert_eq!(feed.name(), "sheet");
    }

    #[test]
    fn test_from_config() {
        let config = FeedConfig {
            endpoint: "https://example.com/rows".to_string(),
            ..FeedConfig::default()
        };
        let feed = SheetFeed::from_config(&config);
        assert_eq!(feed.endpoint(), "https://example.com/rows");
    }
}
