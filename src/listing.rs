//! Listing discovery against the source's paginated search API
//!
//! The source publishes its notice index through a JSON POST endpoint
//! rather than crawlable HTML. Each request names a page number; the
//! response carries that page's entries and, when the source provides it,
//! the total page count. The fetcher is stateless so a walk can always be
//! restarted from the configured start page.

use crate::config::SourceConfig;
use crate::error::{Error, ListingError, Result};
use crate::types::ListingEntry;
use serde::Deserialize;
use serde_json::json;
use url::Url;

/// One page of listing results
#[derive(Clone, Debug)]
pub struct ListingPage {
    /// Page number this response answers
    pub page: u32,
    /// Entries present on the page, in source order (may be empty on the
    /// terminal page)
    pub entries: Vec<ListingEntry>,
    /// Total page count, when the source reports it
    pub total_pages: Option<u32>,
}

impl ListingPage {
    /// True when this page ends the walk: it carries no entries, or the
    /// source's total-page signal says nothing lies past it
    pub fn is_last(&self) -> bool {
        self.entries.is_empty() || self.total_pages.is_some_and(|total| self.page >= total)
    }
}

/// Wire model of the search API response. Unknown fields are ignored;
/// missing fields collapse to their defaults so a sparse response still
/// parses.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
    #[serde(default, rename = "totalPages")]
    total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
}

/// Fetches listing pages from the source's search endpoint
#[derive(Debug)]
pub struct ListingFetcher {
    client: reqwest::Client,
    base: Url,
    search_url: Url,
    order: String,
    root_page_id: u64,
}

impl ListingFetcher {
    /// Build a fetcher for the given source configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `base_url` and `search_path` do
    /// not combine into a valid URL.
    pub fn new(client: reqwest::Client, source: &SourceConfig) -> Result<Self> {
        let base = Url::parse(&source.base_url).map_err(|e| Error::Config {
            message: format!("invalid base URL '{}': {e}", source.base_url),
            key: Some("base_url".to_string()),
        })?;
        let search_url = base.join(&source.search_path).map_err(|e| Error::Config {
            message: format!("invalid search path '{}': {e}", source.search_path),
            key: Some("search_path".to_string()),
        })?;

        Ok(Self {
            client,
            base,
            search_url,
            order: source.order.clone(),
            root_page_id: source.root_page_id,
        })
    }

    /// Fetch one listing page
    ///
    /// Sends the source's expected POST payload and decodes the entries.
    /// Relative entry URLs are resolved against the base URL here so every
    /// [`ListingEntry`] leaves the fetcher ready to follow.
    pub async fn fetch_page(&self, page: u32) -> std::result::Result<ListingPage, ListingError> {
        let payload = json!({
            "filters": [],
            "pageNumber": page,
            "order": self.order,
            "rootPageId": self.root_page_id,
        });

        tracing::debug!(page = page, url = %self.search_url, "Requesting listing page");

        let response = self
            .client
            .post(self.search_url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|source| ListingError::Request { page, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListingError::Status {
                page,
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|source| ListingError::Decode { page, source })?;

        let entries = body
            .results
            .into_iter()
            .map(|result| ListingEntry {
                detail_url: self.resolve_entry_url(&result.url),
                title: result.title,
            })
            .collect();

        Ok(ListingPage {
            page,
            entries,
            total_pages: body.total_pages,
        })
    }

    /// Resolve a listing entry's URL against the base URL
    ///
    /// An empty or unjoinable reference becomes an empty string; the
    /// pipeline counts such entries as skipped instead of failing the page.
    fn resolve_entry_url(&self, raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return String::new();
        }
        match self.base.join(raw) {
            Ok(resolved) => resolved.to_string(),
            Err(e) => {
                tracing::warn!(reference = raw, error = %e, "Listing entry URL could not be resolved");
                String::new()
            }
        }
    }
}
