//! Configuration types for notice-dl

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Main configuration for the notice harvester
///
/// Fields are organized into logical sub-configs:
/// - [`source`](SourceConfig) — where the listing lives and how it paginates
/// - [`http`](HttpConfig) — client behavior shared by every request
/// - [`retry`](RetryConfig) — backoff policy for transient failures
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Listing source endpoint and pagination shape
    #[serde(default)]
    pub source: SourceConfig,

    /// HTTP client behavior (timeout, user agent, politeness delay)
    #[serde(default)]
    pub http: HttpConfig,

    /// Retry configuration for transient failures
    #[serde(default)]
    pub retry: RetryConfig,

    /// Root directory receiving one case-<n> folder per committed notice
    /// (default: "data")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
            output_dir: default_output_dir(),
        }
    }
}

/// Listing source configuration
///
/// Describes the publisher's search endpoint and the pagination contract it
/// honors. The defaults target the UK Information Commissioner's decision
/// notice archive; pointing at a mirror only needs `base_url` changed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the publishing site, scheme included (default: "https://ico.org.uk")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the JSON search endpoint under the base URL (default: "/api/search")
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// First listing page number requested (default: 1)
    #[serde(default = "default_start_page")]
    pub start_page: u32,

    /// Result ordering requested from the search endpoint (default: "newest")
    #[serde(default = "default_order")]
    pub order: String,

    /// Site-tree id the search endpoint scopes results to (default: 13635,
    /// the decision notices section)
    #[serde(default = "default_root_page_id")]
    pub root_page_id: u64,

    /// Hard cap on listing pages walked in one run (None = walk until the
    /// source reports no more results)
    #[serde(default)]
    pub max_pages: Option<u32>,

    /// File extension identifying notice documents in detail markup
    /// (default: ".pdf")
    #[serde(default = "default_document_extension")]
    pub document_extension: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_path: default_search_path(),
            start_page: default_start_page(),
            order: default_order(),
            root_page_id: default_root_page_id(),
            max_pages: None,
            document_extension: default_document_extension(),
        }
    }
}

/// HTTP client configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request deadline covering connect and body (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Pause between consecutive notices, applied whether the notice
    /// succeeded or not (default: 1 second)
    #[serde(default = "default_politeness_delay", with = "duration_serde")]
    pub politeness_delay: Duration,

    /// User-Agent header sent with every request (default: "notice-dl/<version>")
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            politeness_delay: default_politeness_delay(),
            user_agent: default_user_agent(),
        }
    }
}

/// Retry configuration for transient failures
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 5)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 60 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

// Default value functions
fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_base_url() -> String {
    "https://ico.org.uk".to_string()
}

fn default_search_path() -> String {
    "/api/search".to_string()
}

fn default_start_page() -> u32 {
    1
}

fn default_order() -> String {
    "newest".to_string()
}

fn default_root_page_id() -> u64 {
    13635
}

fn default_document_extension() -> String {
    ".pdf".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_politeness_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_user_agent() -> String {
    format!("notice-dl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(60)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
