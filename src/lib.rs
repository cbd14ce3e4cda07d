//! # notice-dl
//!
//! Ingestion pipeline for regulatory decision notices: walks a paginated
//! listing API, extracts each notice's metadata from its detail page, and
//! archives the decision document plus a `metadata.txt` artifact into
//! sequentially numbered case directories.
//!
//! ## Design Philosophy
//!
//! - **Sequential and restartable** - one notice is fully settled before
//!   the next; case numbers are gap-free from 1
//! - **Nothing partial on disk** - documents and metadata are written via
//!   temporary files and renamed into place
//! - **Polite by default** - bounded retries with jittered backoff and a
//!   delay between notices
//! - **Sensible defaults** - works against the default source with zero
//!   configuration
//!
//! ## Quick Start
//!
//! ```no_run
//! use notice_dl::{Config, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.output_dir = "data".into();
//!
//!     let mut pipeline = Pipeline::new(config)?;
//!     let summary = pipeline.run().await?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Streaming document download with atomic materialization
pub mod attachment;
/// Configuration types
pub mod config;
/// Detail-page fetch and metadata extraction
pub mod detail;
/// Error types
pub mod error;
/// Listing discovery against the paginated search API
pub mod listing;
/// Run orchestration
pub mod pipeline;
/// Retry logic with exponential backoff
pub mod retry;
/// Sequential case storage
pub mod store;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use attachment::{AttachmentDownloader, DownloadedAttachment};
pub use config::{Config, HttpConfig, RetryConfig, SourceConfig};
pub use detail::DetailExtractor;
pub use error::{AttachmentError, DetailError, Error, ListingError, Result, StoreError};
pub use listing::{ListingFetcher, ListingPage};
pub use pipeline::Pipeline;
pub use retry::{IsRetryable, fetch_with_retry};
pub use store::CaseStore;
pub use types::{CaseId, CaseSlot, ListingEntry, NoticeRecord, RunSummary};

/// Run a pipeline to completion with graceful signal handling.
///
/// A termination signal cancels the pipeline's token; the run winds down at
/// the next inter-notice boundary and returns the summary of what it
/// completed.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal
///   registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use notice_dl::{Config, Pipeline, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pipeline = Pipeline::new(Config::default())?;
///     let summary = run_with_shutdown(pipeline).await?;
///     println!("{summary}");
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(mut pipeline: Pipeline) -> Result<types::RunSummary> {
    let token = pipeline.cancellation_token();
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("Shutdown requested, finishing the current notice");
        token.cancel();
    });

    pipeline.run().await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration may fail in restricted environments (containers,
    // tests); degrade rather than give up on shutdown handling.
    match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM"),
                _ = sigint.recv() => tracing::info!("Received SIGINT (Ctrl+C)"),
            }
        }
        (Ok(mut sigterm), Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            sigterm.recv().await;
            tracing::info!("Received SIGTERM");
        }
        (Err(e), Ok(mut sigint)) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            sigint.recv().await;
            tracing::info!("Received SIGINT (Ctrl+C)");
        }
        (Err(e), Err(_)) => {
            tracing::error!(error = %e, "Could not register signal handlers, falling back to Ctrl+C");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C"),
    }
}
