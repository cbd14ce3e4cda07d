//! Run orchestration
//!
//! Walks the listing page by page and settles each entry fully — extract,
//! allocate a case slot, download the document, commit — before touching
//! the next. Recoverable failures are logged and counted; only listing
//! failures abort the run. Between notices the pipeline sleeps the
//! configured politeness delay and honors cancellation, so a shutdown
//! request never disturbs an already-committed case.

use crate::attachment::AttachmentDownloader;
use crate::config::Config;
use crate::detail::DetailExtractor;
use crate::error::Result;
use crate::listing::ListingFetcher;
use crate::retry::fetch_with_retry;
use crate::store::CaseStore;
use crate::types::{CaseSlot, ListingEntry, RunSummary};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Ingestion run over one configured source
pub struct Pipeline {
    config: Config,
    listing: ListingFetcher,
    detail: DetailExtractor,
    attachments: AttachmentDownloader,
    store: CaseStore,
    cancel: CancellationToken,
}

impl Pipeline {
    /// Build a pipeline with its own cancellation token
    pub fn new(config: Config) -> Result<Self> {
        Self::with_cancellation(config, CancellationToken::new())
    }

    /// Build a pipeline observing an externally owned cancellation token
    ///
    /// All stages share one HTTP client carrying the configured timeout and
    /// user agent.
    pub fn with_cancellation(config: Config, cancel: CancellationToken) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http.request_timeout)
            .user_agent(config.http.user_agent.clone())
            .build()?;

        let listing = ListingFetcher::new(client.clone(), &config.source)?;
        let detail = DetailExtractor::new(client.clone(), &config.source)?;
        let attachments = AttachmentDownloader::new(client);
        let store = CaseStore::new(config.output_dir.clone());

        Ok(Self {
            config,
            listing,
            detail,
            attachments,
            store,
            cancel,
        })
    }

    /// Token observed between notices; cancelling it winds the run down
    /// cleanly
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Walk the listing and process every entry, returning the run's
    /// accounting
    ///
    /// # Errors
    ///
    /// Returns an error when a listing page cannot be fetched after
    /// retries; an incomplete listing would silently truncate the corpus,
    /// so the run aborts instead.
    pub async fn run(&mut self) -> Result<RunSummary> {
        info!(
            base_url = %self.config.source.base_url,
            output_dir = %self.store.root().display(),
            "Starting notice run"
        );

        let mut summary = RunSummary::default();
        let mut page = self.config.source.start_page;

        'pages: loop {
            if self.cancel.is_cancelled() {
                info!("Cancellation requested, stopping before next page");
                break;
            }

            if let Some(max_pages) = self.config.source.max_pages
                && page >= self.config.source.start_page.saturating_add(max_pages)
            {
                info!(pages = max_pages, "Reached configured page cap");
                break;
            }

            let listing_page =
                fetch_with_retry(&self.config.retry, || self.listing.fetch_page(page)).await?;

            info!(
                page = page,
                entries = listing_page.entries.len(),
                "Fetched listing page"
            );

            for entry in &listing_page.entries {
                if self.cancel.is_cancelled() {
                    info!("Cancellation requested, stopping between notices");
                    break 'pages;
                }

                self.process_entry(entry, &mut summary).await;

                // Be a good citizen toward the source between notices.
                let delay = self.config.http.politeness_delay;
                if !delay.is_zero() {
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = self.cancel.cancelled() => {}
                    }
                }
            }

            if listing_page.is_last() {
                info!(page = page, "Listing exhausted");
                break;
            }

            page += 1;
        }

        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            failed = summary.failed,
            "Run complete"
        );
        Ok(summary)
    }

    /// Settle one listing entry, updating the summary
    ///
    /// Failures here are recoverable: the entry is accounted for and the
    /// walk continues with the sequence intact.
    async fn process_entry(&mut self, entry: &ListingEntry, summary: &mut RunSummary) {
        if !entry.has_detail_url() {
            warn!(title = %entry.title, "Entry has no usable detail locator, skipping");
            summary.skipped += 1;
            return;
        }

        debug!(url = %entry.detail_url, title = %entry.title, "Processing notice");

        let record = match fetch_with_retry(&self.config.retry, || self.detail.extract(entry)).await
        {
            Ok(record) => record,
            Err(e) => {
                error!(url = %entry.detail_url, error = %e, "Failed to extract notice, skipping");
                summary.failed += 1;
                return;
            }
        };

        let Some(attachment_url) = record.attachment_url.clone() else {
            // extract() rejects pages without a document reference, so this
            // only guards records built by hand.
            error!(url = %entry.detail_url, "Notice record carries no attachment URL, skipping");
            summary.failed += 1;
            return;
        };

        let slot = self.store.allocate();

        let downloaded = match fetch_with_retry(&self.config.retry, || {
            self.attachments.download(&attachment_url, &slot.dir)
        })
        .await
        {
            Ok(downloaded) => downloaded,
            Err(e) => {
                error!(
                    url = %attachment_url,
                    case = %slot.id,
                    error = %e,
                    "Failed to download attachment, skipping"
                );
                self.discard_slot(slot).await;
                summary.failed += 1;
                return;
            }
        };

        if let Err(e) = self.store.commit(&slot, &record).await {
            error!(case = %slot.id, error = %e, "Failed to write case metadata, skipping");
            self.discard_slot(slot).await;
            summary.failed += 1;
            return;
        }

        info!(
            case = %slot.id,
            organisation = record.organisation.as_deref().unwrap_or("unknown"),
            bytes = downloaded.bytes,
            document = %downloaded.path.display(),
            "Committed case"
        );
        summary.processed += 1;
    }

    /// Discard a slot, logging rather than propagating cleanup failures
    ///
    /// The notice is already being counted as failed; a cleanup error must
    /// not mask that or abort the run.
    async fn discard_slot(&mut self, slot: CaseSlot) {
        let case = slot.id;
        if let Err(e) = self.store.discard(slot).await {
            warn!(case = %case, error = %e, "Failed to discard case slot");
        }
    }
}
