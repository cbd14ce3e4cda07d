//! Error types for notice-dl
//!
//! One top-level [`Error`] plus a domain sub-enum per pipeline stage. The
//! stage errors carry the context a skip message needs (page index, detail
//! URL, attachment URL), so callers can log a useful reference for every
//! notice they drop.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for notice-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for notice-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "base_url")
        key: Option<String>,
    },

    /// Listing page retrieval failed. Fatal: an incomplete listing leaves an
    /// unknown-sized hole in the harvest, so the run aborts.
    #[error("listing error: {0}")]
    Listing(#[from] ListingError),

    /// Detail page retrieval or extraction failed. Recoverable: the one
    /// notice is skipped.
    #[error("detail error: {0}")]
    Detail(#[from] DetailError),

    /// Attachment download failed. Recoverable: the one notice is skipped
    /// and its case directory is never committed.
    #[error("attachment error: {0}")]
    Attachment(#[from] AttachmentError),

    /// Case store allocation or commit failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// HTTP client construction or other transport-level failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Listing retrieval errors
///
/// Every variant carries the page index so an aborted run can report
/// exactly where the walk stopped.
#[derive(Debug, Error)]
pub enum ListingError {
    /// The HTTP request for a listing page could not be completed
    #[error("listing page {page} request failed: {source}")]
    Request {
        /// Page index that was being requested
        page: u32,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The listing endpoint answered with a non-success status
    #[error("listing page {page} returned HTTP {status}")]
    Status {
        /// Page index that was being requested
        page: u32,
        /// HTTP status code returned by the endpoint
        status: u16,
    },

    /// The listing response body was not the expected JSON shape
    #[error("listing page {page} could not be decoded: {source}")]
    Decode {
        /// Page index whose response failed to decode
        page: u32,
        /// Underlying decode error
        #[source]
        source: reqwest::Error,
    },
}

impl ListingError {
    /// Page index the error refers to
    pub fn page(&self) -> u32 {
        match self {
            ListingError::Request { page, .. }
            | ListingError::Status { page, .. }
            | ListingError::Decode { page, .. } => *page,
        }
    }
}

/// Detail page errors
#[derive(Debug, Error)]
pub enum DetailError {
    /// The HTTP request for a detail page could not be completed
    #[error("detail page '{url}' request failed: {source}")]
    Request {
        /// Detail page URL that was being requested
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The detail endpoint answered with a non-success status
    #[error("detail page '{url}' returned HTTP {status}")]
    Status {
        /// Detail page URL that was being requested
        url: String,
        /// HTTP status code returned by the endpoint
        status: u16,
    },

    /// The detail page body could not be read
    #[error("detail page '{url}' body could not be read: {source}")]
    Read {
        /// Detail page URL whose body failed to arrive
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The detail page contains no resolvable attachment reference. The
    /// notice cannot be committed: a metadata-only case folder is never
    /// written.
    #[error("detail page '{url}' has no attachment reference")]
    MissingAttachment {
        /// Detail page URL that lacks an attachment link
        url: String,
    },
}

/// Attachment download errors
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// The HTTP request for the attachment could not be completed
    #[error("attachment '{url}' request failed: {source}")]
    Request {
        /// Attachment URL that was being requested
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The attachment endpoint answered with a non-success status
    #[error("attachment '{url}' returned HTTP {status}")]
    Status {
        /// Attachment URL that was being requested
        url: String,
        /// HTTP status code returned by the endpoint
        status: u16,
    },

    /// The attachment body failed mid-stream
    #[error("attachment '{url}' stream failed: {source}")]
    Stream {
        /// Attachment URL whose body stream broke
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Writing the streamed attachment to disk failed
    #[error("failed to write attachment to {path}: {source}")]
    Write {
        /// Path that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Case store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The case directory could not be created
    #[error("failed to create case directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The metadata artifact could not be written
    #[error("failed to write metadata at {path}: {source}")]
    WriteMetadata {
        /// Path that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A discarded slot's partial directory could not be removed
    #[error("failed to remove discarded case directory {path}: {source}")]
    RemoveDir {
        /// Directory that could not be removed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Discard was requested for a slot that is not the most recent
    /// allocation. Only the latest uncommitted slot may be discarded; the
    /// strictly sequential pipeline never violates this.
    #[error("case slot {id} is not the most recent allocation and cannot be discarded")]
    DiscardOutOfOrder {
        /// Identifier of the slot the caller tried to discard
        id: u64,
    },
}
