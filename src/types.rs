//! Core types for notice-dl

use std::path::PathBuf;

/// Identifier of a case slot, the numbered per-notice storage directory
///
/// Ids are handed out sequentially from 1 in processing order. The id is
/// only the storage sequence number; it says nothing about the notice
/// itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaseId(pub u64);

impl CaseId {
    /// Create a new CaseId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner u64 value
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Directory name for this case ("case-<n>")
    pub fn dir_name(&self) -> String {
        format!("case-{}", self.0)
    }
}

impl From<u64> for CaseId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<CaseId> for u64 {
    fn from(id: CaseId) -> Self {
        id.0
    }
}

impl PartialEq<u64> for CaseId {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

impl PartialEq<CaseId> for u64 {
    fn eq(&self, other: &CaseId) -> bool {
        *self == other.0
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A notice reference discovered on a listing page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingEntry {
    /// Display title from the listing; on this source the organisation name
    pub title: String,
    /// Absolute URL of the notice's detail page. Empty when the listing
    /// entry carried no usable locator; such entries are skipped without
    /// being attempted.
    pub detail_url: String,
}

impl ListingEntry {
    /// True when the entry carries a locator the pipeline can follow
    pub fn has_detail_url(&self) -> bool {
        !self.detail_url.trim().is_empty()
    }
}

/// Extracted metadata for one decision notice
///
/// Every field is optional: the source markup does not guarantee any of
/// them, and absence is data rather than an error. A record is built once
/// by the detail extractor and never mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeRecord {
    /// Name of the organisation the notice concerns
    pub organisation: Option<String>,
    /// Decision date exactly as the source formats it (e.g. "5 December 2025")
    pub date: Option<String>,
    /// Sector classification (e.g. "Education", "Local government")
    pub sector: Option<String>,
    /// Decision outcome text
    pub decision: Option<String>,
    /// Summary of the notice; may span multiple paragraphs
    pub abstract_text: Option<String>,
    /// Absolute URL of the notice's source document
    pub attachment_url: Option<String>,
}

/// A numbered storage slot bound to one notice for the lifetime of a run
///
/// The slot's directory is not created until something is written into it,
/// so a slot that is discarded before any write leaves no trace on disk.
#[derive(Clone, Debug)]
pub struct CaseSlot {
    /// Sequential identifier, starting at 1
    pub id: CaseId,
    /// Directory that will hold the metadata artifact and the attachment
    pub dir: PathBuf,
}

/// Counters reported at the end of a run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Notices fully committed (metadata and document on disk)
    pub processed: u64,
    /// Listing entries never attempted because they carried no usable
    /// detail locator
    pub skipped: u64,
    /// Notices attempted but dropped after an extraction, download, or
    /// commit failure
    pub failed: u64,
}

impl RunSummary {
    /// Total number of listing entries the run saw
    pub fn total(&self) -> u64 {
        self.processed + self.skipped + self.failed
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} processed, {} skipped, {} failed",
            self.processed, self.skipped, self.failed
        )
    }
}
