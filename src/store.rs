//! Sequential case storage
//!
//! Committed notices land in `<root>/case-<n>` directories numbered
//! gap-free from 1. A slot is reserved before the notice's document is
//! fetched, then either committed (metadata written beside the document)
//! or discarded so the next notice reuses the number. The sequential
//! pipeline is what makes discard-and-reuse collision-free: at most one
//! uncommitted slot exists at a time.

use crate::error::StoreError;
use crate::types::{CaseId, CaseSlot, NoticeRecord};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Metadata artifact filename inside each case directory
pub const METADATA_FILENAME: &str = "metadata.txt";

/// Placeholder rendered for fields the detail page did not provide
pub const MISSING_FIELD: &str = "N/A";

/// Date layout used on the source's detail pages, e.g. "4 March 2024"
const SOURCE_DATE_FORMAT: &str = "%d %B %Y";

/// Allocates case numbers and writes committed case directories
pub struct CaseStore {
    root: PathBuf,
    next_id: u64,
}

impl CaseStore {
    /// Create a store rooted at `root`. Numbering starts at 1 and is local
    /// to this store instance.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            next_id: 1,
        }
    }

    /// Output root the case directories live under
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reserve the next case number
    ///
    /// Nothing is created on disk; the slot directory comes into being
    /// when the document download lands in it.
    pub fn allocate(&mut self) -> CaseSlot {
        let id = CaseId::new(self.next_id);
        self.next_id += 1;
        CaseSlot {
            dir: self.root.join(id.dir_name()),
            id,
        }
    }

    /// Return an uncommitted slot so the next allocation reuses its number
    ///
    /// Valid only for the most recently allocated slot; anything already
    /// written into the slot directory is removed.
    pub async fn discard(&mut self, slot: CaseSlot) -> std::result::Result<(), StoreError> {
        if slot.id.get() + 1 != self.next_id {
            return Err(StoreError::DiscardOutOfOrder { id: slot.id.get() });
        }

        match tokio::fs::remove_dir_all(&slot.dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StoreError::RemoveDir {
                    path: slot.dir.clone(),
                    source,
                });
            }
        }

        self.next_id = slot.id.get();
        Ok(())
    }

    /// Write the metadata artifact into the slot directory, sealing the case
    ///
    /// The file is materialized through a `.part` rename so an interrupted
    /// commit never leaves a half-written `metadata.txt`.
    pub async fn commit(
        &self,
        slot: &CaseSlot,
        record: &NoticeRecord,
    ) -> std::result::Result<(), StoreError> {
        tokio::fs::create_dir_all(&slot.dir)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: slot.dir.clone(),
                source,
            })?;

        let final_path = slot.dir.join(METADATA_FILENAME);
        let part_path = slot.dir.join(format!("{METADATA_FILENAME}.part"));

        let rendered = render_metadata(record);
        tokio::fs::write(&part_path, rendered.as_bytes())
            .await
            .map_err(|source| StoreError::WriteMetadata {
                path: part_path.clone(),
                source,
            })?;
        tokio::fs::rename(&part_path, &final_path)
            .await
            .map_err(|source| StoreError::WriteMetadata {
                path: final_path.clone(),
                source,
            })?;

        tracing::debug!(case = %slot.id, path = %final_path.display(), "Committed case metadata");
        Ok(())
    }
}

/// Render the metadata artifact
///
/// Every label is always present; missing values become [`MISSING_FIELD`].
/// Dates in the source's "day Month year" form are normalized to ISO,
/// anything else is kept verbatim.
fn render_metadata(record: &NoticeRecord) -> String {
    let date = record.date.as_deref().map(normalize_date);

    let mut out = String::new();
    push_field(&mut out, "Organisation", record.organisation.as_deref());
    push_field(&mut out, "Date", date.as_deref());
    push_field(&mut out, "Sector", record.sector.as_deref());
    push_field(&mut out, "Decision", record.decision.as_deref());
    push_field(&mut out, "Abstract", record.abstract_text.as_deref());
    push_field(&mut out, "PDF URL", record.attachment_url.as_deref());
    out
}

fn push_field(out: &mut String, label: &str, value: Option<&str>) {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING_FIELD);
    out.push_str(label);
    out.push_str(": ");
    out.push_str(value);
    out.push('\n');
}

fn normalize_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw.trim(), SOURCE_DATE_FORMAT) {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => raw.trim().to_string(),
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> NoticeRecord {
        NoticeRecord {
            organisation: Some("Acme Holdings Ltd".to_string()),
            date: Some("4 March 2024".to_string()),
            sector: Some("Local government".to_string()),
            decision: Some("Enforcement notice".to_string()),
            abstract_text: Some("Failed to respond.".to_string()),
            attachment_url: Some("https://ico.org.uk/media/doc.pdf".to_string()),
        }
    }

    // ------------------------------------------------------------------
    // Allocation
    // ------------------------------------------------------------------

    #[test]
    fn allocate_hands_out_sequential_slots_without_touching_disk() {
        let root = tempfile::tempdir().unwrap();
        let mut store = CaseStore::new(root.path());

        let first = store.allocate();
        let second = store.allocate();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.dir, root.path().join("case-1"));
        assert_eq!(second.dir, root.path().join("case-2"));
        assert!(!first.dir.exists(), "allocation alone creates nothing");
    }

    // ------------------------------------------------------------------
    // Commit
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn commit_writes_the_full_metadata_artifact() {
        let root = tempfile::tempdir().unwrap();
        let mut store = CaseStore::new(root.path());
        let slot = store.allocate();

        store.commit(&slot, &full_record()).await.unwrap();

        let content = std::fs::read_to_string(slot.dir.join(METADATA_FILENAME)).unwrap();
        assert_eq!(
            content,
            "Organisation: Acme Holdings Ltd\n\
             Date: 2024-03-04\n\
             Sector: Local government\n\
             Decision: Enforcement notice\n\
             Abstract: Failed to respond.\n\
             PDF URL: https://ico.org.uk/media/doc.pdf\n"
        );
        assert!(
            !slot.dir.join("metadata.txt.part").exists(),
            "the temporary file must be renamed away"
        );
    }

    #[tokio::test]
    async fn commit_renders_missing_fields_as_placeholder() {
        let root = tempfile::tempdir().unwrap();
        let mut store = CaseStore::new(root.path());
        let slot = store.allocate();

        let record = NoticeRecord {
            attachment_url: Some("https://ico.org.uk/media/doc.pdf".to_string()),
            ..NoticeRecord::default()
        };
        store.commit(&slot, &record).await.unwrap();

        let content = std::fs::read_to_string(slot.dir.join(METADATA_FILENAME)).unwrap();
        assert_eq!(
            content,
            "Organisation: N/A\n\
             Date: N/A\n\
             Sector: N/A\n\
             Decision: N/A\n\
             Abstract: N/A\n\
             PDF URL: https://ico.org.uk/media/doc.pdf\n"
        );
    }

    #[tokio::test]
    async fn commit_keeps_unparseable_dates_verbatim() {
        let root = tempfile::tempdir().unwrap();
        let mut store = CaseStore::new(root.path());
        let slot = store.allocate();

        let record = NoticeRecord {
            date: Some("Spring 2024".to_string()),
            ..full_record()
        };
        store.commit(&slot, &record).await.unwrap();

        let content = std::fs::read_to_string(slot.dir.join(METADATA_FILENAME)).unwrap();
        assert!(
            content.contains("Date: Spring 2024\n"),
            "unparseable dates pass through untouched: {content}"
        );
    }

    // ------------------------------------------------------------------
    // Discard
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn discard_reuses_the_case_number() {
        let root = tempfile::tempdir().unwrap();
        let mut store = CaseStore::new(root.path());

        let slot = store.allocate();
        assert_eq!(slot.id, 1);
        store.discard(slot).await.unwrap();

        let replacement = store.allocate();
        assert_eq!(replacement.id, 1, "a discarded number is handed out again");
    }

    #[tokio::test]
    async fn discard_removes_partial_artifacts() {
        let root = tempfile::tempdir().unwrap();
        let mut store = CaseStore::new(root.path());
        let slot = store.allocate();

        std::fs::create_dir_all(&slot.dir).unwrap();
        std::fs::write(slot.dir.join("document.pdf"), b"partial").unwrap();
        let dir = slot.dir.clone();

        store.discard(slot).await.unwrap();

        assert!(!dir.exists(), "the slot directory is removed wholesale");
    }

    #[tokio::test]
    async fn discard_without_a_directory_succeeds() {
        let root = tempfile::tempdir().unwrap();
        let mut store = CaseStore::new(root.path());
        let slot = store.allocate();

        store.discard(slot).await.unwrap();
    }

    #[tokio::test]
    async fn discard_of_a_stale_slot_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let mut store = CaseStore::new(root.path());

        let stale = store.allocate();
        let _current = store.allocate();

        let err = store.discard(stale).await.unwrap_err();
        assert!(
            matches!(err, StoreError::DiscardOutOfOrder { id: 1 }),
            "expected DiscardOutOfOrder, got {err:?}"
        );

        assert_eq!(
            store.allocate().id,
            3,
            "a rejected discard must not disturb the sequence"
        );
    }

    // ------------------------------------------------------------------
    // Date normalization
    // ------------------------------------------------------------------

    #[test]
    fn source_dates_normalize_to_iso() {
        assert_eq!(normalize_date("4 March 2024"), "2024-03-04");
        assert_eq!(normalize_date("04 March 2024"), "2024-03-04");
        assert_eq!(normalize_date(" 17 September 2019 "), "2019-09-17");
    }

    #[test]
    fn other_date_forms_pass_through() {
        assert_eq!(normalize_date("Spring 2024"), "Spring 2024");
        assert_eq!(normalize_date("2024-03-04"), "2024-03-04");
        assert_eq!(normalize_date("March 2024"), "March 2024");
    }
}
