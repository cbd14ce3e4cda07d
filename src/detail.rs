//! Detail-page fetch and metadata extraction
//!
//! Each listing entry points at an HTML notice page carrying the fields we
//! persist (Organisation, Date, Sector, Decision, Abstract) as definition
//! pairs, plus a reference to the decision document itself. Extraction is
//! tolerant per field — a missing label leaves that field unset — but a page
//! with no resolvable document reference is an error, because a notice
//! without its document is never committed.

use crate::config::SourceConfig;
use crate::error::{DetailError, Error, Result};
use crate::types::{ListingEntry, NoticeRecord};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Precompiled selectors for the markup shapes the extractor recognizes
struct FieldSelectors {
    term: Selector,
    further_reading: Selector,
    anchor: Selector,
    paragraph: Selector,
}

impl FieldSelectors {
    // The selector literals are fixed at compile time and cannot fail to
    // parse.
    #[allow(clippy::expect_used)]
    fn new() -> Self {
        Self {
            term: Selector::parse("dt").expect("static selector"),
            further_reading: Selector::parse("further-reading[x-href]")
                .expect("static selector"),
            anchor: Selector::parse("a[href]").expect("static selector"),
            paragraph: Selector::parse("p").expect("static selector"),
        }
    }
}

/// Fetches notice detail pages and extracts their metadata
pub struct DetailExtractor {
    client: reqwest::Client,
    base: Url,
    document_extension: String,
    selectors: FieldSelectors,
}

impl DetailExtractor {
    /// Build an extractor for the given source configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `base_url` is not a valid URL.
    pub fn new(client: reqwest::Client, source: &SourceConfig) -> Result<Self> {
        let base = Url::parse(&source.base_url).map_err(|e| Error::Config {
            message: format!("invalid base URL '{}': {e}", source.base_url),
            key: Some("base_url".to_string()),
        })?;

        // An empty extension would match every anchor; fall back to the
        // default rather than turn the anchor scan into a wildcard.
        let mut document_extension = source.document_extension.trim().to_ascii_lowercase();
        if document_extension.is_empty() {
            document_extension = ".pdf".to_string();
        } else if !document_extension.starts_with('.') {
            document_extension.insert(0, '.');
        }

        Ok(Self {
            client,
            base,
            document_extension,
            selectors: FieldSelectors::new(),
        })
    }

    /// Fetch the entry's detail page and extract its metadata
    pub async fn extract(
        &self,
        entry: &ListingEntry,
    ) -> std::result::Result<NoticeRecord, DetailError> {
        tracing::debug!(url = %entry.detail_url, "Fetching detail page");

        let response = self
            .client
            .get(&entry.detail_url)
            .send()
            .await
            .map_err(|source| DetailError::Request {
                url: entry.detail_url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DetailError::Status {
                url: entry.detail_url.clone(),
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|source| DetailError::Read {
                url: entry.detail_url.clone(),
                source,
            })?;

        self.extract_from_html(&html, entry)
    }

    /// Extract a notice record from already-fetched page markup
    ///
    /// Field labels are matched case-insensitively with trailing colons
    /// ignored; the absence of any one field never aborts the others. The
    /// entry's listing title stands in for a missing Organisation field.
    pub fn extract_from_html(
        &self,
        html: &str,
        entry: &ListingEntry,
    ) -> std::result::Result<NoticeRecord, DetailError> {
        let document = Html::parse_document(html);

        let attachment_url =
            self.find_attachment(&document)
                .ok_or_else(|| DetailError::MissingAttachment {
                    url: entry.detail_url.clone(),
                })?;

        let mut record = NoticeRecord {
            organisation: self.labelled_value(&document, "Organisation"),
            date: self.labelled_value(&document, "Date"),
            sector: self.labelled_value(&document, "Sector"),
            decision: self.labelled_value(&document, "Decision"),
            abstract_text: self.labelled_value(&document, "Abstract"),
            attachment_url: Some(attachment_url),
        };

        if record.organisation.is_none() && !entry.title.trim().is_empty() {
            record.organisation = Some(entry.title.trim().to_string());
        }

        Ok(record)
    }

    /// Locate the notice's document reference
    ///
    /// Precedence, in document order: the source's `further-reading`
    /// element's `x-href`, then the first anchor whose path ends with the
    /// expected document extension.
    fn find_attachment(&self, document: &Html) -> Option<String> {
        for node in document.select(&self.selectors.further_reading) {
            if let Some(reference) = node.value().attr("x-href")
                && let Some(resolved) = self.resolve(reference)
            {
                return Some(resolved);
            }
        }

        for anchor in document.select(&self.selectors.anchor) {
            if let Some(href) = anchor.value().attr("href")
                && self.matches_extension(href)
                && let Some(resolved) = self.resolve(href)
            {
                return Some(resolved);
            }
        }

        None
    }

    /// Resolve a possibly-relative reference against the base URL
    fn resolve(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        self.base.join(reference).ok().map(|url| url.to_string())
    }

    /// True when the reference's path component ends with the document
    /// extension, ignoring case and any query or fragment
    fn matches_extension(&self, href: &str) -> bool {
        let path = href.split(['?', '#']).next().unwrap_or(href);
        path.to_ascii_lowercase().ends_with(&self.document_extension)
    }

    /// Text of the `<dd>` paired with the first `<dt>` matching `label`
    ///
    /// Returns `None` when the label is absent, the `<dt>` has no `<dd>`
    /// before the next term, or the value is blank.
    fn labelled_value(&self, document: &Html, label: &str) -> Option<String> {
        for term in document.select(&self.selectors.term) {
            let term_text: String = term.text().collect();
            if !label_matches(&term_text, label) {
                continue;
            }

            for sibling in term.next_siblings() {
                let Some(element) = ElementRef::wrap(sibling) else {
                    // whitespace and comment nodes sit between dt and dd
                    continue;
                };
                if element.value().name() != "dd" {
                    break;
                }
                let value = self.definition_text(&element);
                if value.is_empty() {
                    return None;
                }
                return Some(value);
            }

            return None;
        }

        None
    }

    /// Render a `<dd>`'s content, joining multiple paragraphs with a blank
    /// line
    fn definition_text(&self, element: &ElementRef<'_>) -> String {
        let paragraphs: Vec<String> = element
            .select(&self.selectors.paragraph)
            .map(|paragraph| normalize_whitespace(&paragraph.text().collect::<String>()))
            .filter(|text| !text.is_empty())
            .collect();

        if paragraphs.is_empty() {
            normalize_whitespace(&element.text().collect::<String>())
        } else {
            paragraphs.join("\n\n")
        }
    }
}

/// Collapse runs of whitespace (including newlines from markup indentation)
/// into single spaces
fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compare a `<dt>`'s text against a field label, ignoring case, trailing
/// colons, and surrounding whitespace
fn label_matches(candidate: &str, label: &str) -> bool {
    candidate
        .trim()
        .trim_end_matches(':')
        .trim()
        .eq_ignore_ascii_case(label)
}
