//! Canned source responses for pipeline E2E tests

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Body bytes served for every test document
pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n% canned decision notice body\n";

/// A notice the mock source serves end to end: one listing entry, one
/// detail page, one document
#[derive(Clone, Debug)]
pub struct FixtureNotice {
    /// Listing title (doubles as the fallback organisation)
    pub title: String,
    /// Detail page path, e.g. `/notices/acme/`
    pub detail_path: String,
    /// Organisation rendered on the detail page
    pub organisation: String,
    /// Source-format date rendered on the detail page
    pub date: String,
    /// Document path, e.g. `/media/acme.pdf`
    pub pdf_path: String,
}

impl FixtureNotice {
    /// Build a notice whose paths derive from `slug`
    pub fn new(slug: &str, organisation: &str) -> Self {
        Self {
            title: organisation.to_string(),
            detail_path: format!("/notices/{slug}/"),
            organisation: organisation.to_string(),
            date: "4 March 2024".to_string(),
            pdf_path: format!("/media/{slug}.pdf"),
        }
    }

    /// Filename the pipeline will store the document under
    pub fn document_name(&self) -> String {
        self.pdf_path
            .rsplit('/')
            .next()
            .unwrap_or("document.pdf")
            .to_string()
    }

    /// Render the detail page markup
    pub fn detail_html(&self) -> String {
        format!(
            r#"<html><body>
                <h1>{title}</h1>
                <dl>
                    <dt>Organisation:</dt><dd>{organisation}</dd>
                    <dt>Date:</dt><dd>{date}</dd>
                    <dt>Sector:</dt><dd>Local government</dd>
                    <dt>Decision:</dt><dd>Enforcement notice</dd>
                    <dt>Abstract:</dt><dd><p>Failed to respond to an information request.</p></dd>
                </dl>
                <further-reading x-href="{pdf}"></further-reading>
            </body></html>"#,
            title = self.title,
            organisation = self.organisation,
            date = self.date,
            pdf = self.pdf_path,
        )
    }
}

/// Mount a listing page serving the given notices
///
/// `total_pages` is omitted from the response when `None`, leaving the
/// empty-page signal as the only terminator.
pub async fn mount_listing_page(
    server: &MockServer,
    page: u32,
    notices: &[FixtureNotice],
    total_pages: Option<u32>,
) {
    let results: Vec<_> = notices
        .iter()
        .map(|notice| {
            serde_json::json!({
                "title": notice.title,
                "url": notice.detail_path,
            })
        })
        .collect();

    let mut body = serde_json::json!({ "results": results });
    if let Some(total) = total_pages {
        body["totalPages"] = serde_json::json!(total);
    }

    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(body_partial_json(serde_json::json!({ "pageNumber": page })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a listing page that must never be requested
pub async fn mount_unreachable_page(server: &MockServer, page: u32) {
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(body_partial_json(serde_json::json!({ "pageNumber": page })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": [] })))
        .expect(0)
        .mount(server)
        .await;
}

/// Mount a notice's detail page and its document
pub async fn mount_notice(server: &MockServer, notice: &FixtureNotice) {
    mount_detail(server, notice).await;
    mount_document(server, notice).await;
}

/// Mount only a notice's detail page
pub async fn mount_detail(server: &MockServer, notice: &FixtureNotice) {
    Mock::given(method("GET"))
        .and(path(notice.detail_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(notice.detail_html()))
        .mount(server)
        .await;
}

/// Mount only a notice's document
pub async fn mount_document(server: &MockServer, notice: &FixtureNotice) {
    Mock::given(method("GET"))
        .and(path(notice.pdf_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PDF_BYTES))
        .mount(server)
        .await;
}

/// Mount a detail page that answers with the given HTTP status
///
/// `expected_requests` pins the number of attempts, verifying the retry
/// policy from the outside.
pub async fn mount_failing_detail(
    server: &MockServer,
    notice: &FixtureNotice,
    status: u16,
    expected_requests: u64,
) {
    Mock::given(method("GET"))
        .and(path(notice.detail_path.as_str()))
        .respond_with(ResponseTemplate::new(status))
        .expect(expected_requests)
        .mount(server)
        .await;
}

/// Mount a document endpoint that answers with the given HTTP status
pub async fn mount_failing_pdf(server: &MockServer, notice: &FixtureNotice, status: u16) {
    Mock::given(method("GET"))
        .and(path(notice.pdf_path.as_str()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
