//! Utility functions for deriving attachment filenames

use crate::store::METADATA_FILENAME;

/// Filename used when nothing usable can be derived from the response
pub const DEFAULT_DOCUMENT_NAME: &str = "document.pdf";

/// Derive the on-disk filename for a downloaded attachment
///
/// Tries the response's Content-Disposition header first, then the last
/// path segment of the URL. Every candidate is sanitized down to a plain
/// filename; anything that would collide with the per-case metadata
/// artifact or that sanitizes to nothing falls back to
/// [`DEFAULT_DOCUMENT_NAME`].
///
/// # Arguments
///
/// * `response` - The reqwest Response object
/// * `url` - The original URL (used as fallback)
///
/// # Examples
///
/// ```ignore
/// let response = client.get("https://example.com/media/notice.pdf").send().await?;
/// let filename = attachment_filename(&response, "https://example.com/media/notice.pdf");
/// // Returns "notice.pdf"
/// ```
pub fn attachment_filename(response: &reqwest::Response, url: &str) -> String {
    let candidate = filename_from_content_disposition(response).or_else(|| filename_from_url(url));

    match candidate {
        Some(name) if !name.eq_ignore_ascii_case(METADATA_FILENAME) => name,
        _ => DEFAULT_DOCUMENT_NAME.to_string(),
    }
}

/// Extract a filename from the Content-Disposition header, if present
///
/// Handles both the plain `filename="..."` parameter and the RFC 5987
/// `filename*=charset''percent-encoded` form.
fn filename_from_content_disposition(response: &reqwest::Response) -> Option<String> {
    let value = response
        .headers()
        .get("content-disposition")?
        .to_str()
        .ok()?;

    for part in value.split(';') {
        let part = part.trim();
        if let Some(raw) = part.strip_prefix("filename=") {
            if let Some(name) = sanitize_filename(raw.trim_matches('"')) {
                return Some(name);
            }
        } else if let Some(raw) = part.strip_prefix("filename*=") {
            // Format is: charset'lang'encoded-filename
            if let Some(idx) = raw.rfind('\'')
                && let Ok(decoded) = urlencoding::decode(&raw[idx + 1..])
                && let Some(name) = sanitize_filename(&decoded)
            {
                return Some(name);
            }
        }
    }

    None
}

/// Extract a filename from the last path segment of a URL
fn filename_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    if last.is_empty() {
        return None;
    }
    sanitize_filename(last)
}

/// Reduce a raw candidate to a bare filename safe to join under a case
/// directory
///
/// Keeps only the final path component (headers are attacker-controlled),
/// drops control characters, and trims surrounding whitespace and dots.
/// Returns None when nothing survives.
fn sanitize_filename(raw: &str) -> Option<String> {
    let name = raw.trim();
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = name.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim().trim_matches('.').trim();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
