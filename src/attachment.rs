//! Streaming document download with atomic materialization
//!
//! Attachments are written chunk-by-chunk to a `.part` file and renamed
//! into place only after the stream completes, so a case directory never
//! holds a partial document. On any failure the `.part` file is removed
//! before the error is returned.

use crate::error::AttachmentError;
use crate::utils;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Suffix carried by in-flight downloads until the rename seals them
const PART_SUFFIX: &str = ".part";

/// A document that has been fully written and renamed into place
#[derive(Clone, Debug)]
pub struct DownloadedAttachment {
    /// Final path of the document
    pub path: PathBuf,
    /// Total bytes written
    pub bytes: u64,
}

/// Streams notice documents into case directories
pub struct AttachmentDownloader {
    client: reqwest::Client,
}

impl AttachmentDownloader {
    /// Build a downloader sharing the pipeline's HTTP client
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Download `url` into `dest_dir`
    ///
    /// The filename is taken from the response (Content-Disposition, then
    /// the URL path, then a fixed default). Nothing is written until the
    /// response status has been verified.
    pub async fn download(
        &self,
        url: &str,
        dest_dir: &Path,
    ) -> std::result::Result<DownloadedAttachment, AttachmentError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| AttachmentError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttachmentError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let filename = utils::attachment_filename(&response, url);
        let final_path = dest_dir.join(&filename);
        let part_path = dest_dir.join(format!("{filename}{PART_SUFFIX}"));

        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|source| AttachmentError::Write {
                path: dest_dir.to_path_buf(),
                source,
            })?;

        tracing::debug!(url = %url, path = %final_path.display(), "Streaming attachment");

        let result = self.materialize(response, url, &part_path, &final_path).await;
        if result.is_err() {
            // Nothing partial may survive a failed download. The download
            // error is what gets returned; cleanup trouble is only logged.
            match tokio::fs::remove_file(&part_path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(
                        path = %part_path.display(),
                        error = %e,
                        "Failed to remove partial download"
                    );
                }
            }
        }
        result
    }

    async fn materialize(
        &self,
        response: reqwest::Response,
        url: &str,
        part_path: &Path,
        final_path: &Path,
    ) -> std::result::Result<DownloadedAttachment, AttachmentError> {
        let mut file = File::create(part_path)
            .await
            .map_err(|source| AttachmentError::Write {
                path: part_path.to_path_buf(),
                source,
            })?;

        let mut stream = response.bytes_stream();
        let mut bytes: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| AttachmentError::Stream {
                url: url.to_string(),
                source,
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|source| AttachmentError::Write {
                    path: part_path.to_path_buf(),
                    source,
                })?;
            bytes += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|source| AttachmentError::Write {
                path: part_path.to_path_buf(),
                source,
            })?;
        drop(file);

        tokio::fs::rename(part_path, final_path)
            .await
            .map_err(|source| AttachmentError::Write {
                path: final_path.to_path_buf(),
                source,
            })?;

        Ok(DownloadedAttachment {
            path: final_path.to_path_buf(),
            bytes,
        })
    }
}
