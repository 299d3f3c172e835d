use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::DriveConfig;
use crate::errors::{AppError, Result};
use crate::models::DocumentHandle;

const PDF_MIME_TYPE: &str = "application/pdf";

/// Client for the Google Drive v3 REST surface.
///
/// Constructed once at startup and shared across requests; it holds no
/// mutable state after construction. Document bytes are accumulated in
/// memory only, never written to disk.
#[derive(Clone)]
pub struct DriveClient {
    http_client: Client,
    api_base: String,
    access_token: String,
    timeout: Duration,
}

impl DriveClient {
    pub fn new(config: &DriveConfig, timeout: Duration) -> Self {
        Self {
            http_client: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            timeout,
        }
    }

    /// List the PDF documents directly inside a container, in the order the
    /// repository returns them. Pagination is followed until exhausted; an
    /// empty container yields an empty vector, not an error.
    #[instrument(skip(self))]
    pub async fn list_pdfs(&self, container_id: &str) -> Result<Vec<DocumentHandle>> {
        let url = format!("{}/files", self.api_base);
        let query = list_query(container_id);

        let mut handles = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http_client
                .get(&url)
                .bearer_auth(&self.access_token)
                .timeout(self.timeout)
                .query(&[
                    ("q", query.as_str()),
                    ("fields", "nextPageToken, files(id, name, mimeType)"),
                    ("pageSize", "100"),
                ]);

            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    AppError::Transfer(format!("Listing folder {} timed out: {}", container_id, e))
                } else {
                    AppError::Transfer(format!("Failed to list folder {}: {}", container_id, e))
                }
            })?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(AppError::NotFound(format!(
                    "Folder {} does not exist",
                    container_id
                )));
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::Transfer(format!(
                    "Listing folder {} failed with status {}: {}",
                    container_id, status, body
                )));
            }

            let page: FileList = response.json().await.map_err(|e| {
                AppError::Transfer(format!(
                    "Failed to parse listing for folder {}: {}",
                    container_id, e
                ))
            })?;

            handles.extend(page.files.into_iter().map(|file| DocumentHandle {
                id: file.id,
                name: file.name,
                mime_type: file.mime_type,
            }));

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
            debug!(container_id = %container_id, "Following listing pagination");
        }

        info!(
            container_id = %container_id,
            documents = handles.len(),
            "Listed PDF documents"
        );

        Ok(handles)
    }

    /// Download a document's complete content.
    ///
    /// The repository may deliver the body in many chunks; the loop reads
    /// until the stream signals completion and tolerates zero-byte chunks.
    /// Not retried on failure; the orchestrator owns that policy.
    #[instrument(skip(self))]
    pub async fn fetch(&self, document_id: &str) -> Result<Vec<u8>> {
        let url = format!("{}/files/{}", self.api_base, document_id);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .timeout(self.timeout)
            .query(&[("alt", "media")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Transfer(format!("Fetching document {} timed out: {}", document_id, e))
                } else {
                    AppError::Transfer(format!("Failed to fetch document {}: {}", document_id, e))
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "Document {} does not exist",
                document_id
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Transfer(format!(
                "Fetching document {} failed with status {}: {}",
                document_id, status, body
            )));
        }

        let mut response = response;
        let mut buffer: Vec<u8> = Vec::new();
        loop {
            match response.chunk().await {
                // An empty chunk is not end-of-stream; keep reading.
                Ok(Some(chunk)) => buffer.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) => {
                    warn!(
                        document_id = %document_id,
                        bytes_so_far = buffer.len(),
                        "Transfer interrupted mid-download"
                    );
                    return Err(AppError::Transfer(format!(
                        "Connection interrupted while fetching document {}: {}",
                        document_id, e
                    )));
                }
            }
        }

        info!(
            document_id = %document_id,
            size_bytes = buffer.len(),
            "Downloaded document"
        );

        Ok(buffer)
    }
}

#[async_trait::async_trait]
impl crate::pipeline::DocumentRepository for DriveClient {
    async fn list_pdfs(&self, container_id: &str) -> Result<Vec<DocumentHandle>> {
        DriveClient::list_pdfs(self, container_id).await
    }

    async fn fetch(&self, document_id: &str) -> Result<Vec<u8>> {
        DriveClient::fetch(self, document_id).await
    }
}

/// Drive search query selecting the PDF children of a folder.
fn list_query(container_id: &str) -> String {
    format!(
        "'{}' in parents and mimeType='{}' and trashed=false",
        container_id, PDF_MIME_TYPE
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: Option<String>,
    mime_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_filters_pdf_children() {
        let q = list_query("folder-1");
        assert!(q.contains("'folder-1' in parents"));
        assert!(q.contains("mimeType='application/pdf'"));
        assert!(q.contains("trashed=false"));
    }

    #[test]
    fn test_file_list_tolerates_missing_fields() {
        let page: FileList = serde_json::from_str(r#"{"files": [{"id": "a"}]}"#).unwrap();
        assert_eq!(page.files.len(), 1);
        assert_eq!(page.files[0].id, "a");
        assert!(page.files[0].name.is_none());
        assert!(page.next_page_token.is_none());
    }
}
