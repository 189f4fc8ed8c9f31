use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ServerConfig;

/// An assembled recording ready to be posted
#[derive(Debug, Clone)]
pub struct Recording {
    /// Multipart field name
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A document to post as the recording prerequisite
#[derive(Debug, Clone)]
pub struct BookFile {
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl BookFile {
    /// Read a document from disk
    pub async fn open(path: impl AsRef<Path>, field_name: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read book: {}", path.display()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "book".to_string());

        Ok(Self {
            field_name: field_name.into(),
            content_type: content_type_for(path).to_string(),
            file_name,
            bytes,
        })
    }
}

/// Guess a content type from the file extension
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}

/// Remote endpoint accepting multipart submissions
///
/// Both calls return the raw response body of a 2xx reply; any other status
/// is an error.
#[async_trait::async_trait]
pub trait UploadService: Send + Sync {
    async fn upload_recording(&self, recording: Recording) -> Result<String>;

    async fn upload_book(&self, book: BookFile) -> Result<String>;
}

pub struct HttpUploadClient {
    client: Client,
    upload_url: String,
    book_upload_url: String,
}

impl HttpUploadClient {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let base = config.base_url.trim_end_matches('/');
        let upload_url = format!("{}{}", base, config.upload_path);
        let book_upload_url = format!("{}{}", base, config.book_upload_path);

        info!("Upload endpoints: {} and {}", upload_url, book_upload_url);

        Ok(Self {
            client,
            upload_url,
            book_upload_url,
        })
    }

    async fn post_file(
        &self,
        url: &str,
        field_name: String,
        file_name: String,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String> {
        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(content_type)
            .with_context(|| format!("Invalid content type: {}", content_type))?;

        let form = Form::new().part(field_name, part);

        debug!("POST {} ({} bytes as {})", url, size, file_name);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            anyhow::bail!("Upload to {} failed with HTTP {}: {}", url, status, body);
        }

        info!("Uploaded {} to {} (HTTP {})", file_name, url, status);

        Ok(body)
    }
}

#[async_trait::async_trait]
impl UploadService for HttpUploadClient {
    async fn upload_recording(&self, recording: Recording) -> Result<String> {
        self.post_file(
            &self.upload_url,
            recording.field_name,
            recording.file_name,
            &recording.content_type,
            recording.bytes,
        )
        .await
    }

    async fn upload_book(&self, book: BookFile) -> Result<String> {
        self.post_file(
            &self.book_upload_url,
            book.field_name,
            book.file_name,
            &book.content_type,
            book.bytes,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for(Path::new("notes.TXT")), "text/plain");
        assert_eq!(content_type_for(Path::new("book.pdf")), "application/pdf");
        assert_eq!(content_type_for(Path::new("a.wav")), "audio/wav");
        assert_eq!(content_type_for(Path::new("archive")), "application/octet-stream");
    }
}
