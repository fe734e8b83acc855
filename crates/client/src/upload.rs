//! File upload collaborator.

use async_trait::async_trait;
use serde::Deserialize;

use lms_forms::PendingFile;

use crate::transport::{HttpTransport, TransportError, read_response};

const UPLOAD_PATH: &str = "/uploads";

/// Where the backend put an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredFile {
    #[serde(alias = "path", alias = "url", alias = "storedPath")]
    pub stored_path: String,
}

#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, file: &PendingFile) -> Result<StoredFile, TransportError>;
}

/// Multipart upload through the authenticated transport.
pub struct HttpUploader<'a> {
    transport: &'a HttpTransport,
}

impl<'a> HttpUploader<'a> {
    pub fn new(transport: &'a HttpTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Uploader for HttpUploader<'_> {
    async fn upload(&self, file: &PendingFile) -> Result<StoredFile, TransportError> {
        let selection = &file.selection;
        let part = reqwest::multipart::Part::bytes(selection.bytes.clone())
            .file_name(selection.file_name.clone())
            .mime_str(&selection.content_type)
            .map_err(|e| TransportError::Parse(format!("invalid content type: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = self.transport.config().url(UPLOAD_PATH);
        let req = self.transport.authorized(self.transport.client().post(&url)).multipart(form);

        tracing::debug!(field = %file.field, file_name = %selection.file_name, "uploading file");
        let resp = req.send().await.map_err(|e| TransportError::Network(e.to_string()))?;
        let value = read_response(resp).await?;
        serde_json::from_value(value).map_err(|e| TransportError::Parse(e.to_string()))
    }
}
