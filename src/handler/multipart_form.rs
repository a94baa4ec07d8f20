use axum::extract::Multipart;
use std::collections::HashMap;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::dto::upload_dto::UploadedFile;
use crate::util::error::HandlerError;

/// A parsed multipart form: text fields in memory, file parts spooled to temp files
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

fn bad_body(err: impl std::fmt::Display) -> HandlerError {
    error!("Failed to read multipart body: {}", err);
    HandlerError::bad_request("Invalid multipart body")
}

impl MultipartForm {
    pub async fn parse(mut multipart: Multipart) -> Result<Self, HandlerError> {
        let mut form = MultipartForm::default();

        while let Some(mut field) = multipart.next_field().await.map_err(bad_body)? {
            let name = field.name().map(|s| s.to_string()).unwrap_or_default();

            let Some(file_name) = field.file_name().map(|s| s.to_string()) else {
                let value = field.text().await.map_err(bad_body)?;
                form.fields.insert(name, value);
                continue;
            };

            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let temp = NamedTempFile::new().map_err(|e| HandlerError::internal("Failed to create temp file", e))?;
            let std_file = temp.reopen().map_err(|e| HandlerError::internal("Failed to open temp file", e))?;
            let mut out = tokio::fs::File::from_std(std_file);

            let mut size: u64 = 0;
            while let Some(chunk) = field.chunk().await.map_err(bad_body)? {
                size += chunk.len() as u64;
                out.write_all(&chunk)
                    .await
                    .map_err(|e| HandlerError::internal("Failed to spool upload", e))?;
            }
            out.flush().await.map_err(|e| HandlerError::internal("Failed to spool upload", e))?;

            debug!("Spooled file field '{}' ({} bytes)", name, size);
            form.files.insert(name, UploadedFile { file_name, content_type, size, temp });
        }

        Ok(form)
    }

    /// Text field value, `None` when absent or blank
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}
