//! Multipart upload form parsing.

use std::str::FromStr;

use avicena_postgres::types::AttachmentSource;
use bytes::Bytes;
use uuid::Uuid;

use crate::extract::Multipart;
use crate::handler::{ErrorKind, Result};

/// Tracing target for multipart form parsing.
const TRACING_TARGET: &str = "avicena_server::handler::uploads";

/// A single file read out of a multipart request.
#[must_use]
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied filename.
    pub filename: String,
    /// Declared MIME type, defaulting to `application/octet-stream`.
    pub mime_type: String,
    /// Raw content bytes.
    pub content: Bytes,
}

/// Files and shared metadata collected from a multipart upload form.
///
/// Metadata fields apply to every file in the form. Which of them a
/// resource actually accepts is decided by the individual handlers.
#[must_use]
#[derive(Debug, Default)]
pub struct UploadForm {
    /// Files carried by the form, in submission order.
    pub files: Vec<UploadedFile>,
    /// Optional clinical category label.
    pub category: Option<String>,
    /// Optional free-form details.
    pub details: Option<String>,
    /// Hospital workflow the upload originated from.
    pub source: Option<AttachmentSource>,
    /// Identifier of the originating order or document.
    pub source_id: Option<Uuid>,
}

impl UploadForm {
    /// Reads every field of the multipart request into memory.
    ///
    /// Fields carrying a filename become [`UploadedFile`]s, the known
    /// metadata fields are parsed, and anything else is skipped.
    pub async fn collect(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|err| {
            tracing::error!(target: TRACING_TARGET, error = %err, "failed to read multipart field");
            ErrorKind::BadRequest
                .with_message("Invalid multipart data")
                .with_context(format!("Failed to parse multipart form: {err}"))
        })? {
            if let Some(filename) = field.file_name() {
                let filename = filename.to_owned();
                let mime_type = field
                    .content_type()
                    .map(str::to_owned)
                    .unwrap_or_else(|| "application/octet-stream".to_owned());

                let content = field.bytes().await.map_err(|err| {
                    tracing::error!(
                        target: TRACING_TARGET,
                        error = %err,
                        filename = %filename,
                        "failed to read file content"
                    );
                    ErrorKind::BadRequest
                        .with_message("Failed to read file data")
                        .with_context(format!("Could not read file '{filename}': {err}"))
                })?;

                form.files.push(UploadedFile {
                    filename,
                    mime_type,
                    content,
                });
                continue;
            }

            match field.name() {
                Some("category") => form.category = normalized(read_text(field).await?),
                Some("details") => form.details = normalized(read_text(field).await?),
                Some("source") => {
                    let value = read_text(field).await?;
                    form.source = Some(AttachmentSource::from_str(value.trim()).map_err(|_| {
                        ErrorKind::BadRequest
                            .with_message("Unknown attachment source")
                            .with_context(format!(
                                "'{value}' is not a recognized source workflow"
                            ))
                    })?);
                }
                Some("sourceId") => {
                    let value = read_text(field).await?;
                    form.source_id = Some(Uuid::parse_str(value.trim()).map_err(|_| {
                        ErrorKind::BadRequest
                            .with_message("Invalid source id")
                            .with_context("The 'sourceId' field must contain a valid UUID")
                    })?);
                }
                other => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        field = other.unwrap_or("<unnamed>"),
                        "skipping unknown form field"
                    );
                }
            }
        }

        Ok(form)
    }
}

/// Reads a text field, rejecting payloads that are not valid UTF-8.
async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    let name = field.name().unwrap_or("<unnamed>").to_owned();
    field.text().await.map_err(|err| {
        ErrorKind::BadRequest
            .with_message("Invalid multipart data")
            .with_context(format!("Could not read field '{name}': {err}"))
    })
}

/// Maps blank strings to `None`, trimming surrounding whitespace.
fn normalized(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blank_metadata_normalizes_to_none() {
        assert_eq!(normalized(String::new()), None);
        assert_eq!(normalized("   ".to_owned()), None);
        assert_eq!(normalized(" scan ".to_owned()), Some("scan".to_owned()));
    }

    #[test]
    fn source_names_parse_case_sensitively() {
        assert!(AttachmentSource::from_str("lab_order").is_ok());
        assert!(AttachmentSource::from_str("LAB_ORDER").is_err());
    }
}
