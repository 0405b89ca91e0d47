//! Attachment response types.

use avicena_attach::DownloadTicket;
use avicena_postgres::model::Attachment;
use avicena_postgres::types::AttachmentSource;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored attachment metadata.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentResponse {
    /// Unique attachment identifier.
    pub id: Uuid,
    /// Sanitized filename presented on download.
    pub filename: String,
    /// Declared MIME type of the content.
    pub mime_type: String,
    /// Size of the stored object in bytes.
    pub size_bytes: i64,
    /// Clinical category label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-form details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Hospital workflow the attachment originated from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<AttachmentSource>,
    /// Identifier of the originating order or document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<Uuid>,
    /// Identifier of the uploading actor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Last update timestamp.
    pub updated_at: Timestamp,
}

impl AttachmentResponse {
    /// Creates a response from a database model.
    pub fn from_model(attachment: Attachment) -> Self {
        Self {
            id: attachment.id,
            filename: attachment.filename,
            mime_type: attachment.mime_type,
            size_bytes: attachment.size_bytes,
            category: attachment.category,
            details: attachment.details,
            source: attachment.source,
            source_id: attachment.source_id,
            created_by: attachment.created_by,
            created_at: attachment.created_at.into(),
            updated_at: attachment.updated_at.into(),
        }
    }

    /// Creates a list of responses from database models.
    pub fn from_models(models: Vec<Attachment>) -> Vec<Self> {
        models.into_iter().map(Self::from_model).collect()
    }
}

/// Response for attachment listings.
pub type Attachments = Vec<AttachmentResponse>;

/// A freshly stored attachment together with its first download link.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAttachment {
    /// Stored attachment metadata.
    #[serde(flatten)]
    pub attachment: AttachmentResponse,
    /// Presigned URL granting read access to the stored object.
    pub download_url: String,
    /// Seconds until the download URL expires.
    pub expires_in_seconds: i64,
}

impl UploadedAttachment {
    /// Combines a stored attachment with its download ticket.
    pub fn from_parts(attachment: Attachment, ticket: DownloadTicket) -> Self {
        Self {
            attachment: AttachmentResponse::from_model(attachment),
            download_url: ticket.url,
            expires_in_seconds: ticket.expires_in_secs,
        }
    }
}

/// A time-boxed link for downloading an attachment.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    /// Presigned URL granting read access to the stored object.
    pub url: String,
    /// Seconds until the URL expires.
    pub expires_in_seconds: i64,
}

impl DownloadLink {
    /// Creates a response from a download ticket.
    pub fn from_ticket(ticket: DownloadTicket) -> Self {
        Self {
            url: ticket.url,
            expires_in_seconds: ticket.expires_in_secs,
        }
    }
}
