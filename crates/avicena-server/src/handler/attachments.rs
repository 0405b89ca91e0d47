//! Attachment download, annotation and deletion handlers.

use aide::axum::ApiRouter;
use avicena_attach::AttachmentEngine;
use avicena_postgres::PgClient;
use axum::extract::State;
use axum::http::StatusCode;

use crate::extract::{Json, Path, ValidateJson};
use crate::handler::request::{AttachmentPathParams, UpdateAttachmentRequest};
use crate::handler::response::{AttachmentResponse, DownloadLink};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for attachment operations.
const TRACING_TARGET: &str = "avicena_server::handler::attachments";

/// Issues a time-boxed download link for a live attachment.
///
/// The link is presigned against object storage and expires after the
/// interval configured in the upload policy.
#[tracing::instrument(skip(engine), fields(attachment_id = %path_params.attachment_id))]
async fn download_attachment(
    State(engine): State<AttachmentEngine<PgClient>>,
    Path(path_params): Path<AttachmentPathParams>,
) -> Result<(StatusCode, Json<DownloadLink>)> {
    let ticket = engine.download_ticket(path_params.attachment_id).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        attachment_id = %path_params.attachment_id,
        expires_in_secs = ticket.expires_in_secs,
        "download link issued successfully"
    );

    Ok((StatusCode::OK, Json(DownloadLink::from_ticket(ticket))))
}

/// Updates the annotation fields of a live attachment.
#[tracing::instrument(skip(engine), fields(attachment_id = %path_params.attachment_id))]
async fn update_attachment(
    State(engine): State<AttachmentEngine<PgClient>>,
    Path(path_params): Path<AttachmentPathParams>,
    ValidateJson(request): ValidateJson<UpdateAttachmentRequest>,
) -> Result<(StatusCode, Json<AttachmentResponse>)> {
    if request.is_empty() {
        return Err(ErrorKind::BadRequest.with_message("At least one field must be provided"));
    }

    let attachment = engine
        .annotate(path_params.attachment_id, request.into_changes())
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        attachment_id = %attachment.id,
        "attachment annotated successfully"
    );

    Ok((
        StatusCode::OK,
        Json(AttachmentResponse::from_model(attachment)),
    ))
}

/// Soft-deletes an attachment.
///
/// Deleting an already-deleted or unknown attachment still returns
/// `204 No Content`, so retried deletes stay harmless.
#[tracing::instrument(skip(engine), fields(attachment_id = %path_params.attachment_id))]
async fn delete_attachment(
    State(engine): State<AttachmentEngine<PgClient>>,
    Path(path_params): Path<AttachmentPathParams>,
) -> Result<StatusCode> {
    engine.soft_delete(path_params.attachment_id).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        attachment_id = %path_params.attachment_id,
        "attachment delete acknowledged"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Returns a [`Router`] with all attachment-level routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/attachments/{attachmentId}/download",
            get(download_attachment),
        )
        .api_route("/attachments/{attachmentId}", patch(update_attachment))
        .api_route("/attachments/{attachmentId}", delete(delete_attachment))
}
