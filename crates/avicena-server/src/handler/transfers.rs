//! Transfer attachment handlers.
//!
//! Inter-facility transfers carry handover paperwork. Uploads accept
//! exactly one file and only free-form details, and listings are never
//! narrowed by workflow.

use aide::axum::ApiRouter;
use avicena_attach::{AttachmentEngine, Transfer, UploadPayload};
use avicena_postgres::PgClient;
use avicena_postgres::query::AttachmentFilter;
use axum::extract::State;
use axum::http::StatusCode;

use crate::extract::{Actor, Json, Multipart, Path};
use crate::handler::request::{TransferPathParams, UploadForm};
use crate::handler::response::{AttachmentResponse, Attachments, UploadedAttachment};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for transfer attachment operations.
const TRACING_TARGET: &str = "avicena_server::handler::transfers";

/// Uploads a single attachment to a transfer.
///
/// Form data:
/// - `file`: Exactly one file to upload
/// - `details`: Optional free-form details
#[tracing::instrument(skip(engine, multipart), fields(transfer_id = %path_params.transfer_id))]
async fn upload_attachment(
    State(engine): State<AttachmentEngine<PgClient>>,
    Path(path_params): Path<TransferPathParams>,
    actor: Actor,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadedAttachment>)> {
    let form = UploadForm::collect(multipart).await?;

    let mut files = form.files.into_iter();
    let Some(file) = files.next() else {
        return Err(ErrorKind::BadRequest.with_message("Exactly one file is required"));
    };
    if files.next().is_some() {
        return Err(ErrorKind::BadRequest
            .with_message("Exactly one file is required")
            .with_context("This endpoint accepts a single file per request"));
    }

    let payload = UploadPayload {
        filename: file.filename,
        mime_type: file.mime_type,
        content: file.content,
        category: None,
        details: form.details,
        source: None,
        source_id: None,
        created_by: actor.actor_id(),
    };

    let attachment = engine
        .ingest::<Transfer>(path_params.transfer_id, payload)
        .await?;
    let ticket = engine.download_ticket(attachment.id).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        transfer_id = %path_params.transfer_id,
        attachment_id = %attachment.id,
        "transfer attachment uploaded successfully"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadedAttachment::from_parts(attachment, ticket)),
    ))
}

/// Lists live attachments of a transfer.
#[tracing::instrument(skip(engine), fields(transfer_id = %path_params.transfer_id))]
async fn list_attachments(
    State(engine): State<AttachmentEngine<PgClient>>,
    Path(path_params): Path<TransferPathParams>,
) -> Result<(StatusCode, Json<Attachments>)> {
    let attachments = engine
        .list::<Transfer>(path_params.transfer_id, AttachmentFilter::default())
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        transfer_id = %path_params.transfer_id,
        count = attachments.len(),
        "transfer attachments listed successfully"
    );

    Ok((
        StatusCode::OK,
        Json(AttachmentResponse::from_models(attachments)),
    ))
}

/// Returns a [`Router`] with all transfer attachment routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/transfers/{transferId}/attachments",
            post(upload_attachment),
        )
        .api_route("/transfers/{transferId}/attachments", get(list_attachments))
}
