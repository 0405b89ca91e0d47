//! Patient attachment handlers.
//!
//! Patient-level attachments document the person rather than a single
//! visit. Uploads carry exactly one file; longitudinal paperwork does
//! not reference originating orders, so no `sourceId` is accepted.

use aide::axum::ApiRouter;
use avicena_attach::{AttachmentEngine, Patient, UploadPayload};
use avicena_postgres::PgClient;
use axum::extract::State;
use axum::http::StatusCode;

use crate::extract::{Actor, Json, Multipart, Path, Query};
use crate::handler::request::{ListAttachmentsQuery, PatientPathParams, UploadForm};
use crate::handler::response::{AttachmentResponse, Attachments, UploadedAttachment};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for patient attachment operations.
const TRACING_TARGET: &str = "avicena_server::handler::patients";

/// Uploads a single attachment to a patient record.
///
/// Form data:
/// - `file`: Exactly one file to upload
/// - `category`, `details`, `source`: Optional metadata
#[tracing::instrument(skip(engine, multipart), fields(patient_id = %path_params.patient_id))]
async fn upload_attachment(
    State(engine): State<AttachmentEngine<PgClient>>,
    Path(path_params): Path<PatientPathParams>,
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
        category: form.category,
        details: form.details,
        source: form.source,
        source_id: None,
        created_by: actor.actor_id(),
    };

    let attachment = engine
        .ingest::<Patient>(path_params.patient_id, payload)
        .await?;
    let ticket = engine.download_ticket(attachment.id).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        patient_id = %path_params.patient_id,
        attachment_id = %attachment.id,
        "patient attachment uploaded successfully"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadedAttachment::from_parts(attachment, ticket)),
    ))
}

/// Lists live attachments of a patient record.
#[tracing::instrument(skip(engine), fields(patient_id = %path_params.patient_id))]
async fn list_attachments(
    State(engine): State<AttachmentEngine<PgClient>>,
    Path(path_params): Path<PatientPathParams>,
    Query(query): Query<ListAttachmentsQuery>,
) -> Result<(StatusCode, Json<Attachments>)> {
    let attachments = engine
        .list::<Patient>(path_params.patient_id, query.into_filter())
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        patient_id = %path_params.patient_id,
        count = attachments.len(),
        "patient attachments listed successfully"
    );

    Ok((
        StatusCode::OK,
        Json(AttachmentResponse::from_models(attachments)),
    ))
}

/// Returns a [`Router`] with all patient attachment routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/patients/{patientId}/attachments", post(upload_attachment))
        .api_route("/patients/{patientId}/attachments", get(list_attachments))
}
