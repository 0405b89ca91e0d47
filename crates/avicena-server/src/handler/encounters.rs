//! Encounter attachment handlers.
//!
//! Encounters are the richest owner: uploads may carry several files at
//! once together with shared workflow metadata, and listings can be
//! narrowed by source workflow or originating record.

use aide::axum::ApiRouter;
use avicena_attach::{AttachmentEngine, Encounter, UploadPayload};
use avicena_postgres::PgClient;
use axum::extract::State;
use axum::http::StatusCode;

use crate::extract::{Actor, Json, Multipart, Path, Query};
use crate::handler::request::{EncounterPathParams, ListAttachmentsQuery, UploadForm};
use crate::handler::response::{AttachmentResponse, Attachments, UploadedAttachment};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for encounter attachment operations.
const TRACING_TARGET: &str = "avicena_server::handler::encounters";

/// Uploads one or more attachments to an encounter.
///
/// Form data:
/// - `file`: One or more files to upload
/// - `category`, `details`, `source`, `sourceId`: Metadata applied to every file
#[tracing::instrument(skip(engine, multipart), fields(encounter_id = %path_params.encounter_id))]
async fn upload_attachments(
    State(engine): State<AttachmentEngine<PgClient>>,
    Path(path_params): Path<EncounterPathParams>,
    actor: Actor,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<UploadedAttachment>>)> {
    let form = UploadForm::collect(multipart).await?;

    if form.files.is_empty() {
        return Err(ErrorKind::BadRequest.with_message("At least one file is required"));
    }

    let mut uploaded = Vec::with_capacity(form.files.len());

    for file in form.files {
        let payload = UploadPayload {
            filename: file.filename,
            mime_type: file.mime_type,
            content: file.content,
            category: form.category.clone(),
            details: form.details.clone(),
            source: form.source,
            source_id: form.source_id,
            created_by: actor.actor_id(),
        };

        let attachment = engine
            .ingest::<Encounter>(path_params.encounter_id, payload)
            .await?;
        let ticket = engine.download_ticket(attachment.id).await?;

        uploaded.push(UploadedAttachment::from_parts(attachment, ticket));
    }

    tracing::debug!(
        target: TRACING_TARGET,
        encounter_id = %path_params.encounter_id,
        count = uploaded.len(),
        "encounter attachments uploaded successfully"
    );

    Ok((StatusCode::CREATED, Json(uploaded)))
}

/// Lists live attachments of an encounter.
#[tracing::instrument(skip(engine), fields(encounter_id = %path_params.encounter_id))]
async fn list_attachments(
    State(engine): State<AttachmentEngine<PgClient>>,
    Path(path_params): Path<EncounterPathParams>,
    Query(query): Query<ListAttachmentsQuery>,
) -> Result<(StatusCode, Json<Attachments>)> {
    let attachments = engine
        .list::<Encounter>(path_params.encounter_id, query.into_filter())
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        encounter_id = %path_params.encounter_id,
        count = attachments.len(),
        "encounter attachments listed successfully"
    );

    Ok((
        StatusCode::OK,
        Json(AttachmentResponse::from_models(attachments)),
    ))
}

/// Returns a [`Router`] with all encounter attachment routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/encounters/{encounterId}/attachments",
            post(upload_attachments),
        )
        .api_route(
            "/encounters/{encounterId}/attachments",
            get(list_attachments),
        )
}
