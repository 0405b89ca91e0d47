//! Object-safe persistence seam between the engine and the database.

use avicena_postgres::model::{Attachment, NewAttachment, UpdateAttachment};
use avicena_postgres::query::{AttachmentFilter, AttachmentRepository};
use avicena_postgres::types::OwnerKind;
use avicena_postgres::{PgClient, PgResult};
use uuid::Uuid;

/// Persistence operations the attachment engine needs.
///
/// The engine is generic over this trait, so tests run against an in-memory
/// implementation while the service wires in [`PgClient`].
#[async_trait::async_trait]
pub trait MetadataStore: Send + Sync {
    /// Inserts a new attachment record and returns it.
    async fn create(&self, new_attachment: NewAttachment) -> PgResult<Attachment>;

    /// Finds an attachment by id, including soft-deleted ones.
    async fn find(&self, attachment_id: Uuid) -> PgResult<Option<Attachment>>;

    /// Finds an attachment by id, excluding soft-deleted ones.
    async fn find_live(&self, attachment_id: Uuid) -> PgResult<Option<Attachment>>;

    /// Lists live attachments of one owner, newest first.
    async fn list_live(
        &self,
        owner_kind: OwnerKind,
        owner_id: Uuid,
        filter: AttachmentFilter,
    ) -> PgResult<Vec<Attachment>>;

    /// Applies an annotation change set to a live attachment.
    async fn update_live(
        &self,
        attachment_id: Uuid,
        updates: UpdateAttachment,
    ) -> PgResult<Option<Attachment>>;

    /// Marks a live attachment as deleted, returning the affected row count.
    async fn mark_deleted(&self, attachment_id: Uuid) -> PgResult<usize>;
}

#[async_trait::async_trait]
impl MetadataStore for PgClient {
    async fn create(&self, new_attachment: NewAttachment) -> PgResult<Attachment> {
        let mut conn = self.get_connection().await?;
        conn.create_attachment(new_attachment).await
    }

    async fn find(&self, attachment_id: Uuid) -> PgResult<Option<Attachment>> {
        let mut conn = self.get_connection().await?;
        conn.find_attachment_by_id(attachment_id).await
    }

    async fn find_live(&self, attachment_id: Uuid) -> PgResult<Option<Attachment>> {
        let mut conn = self.get_connection().await?;
        conn.find_live_attachment_by_id(attachment_id).await
    }

    async fn list_live(
        &self,
        owner_kind: OwnerKind,
        owner_id: Uuid,
        filter: AttachmentFilter,
    ) -> PgResult<Vec<Attachment>> {
        let mut conn = self.get_connection().await?;
        conn.list_live_attachments(owner_kind, owner_id, filter).await
    }

    async fn update_live(
        &self,
        attachment_id: Uuid,
        updates: UpdateAttachment,
    ) -> PgResult<Option<Attachment>> {
        let mut conn = self.get_connection().await?;
        conn.update_live_attachment(attachment_id, updates).await
    }

    async fn mark_deleted(&self, attachment_id: Uuid) -> PgResult<usize> {
        let mut conn = self.get_connection().await?;
        conn.mark_attachment_deleted(attachment_id).await
    }
}
