//! Attachment repository for managing uploaded clinical files.

use std::future::Future;

use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{Attachment, NewAttachment, UpdateAttachment};
use crate::types::{AttachmentSource, OwnerKind};
use crate::{PgConnection, PgError, PgResult, schema};

/// Optional narrowing applied to attachment listings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentFilter {
    /// Keep only attachments from this workflow.
    pub source: Option<AttachmentSource>,
    /// Keep only attachments referencing this originating record.
    pub source_id: Option<Uuid>,
}

impl AttachmentFilter {
    /// Returns `true` if the filter does not narrow the listing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.source_id.is_none()
    }
}

/// Queries over the `attachments` table.
pub trait AttachmentRepository {
    /// Inserts a new attachment record and returns it.
    fn create_attachment(
        &mut self,
        new_attachment: NewAttachment,
    ) -> impl Future<Output = PgResult<Attachment>> + Send;

    /// Finds an attachment by id, including soft-deleted ones.
    fn find_attachment_by_id(
        &mut self,
        attachment_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Attachment>>> + Send;

    /// Finds an attachment by id, excluding soft-deleted ones.
    fn find_live_attachment_by_id(
        &mut self,
        attachment_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Attachment>>> + Send;

    /// Lists live attachments of one owner, newest first.
    fn list_live_attachments(
        &mut self,
        owner_kind: OwnerKind,
        owner_id: Uuid,
        filter: AttachmentFilter,
    ) -> impl Future<Output = PgResult<Vec<Attachment>>> + Send;

    /// Applies an annotation change set to a live attachment.
    ///
    /// Returns `None` if the attachment does not exist or is deleted. The
    /// change set must contain at least one field.
    fn update_live_attachment(
        &mut self,
        attachment_id: Uuid,
        updates: UpdateAttachment,
    ) -> impl Future<Output = PgResult<Option<Attachment>>> + Send;

    /// Marks a live attachment as deleted and returns the affected row count.
    ///
    /// Already-deleted and unknown attachments are left untouched and report
    /// a count of zero.
    fn mark_attachment_deleted(
        &mut self,
        attachment_id: Uuid,
    ) -> impl Future<Output = PgResult<usize>> + Send;
}

impl AttachmentRepository for PgConnection {
    async fn create_attachment(&mut self, new_attachment: NewAttachment) -> PgResult<Attachment> {
        use schema::attachments;

        let attachment = diesel::insert_into(attachments::table)
            .values(new_attachment)
            .returning(Attachment::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(attachment)
    }

    async fn find_attachment_by_id(
        &mut self,
        attachment_id: Uuid,
    ) -> PgResult<Option<Attachment>> {
        use schema::attachments::{self, dsl};

        let attachment = attachments::table
            .filter(dsl::id.eq(attachment_id))
            .select(Attachment::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(attachment)
    }

    async fn find_live_attachment_by_id(
        &mut self,
        attachment_id: Uuid,
    ) -> PgResult<Option<Attachment>> {
        use schema::attachments::{self, dsl};

        let attachment = attachments::table
            .filter(dsl::id.eq(attachment_id))
            .filter(dsl::deleted_at.is_null())
            .select(Attachment::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(attachment)
    }

    async fn list_live_attachments(
        &mut self,
        owner_kind: OwnerKind,
        owner_id: Uuid,
        filter: AttachmentFilter,
    ) -> PgResult<Vec<Attachment>> {
        use schema::attachments::{self, dsl};

        let mut query = attachments::table
            .filter(dsl::owner_kind.eq(owner_kind))
            .filter(dsl::owner_id.eq(owner_id))
            .filter(dsl::deleted_at.is_null())
            .select(Attachment::as_select())
            .into_boxed();

        if let Some(source) = filter.source {
            query = query.filter(dsl::source.eq(source));
        }
        if let Some(source_id) = filter.source_id {
            query = query.filter(dsl::source_id.eq(source_id));
        }

        let attachments = query
            .order(dsl::created_at.desc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(attachments)
    }

    async fn update_live_attachment(
        &mut self,
        attachment_id: Uuid,
        updates: UpdateAttachment,
    ) -> PgResult<Option<Attachment>> {
        use schema::attachments::dsl;

        let attachment = diesel::update(dsl::attachments)
            .filter(dsl::id.eq(attachment_id))
            .filter(dsl::deleted_at.is_null())
            .set(updates)
            .returning(Attachment::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(attachment)
    }

    async fn mark_attachment_deleted(&mut self, attachment_id: Uuid) -> PgResult<usize> {
        use schema::attachments::dsl;

        let deleted_count = diesel::update(dsl::attachments)
            .filter(dsl::id.eq(attachment_id))
            .filter(dsl::deleted_at.is_null())
            .set(dsl::deleted_at.eq(now))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted_count)
    }
}
