//! In-memory metadata store for testing.

use std::cmp::Reverse;
use std::sync::{Arc, Mutex, MutexGuard};

use avicena_attach::MetadataStore;
use avicena_postgres::PgResult;
use avicena_postgres::model::{Attachment, NewAttachment, UpdateAttachment};
use avicena_postgres::query::AttachmentFilter;
use avicena_postgres::types::{HasCreatedAt, OwnerKind};
use uuid::Uuid;

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<Attachment>,
    write_count: usize,
}

/// In-memory metadata store mirroring the live-row semantics of the
/// database queries.
///
/// Soft-deleted rows stay in memory but are invisible to every
/// operation except `find`. Listing returns newest first.
#[derive(Debug, Clone, Default)]
pub struct MemoryMetadata {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryMetadata {
    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Number of rows inserted so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state().write_count
    }
}

#[async_trait::async_trait]
impl MetadataStore for MemoryMetadata {
    async fn create(&self, new_attachment: NewAttachment) -> PgResult<Attachment> {
        let now = jiff::Timestamp::now();
        let attachment = Attachment {
            id: Uuid::now_v7(),
            owner_kind: new_attachment.owner_kind,
            owner_id: new_attachment.owner_id,
            storage_key: new_attachment.storage_key,
            filename: new_attachment.filename,
            mime_type: new_attachment.mime_type,
            size_bytes: new_attachment.size_bytes,
            category: new_attachment.category,
            details: new_attachment.details,
            source: new_attachment.source,
            source_id: new_attachment.source_id,
            created_by: new_attachment.created_by,
            created_at: now.into(),
            updated_at: now.into(),
            deleted_at: None,
        };

        let mut state = self.state();
        state.rows.push(attachment.clone());
        state.write_count += 1;
        Ok(attachment)
    }

    async fn find(&self, attachment_id: Uuid) -> PgResult<Option<Attachment>> {
        let state = self.state();
        Ok(state.rows.iter().find(|row| row.id == attachment_id).cloned())
    }

    async fn find_live(&self, attachment_id: Uuid) -> PgResult<Option<Attachment>> {
        let state = self.state();
        Ok(state
            .rows
            .iter()
            .find(|row| row.id == attachment_id && row.deleted_at.is_none())
            .cloned())
    }

    async fn list_live(
        &self,
        owner_kind: OwnerKind,
        owner_id: Uuid,
        filter: AttachmentFilter,
    ) -> PgResult<Vec<Attachment>> {
        let state = self.state();
        let mut matches: Vec<Attachment> = state
            .rows
            .iter()
            .filter(|row| {
                row.deleted_at.is_none()
                    && row.owner_kind == owner_kind
                    && row.owner_id == owner_id
                    && filter.source.is_none_or(|source| row.source == Some(source))
                    && filter
                        .source_id
                        .is_none_or(|source_id| row.source_id == Some(source_id))
            })
            .cloned()
            .collect();

        // Ids break timestamp ties, as UUIDv7 preserves insertion order.
        matches.sort_by_key(|row| Reverse((row.created_at(), row.id)));
        Ok(matches)
    }

    async fn update_live(
        &self,
        attachment_id: Uuid,
        updates: UpdateAttachment,
    ) -> PgResult<Option<Attachment>> {
        let mut state = self.state();
        let Some(row) = state
            .rows
            .iter_mut()
            .find(|row| row.id == attachment_id && row.deleted_at.is_none())
        else {
            return Ok(None);
        };

        if let Some(category) = updates.category {
            row.category = Some(category);
        }
        if let Some(details) = updates.details {
            row.details = Some(details);
        }
        row.updated_at = jiff::Timestamp::now().into();
        Ok(Some(row.clone()))
    }

    async fn mark_deleted(&self, attachment_id: Uuid) -> PgResult<usize> {
        let mut state = self.state();
        let Some(row) = state
            .rows
            .iter_mut()
            .find(|row| row.id == attachment_id && row.deleted_at.is_none())
        else {
            return Ok(0);
        };

        row.deleted_at = Some(jiff::Timestamp::now().into());
        Ok(1)
    }
}
