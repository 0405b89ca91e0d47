//! Attachment ingestion and retrieval engine.

use std::fmt;
use std::sync::Arc;

use avicena_object::ObjectStore;
use avicena_postgres::model::{Attachment, NewAttachment, UpdateAttachment};
use avicena_postgres::query::AttachmentFilter;
use avicena_postgres::types::AttachmentSource;
use bytes::Bytes;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::TRACING_TARGET;
use crate::error::{AttachError, AttachResult};
use crate::key::{StorageKey, sanitize_filename};
use crate::metadata::MetadataStore;
use crate::owner::AttachmentOwner;
use crate::policy::AttachmentPolicy;

/// Upload request for one attachment.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    /// Client-supplied filename, sanitized before storage.
    pub filename: String,
    /// Declared MIME type of the content.
    pub mime_type: String,
    /// Raw content bytes.
    pub content: Bytes,
    /// Optional clinical category label.
    pub category: Option<String>,
    /// Optional free-form details.
    pub details: Option<String>,
    /// Hospital workflow the upload originated from.
    pub source: Option<AttachmentSource>,
    /// Identifier of the originating order or document.
    pub source_id: Option<Uuid>,
    /// Identifier of the uploading actor.
    pub created_by: Option<Uuid>,
}

/// Time-boxed download authorization for one attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTicket {
    /// Presigned URL granting read access to the object.
    pub url: String,
    /// Seconds until the URL expires.
    pub expires_in_secs: i64,
}

/// Coordinates policy checks, object storage and metadata persistence.
///
/// Generic over the metadata store so the full pipeline runs in tests
/// without a database.
pub struct AttachmentEngine<M> {
    metadata: M,
    store: Arc<dyn ObjectStore>,
    policy: AttachmentPolicy,
}

impl<M> Clone for AttachmentEngine<M>
where
    M: Clone,
{
    fn clone(&self) -> Self {
        Self {
            metadata: self.metadata.clone(),
            store: Arc::clone(&self.store),
            policy: self.policy.clone(),
        }
    }
}

impl<M: MetadataStore> AttachmentEngine<M> {
    /// Creates an engine over the given stores and policy.
    pub fn new(metadata: M, store: Arc<dyn ObjectStore>, policy: AttachmentPolicy) -> Self {
        Self {
            metadata,
            store,
            policy,
        }
    }

    /// Returns the policy the engine enforces.
    #[must_use]
    pub fn policy(&self) -> &AttachmentPolicy {
        &self.policy
    }

    /// Ingests one upload for the given owner.
    ///
    /// The pipeline is fail-fast: policy gates run before any byte leaves
    /// the process, the object write happens before the metadata insert,
    /// and a head check between the two compares what storage reports
    /// against what was sent. A failed upload leaves no metadata row.
    #[tracing::instrument(skip(self, payload), target = TRACING_TARGET)]
    pub async fn ingest<O: AttachmentOwner>(
        &self,
        owner_id: Uuid,
        payload: UploadPayload,
    ) -> AttachResult<Attachment> {
        if !self.policy.allows_mime_type(&payload.mime_type) {
            debug!(
                target: TRACING_TARGET,
                mime_type = %payload.mime_type,
                "Rejecting upload with unsupported MIME type",
            );
            return Err(AttachError::UnsupportedMediaType {
                mime_type: payload.mime_type,
            });
        }

        let size_bytes = payload.content.len() as i64;
        if size_bytes <= 0 || size_bytes > self.policy.max_bytes {
            debug!(
                target: TRACING_TARGET,
                size_bytes,
                max_bytes = self.policy.max_bytes,
                "Rejecting upload with out-of-policy size",
            );
            return Err(AttachError::PayloadTooLarge {
                size_bytes,
                max_bytes: self.policy.max_bytes,
            });
        }

        let filename = sanitize_filename(&payload.filename);
        let key = StorageKey::<O>::mint(owner_id, &filename);

        self.store
            .put(
                key.as_str(),
                &payload.mime_type,
                size_bytes,
                payload.content,
            )
            .await
            .map_err(|storage_error| AttachError::StorageWriteFailed {
                key: key.as_str().to_owned(),
                source: storage_error,
            })?;

        let head = match self.store.head(key.as_str()).await {
            Ok(head) => head,
            Err(storage_error) if storage_error.is_not_found() => {
                return Err(AttachError::IntegrityMismatch {
                    key: key.as_str().to_owned(),
                    detail: "object missing immediately after write".to_owned(),
                });
            }
            Err(storage_error) => {
                return Err(AttachError::StorageWriteFailed {
                    key: key.as_str().to_owned(),
                    source: storage_error,
                });
            }
        };

        if head.size != size_bytes {
            warn!(
                target: TRACING_TARGET,
                key = %key,
                reported_bytes = head.size,
                expected_bytes = size_bytes,
                "Stored object size differs from the upload",
            );
            return Err(AttachError::IntegrityMismatch {
                key: key.as_str().to_owned(),
                detail: format!("stored {} bytes, expected {size_bytes}", head.size),
            });
        }

        if let Some(reported) = head.content_type.as_deref()
            && !reported.eq_ignore_ascii_case(&payload.mime_type)
        {
            warn!(
                target: TRACING_TARGET,
                key = %key,
                reported_content_type = reported,
                expected_content_type = %payload.mime_type,
                "Stored content type differs from the upload",
            );
            return Err(AttachError::IntegrityMismatch {
                key: key.as_str().to_owned(),
                detail: format!(
                    "stored content type '{reported}', expected '{}'",
                    payload.mime_type
                ),
            });
        }

        let attachment = self
            .metadata
            .create(NewAttachment {
                owner_kind: O::kind(),
                owner_id,
                storage_key: key.into_string(),
                filename,
                mime_type: payload.mime_type,
                size_bytes,
                category: payload.category,
                details: payload.details,
                source: payload.source,
                source_id: payload.source_id,
                created_by: payload.created_by,
            })
            .await?;

        info!(
            target: TRACING_TARGET,
            attachment_id = %attachment.id,
            owner_kind = %attachment.owner_kind,
            size_bytes,
            "Attachment ingested",
        );

        Ok(attachment)
    }

    /// Issues a time-boxed download URL for a live attachment.
    #[tracing::instrument(skip(self), target = TRACING_TARGET)]
    pub async fn download_ticket(&self, attachment_id: Uuid) -> AttachResult<DownloadTicket> {
        let attachment = self
            .metadata
            .find_live(attachment_id)
            .await?
            .ok_or(AttachError::NotFound { attachment_id })?;

        let presigned = self
            .store
            .presign_get(
                &attachment.storage_key,
                &attachment.filename,
                self.policy.presign_expiry(),
            )
            .await?;

        debug!(
            target: TRACING_TARGET,
            attachment_id = %attachment_id,
            expires_in_secs = self.policy.presign_expiry_secs,
            "Issued download ticket",
        );

        Ok(DownloadTicket {
            url: presigned.url,
            expires_in_secs: self.policy.presign_expiry_secs,
        })
    }

    /// Lists live attachments of one owner, newest first.
    pub async fn list<O: AttachmentOwner>(
        &self,
        owner_id: Uuid,
        filter: AttachmentFilter,
    ) -> AttachResult<Vec<Attachment>> {
        let attachments = self.metadata.list_live(O::kind(), owner_id, filter).await?;
        Ok(attachments)
    }

    /// Applies category or details annotations to a live attachment.
    ///
    /// The change set must contain at least one field.
    #[tracing::instrument(skip(self, updates), target = TRACING_TARGET)]
    pub async fn annotate(
        &self,
        attachment_id: Uuid,
        updates: UpdateAttachment,
    ) -> AttachResult<Attachment> {
        let attachment = self
            .metadata
            .update_live(attachment_id, updates)
            .await?
            .ok_or(AttachError::NotFound { attachment_id })?;

        info!(
            target: TRACING_TARGET,
            attachment_id = %attachment_id,
            "Attachment annotated",
        );

        Ok(attachment)
    }

    /// Marks an attachment as deleted.
    ///
    /// Deletion is idempotent: unknown ids and already-deleted attachments
    /// both succeed without touching anything. The stored object is kept;
    /// only the metadata row changes visibility.
    #[tracing::instrument(skip(self), target = TRACING_TARGET)]
    pub async fn soft_delete(&self, attachment_id: Uuid) -> AttachResult<()> {
        let deleted_count = self.metadata.mark_deleted(attachment_id).await?;
        if deleted_count > 0 {
            info!(
                target: TRACING_TARGET,
                attachment_id = %attachment_id,
                "Attachment soft-deleted",
            );
            return Ok(());
        }

        match self.metadata.find(attachment_id).await? {
            Some(_) => debug!(
                target: TRACING_TARGET,
                attachment_id = %attachment_id,
                "Attachment was already deleted",
            ),
            None => debug!(
                target: TRACING_TARGET,
                attachment_id = %attachment_id,
                "Delete request matched no attachment",
            ),
        }

        Ok(())
    }
}

impl<M> fmt::Debug for AttachmentEngine<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachmentEngine")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use avicena_test::{MemoryMetadata, MockObjectStore};

    use super::*;
    use crate::owner::{Encounter, Patient};

    struct Harness {
        engine: AttachmentEngine<MemoryMetadata>,
        metadata: MemoryMetadata,
        store: MockObjectStore,
    }

    fn harness() -> Harness {
        harness_with_policy(AttachmentPolicy::default())
    }

    fn harness_with_policy(policy: AttachmentPolicy) -> Harness {
        let metadata = MemoryMetadata::default();
        let store = MockObjectStore::default();
        let engine = AttachmentEngine::new(metadata.clone(), Arc::new(store.clone()), policy);
        Harness {
            engine,
            metadata,
            store,
        }
    }

    fn png_payload(filename: &str, size: usize) -> UploadPayload {
        UploadPayload {
            filename: filename.to_owned(),
            mime_type: "image/png".to_owned(),
            content: Bytes::from(vec![0u8; size]),
            category: None,
            details: None,
            source: None,
            source_id: None,
            created_by: None,
        }
    }

    #[tokio::test]
    async fn ingest_stores_object_then_metadata() {
        let harness = harness();
        let owner_id = Uuid::new_v4();

        let attachment = harness
            .engine
            .ingest::<Encounter>(owner_id, png_payload("a b.png", 1024))
            .await
            .unwrap();

        assert_eq!(attachment.filename, "a b.png");
        assert_eq!(attachment.mime_type, "image/png");
        assert_eq!(attachment.size_bytes, 1024);
        assert_eq!(attachment.owner_id, owner_id);
        assert!(attachment.storage_key.starts_with(&format!("encounters/{owner_id}/")));
        assert!(attachment.storage_key.ends_with("_a b.png"));

        assert_eq!(harness.store.put_count(), 1);
        assert!(harness.store.contains_object(&attachment.storage_key));
        assert_eq!(harness.metadata.write_count(), 1);
    }

    #[tokio::test]
    async fn ingest_rejects_unsupported_mime_before_any_write() {
        let harness = harness();

        let mut payload = png_payload("scan.gif", 64);
        payload.mime_type = "image/gif".to_owned();
        let result = harness.engine.ingest::<Encounter>(Uuid::new_v4(), payload).await;

        assert!(matches!(
            result,
            Err(AttachError::UnsupportedMediaType { mime_type }) if mime_type == "image/gif"
        ));
        assert_eq!(harness.store.put_count(), 0);
        assert_eq!(harness.metadata.write_count(), 0);
    }

    #[tokio::test]
    async fn ingest_accepts_mime_case_insensitively() {
        let harness = harness();

        let mut payload = png_payload("scan.png", 64);
        payload.mime_type = "Image/PNG".to_owned();
        let attachment = harness
            .engine
            .ingest::<Encounter>(Uuid::new_v4(), payload)
            .await
            .unwrap();

        assert_eq!(attachment.mime_type, "Image/PNG");
    }

    #[tokio::test]
    async fn ingest_rejects_oversize_payloads() {
        let policy = AttachmentPolicy {
            max_bytes: 8,
            ..AttachmentPolicy::default()
        };
        let harness = harness_with_policy(policy);

        let result = harness
            .engine
            .ingest::<Encounter>(Uuid::new_v4(), png_payload("big.png", 9))
            .await;
        assert!(matches!(
            result,
            Err(AttachError::PayloadTooLarge { size_bytes: 9, max_bytes: 8 })
        ));
        assert_eq!(harness.store.put_count(), 0);

        harness
            .engine
            .ingest::<Encounter>(Uuid::new_v4(), png_payload("ok.png", 8))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn ingest_rejects_empty_payloads() {
        let harness = harness();

        let result = harness
            .engine
            .ingest::<Encounter>(Uuid::new_v4(), png_payload("empty.png", 0))
            .await;

        assert!(matches!(
            result,
            Err(AttachError::PayloadTooLarge { size_bytes: 0, .. })
        ));
        assert_eq!(harness.store.put_count(), 0);
    }

    #[tokio::test]
    async fn ingest_sanitizes_hostile_filenames() {
        let harness = harness();

        let attachment = harness
            .engine
            .ingest::<Encounter>(Uuid::new_v4(), png_payload("../../etc/passwd", 16))
            .await
            .unwrap();

        assert_eq!(attachment.filename, ".._.._etc_passwd");
        assert!(attachment.storage_key.split('/').all(|segment| segment != ".."));
    }

    #[tokio::test]
    async fn ingest_surfaces_write_failures_without_metadata() {
        let harness = harness();
        harness.store.fail_puts();

        let result = harness
            .engine
            .ingest::<Encounter>(Uuid::new_v4(), png_payload("scan.png", 64))
            .await;

        assert!(matches!(result, Err(AttachError::StorageWriteFailed { .. })));
        assert_eq!(harness.metadata.write_count(), 0);
    }

    #[tokio::test]
    async fn ingest_detects_object_missing_after_write() {
        let harness = harness();
        harness.store.vanish_objects();

        let result = harness
            .engine
            .ingest::<Encounter>(Uuid::new_v4(), png_payload("scan.png", 64))
            .await;

        assert!(matches!(
            result,
            Err(AttachError::IntegrityMismatch { detail, .. }) if detail.contains("missing")
        ));
        assert_eq!(harness.metadata.write_count(), 0);
    }

    #[tokio::test]
    async fn ingest_detects_size_mismatch() {
        let harness = harness();
        harness.store.override_head(999, Some("image/png"));

        let result = harness
            .engine
            .ingest::<Encounter>(Uuid::new_v4(), png_payload("scan.png", 64))
            .await;

        assert!(matches!(
            result,
            Err(AttachError::IntegrityMismatch { detail, .. }) if detail.contains("999")
        ));
        assert_eq!(harness.metadata.write_count(), 0);
    }

    #[tokio::test]
    async fn ingest_detects_content_type_mismatch() {
        let harness = harness();
        harness.store.override_head(64, Some("application/pdf"));

        let result = harness
            .engine
            .ingest::<Encounter>(Uuid::new_v4(), png_payload("scan.png", 64))
            .await;

        assert!(matches!(
            result,
            Err(AttachError::IntegrityMismatch { detail, .. }) if detail.contains("application/pdf")
        ));
    }

    #[tokio::test]
    async fn ingest_tolerates_backends_without_content_type() {
        let harness = harness();
        harness.store.override_head(64, None);

        harness
            .engine
            .ingest::<Encounter>(Uuid::new_v4(), png_payload("scan.png", 64))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn download_ticket_presigns_the_stored_object() {
        let harness = harness();

        let attachment = harness
            .engine
            .ingest::<Encounter>(Uuid::new_v4(), png_payload("scan.png", 64))
            .await
            .unwrap();
        let ticket = harness.engine.download_ticket(attachment.id).await.unwrap();

        assert!(ticket.url.contains(&attachment.storage_key));
        assert_eq!(ticket.expires_in_secs, 300);
        assert_eq!(harness.store.presign_count(), 1);
    }

    #[tokio::test]
    async fn download_ticket_misses_unknown_and_deleted() {
        let harness = harness();

        let result = harness.engine.download_ticket(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AttachError::NotFound { .. })));

        let attachment = harness
            .engine
            .ingest::<Encounter>(Uuid::new_v4(), png_payload("scan.png", 64))
            .await
            .unwrap();
        harness.engine.soft_delete(attachment.id).await.unwrap();

        let result = harness.engine.download_ticket(attachment.id).await;
        assert!(matches!(result, Err(AttachError::NotFound { .. })));
        assert_eq!(harness.store.presign_count(), 0);
    }

    #[tokio::test]
    async fn download_ticket_surfaces_presign_failures() {
        let harness = harness();
        harness.store.fail_presigns();

        let attachment = harness
            .engine
            .ingest::<Encounter>(Uuid::new_v4(), png_payload("scan.png", 64))
            .await
            .unwrap();
        let result = harness.engine.download_ticket(attachment.id).await;

        assert!(matches!(result, Err(AttachError::Storage(_))));
    }

    #[tokio::test]
    async fn soft_delete_is_idempotent_and_keeps_the_object() {
        let harness = harness();
        let owner_id = Uuid::new_v4();

        let attachment = harness
            .engine
            .ingest::<Encounter>(owner_id, png_payload("scan.png", 64))
            .await
            .unwrap();

        harness.engine.soft_delete(attachment.id).await.unwrap();
        harness.engine.soft_delete(attachment.id).await.unwrap();
        harness.engine.soft_delete(Uuid::new_v4()).await.unwrap();

        let listed = harness
            .engine
            .list::<Encounter>(owner_id, AttachmentFilter::default())
            .await
            .unwrap();
        assert!(listed.is_empty());
        assert!(harness.store.contains_object(&attachment.storage_key));
        assert_eq!(harness.store.object_count(), 1);
    }

    #[tokio::test]
    async fn list_scopes_by_owner_and_filter() {
        let harness = harness();
        let encounter_id = Uuid::new_v4();
        let patient_id = Uuid::new_v4();
        let order_id = Uuid::new_v4();

        let mut lab_upload = png_payload("lab.png", 32);
        lab_upload.source = Some(AttachmentSource::LabOrder);
        lab_upload.source_id = Some(order_id);
        harness
            .engine
            .ingest::<Encounter>(encounter_id, lab_upload)
            .await
            .unwrap();
        let second = harness
            .engine
            .ingest::<Encounter>(encounter_id, png_payload("note.png", 32))
            .await
            .unwrap();
        harness
            .engine
            .ingest::<Patient>(patient_id, png_payload("card.png", 32))
            .await
            .unwrap();

        let all = harness
            .engine
            .list::<Encounter>(encounter_id, AttachmentFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);

        let lab_only = harness
            .engine
            .list::<Encounter>(
                encounter_id,
                AttachmentFilter {
                    source: Some(AttachmentSource::LabOrder),
                    source_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(lab_only.len(), 1);
        assert_eq!(lab_only[0].source_id, Some(order_id));

        let patient_docs = harness
            .engine
            .list::<Patient>(patient_id, AttachmentFilter::default())
            .await
            .unwrap();
        assert_eq!(patient_docs.len(), 1);
    }

    #[tokio::test]
    async fn annotate_updates_live_attachments_only() {
        let harness = harness();

        let attachment = harness
            .engine
            .ingest::<Encounter>(Uuid::new_v4(), png_payload("scan.png", 64))
            .await
            .unwrap();

        let annotated = harness
            .engine
            .annotate(
                attachment.id,
                UpdateAttachment {
                    category: Some("radiology".to_owned()),
                    details: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(annotated.category.as_deref(), Some("radiology"));

        let result = harness
            .engine
            .annotate(Uuid::new_v4(), UpdateAttachment::default())
            .await;
        assert!(matches!(result, Err(AttachError::NotFound { .. })));

        harness.engine.soft_delete(attachment.id).await.unwrap();
        let result = harness
            .engine
            .annotate(
                attachment.id,
                UpdateAttachment {
                    category: Some("archived".to_owned()),
                    details: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AttachError::NotFound { .. })));
    }
}
