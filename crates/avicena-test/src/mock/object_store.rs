//! Mock object store for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use avicena_object::{HeadObject, ObjectStore, PresignedUrl, StorageError, StorageResult};
use bytes::Bytes;

#[derive(Debug, Clone)]
struct StoredObject {
    content_type: String,
    content: Bytes,
}

#[derive(Debug, Default)]
struct MockState {
    objects: HashMap<String, StoredObject>,
    put_count: usize,
    presign_count: usize,
    fail_puts: bool,
    fail_presigns: bool,
    vanish: bool,
    head_override: Option<HeadObject>,
}

/// In-memory object store with scriptable failures.
///
/// Behaves like a healthy backend until a test arms one of the failure
/// switches. Presigning never checks object existence, matching how
/// real object stores sign URLs locally.
#[derive(Debug, Clone, Default)]
pub struct MockObjectStore {
    state: Arc<Mutex<MockState>>,
}

impl MockObjectStore {
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Makes every subsequent write fail.
    pub fn fail_puts(&self) {
        self.state().fail_puts = true;
    }

    /// Makes every subsequent presign fail.
    pub fn fail_presigns(&self) {
        self.state().fail_presigns = true;
    }

    /// Accepts subsequent writes without retaining the object.
    pub fn vanish_objects(&self) {
        self.state().vanish = true;
    }

    /// Fixes what `head` reports, regardless of stored content.
    pub fn override_head(&self, size: i64, content_type: Option<&str>) {
        self.state().head_override = Some(HeadObject {
            size,
            content_type: content_type.map(str::to_owned),
        });
    }

    /// Number of write attempts, including failed ones.
    #[must_use]
    pub fn put_count(&self) -> usize {
        self.state().put_count
    }

    /// Number of presign attempts, including failed ones.
    #[must_use]
    pub fn presign_count(&self) -> usize {
        self.state().presign_count
    }

    /// Number of objects currently retained.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.state().objects.len()
    }

    /// Returns true when an object is retained under `key`.
    #[must_use]
    pub fn contains_object(&self, key: &str) -> bool {
        self.state().objects.contains_key(key)
    }
}

#[async_trait::async_trait]
impl ObjectStore for MockObjectStore {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        size: i64,
        content: Bytes,
    ) -> StorageResult<()> {
        let mut state = self.state();
        state.put_count += 1;
        if state.fail_puts {
            return Err(StorageError::write(format!("mock write failure for '{key}'")));
        }

        debug_assert_eq!(size, content.len() as i64);
        if !state.vanish {
            state.objects.insert(
                key.to_owned(),
                StoredObject {
                    content_type: content_type.to_owned(),
                    content,
                },
            );
        }

        Ok(())
    }

    async fn head(&self, key: &str) -> StorageResult<HeadObject> {
        let state = self.state();
        if let Some(head) = &state.head_override {
            return Ok(head.clone());
        }

        match state.objects.get(key) {
            Some(object) => Ok(HeadObject {
                size: object.content.len() as i64,
                content_type: Some(object.content_type.clone()),
            }),
            None => Err(StorageError::not_found(key)),
        }
    }

    async fn presign_get(
        &self,
        key: &str,
        download_filename: &str,
        expires_in: Duration,
    ) -> StorageResult<PresignedUrl> {
        let mut state = self.state();
        state.presign_count += 1;
        if state.fail_presigns {
            return Err(StorageError::presign(format!(
                "mock presign failure for '{key}'"
            )));
        }

        Ok(PresignedUrl {
            url: format!(
                "https://storage.local/{key}?filename={download_filename}&expires={}&signature=mock",
                expires_in.as_secs()
            ),
        })
    }
}
