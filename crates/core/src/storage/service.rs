//! Upload service: remote first, inline fallback, best-effort delete.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::error::StorageError;
use super::fallback::InlineEncoder;
use super::key::StorageKey;
use super::reference::StoredReference;
use super::remote::ObjectStore;
use super::types::{DeleteOutcome, StoredObject, UploadRequest};

/// Image upload service for admin forms.
pub struct UploadService<S: ObjectStore> {
    store: Arc<S>,
    encoder: InlineEncoder,
    placeholder_marker: String,
}

impl<S: ObjectStore> UploadService<S> {
    /// Default marker identifying placeholder images.
    pub const DEFAULT_PLACEHOLDER_MARKER: &'static str = "placeholder.svg";

    /// Create a new upload service.
    #[must_use]
    pub fn new(store: Arc<S>, encoder: InlineEncoder) -> Self {
        Self {
            store,
            encoder,
            placeholder_marker: Self::DEFAULT_PLACEHOLDER_MARKER.to_string(),
        }
    }

    /// Set the placeholder marker.
    #[must_use]
    pub fn with_placeholder_marker(mut self, marker: impl Into<String>) -> Self {
        self.placeholder_marker = marker.into();
        self
    }

    /// Get the remote store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Recover the reference kind of a stored URL string.
    #[must_use]
    pub fn classify(&self, url: &str) -> Option<StoredReference> {
        StoredReference::classify(url, self.store.public_base(), &self.placeholder_marker)
    }

    /// Upload an image and return a reference to it.
    ///
    /// Tries the remote store once under a freshly generated key. Any failure
    /// degrades to an inline data URI of the same request, so this never fails.
    pub async fn upload_image(&self, request: &UploadRequest) -> StoredReference {
        let key = StorageKey::generate(&request.file_name);

        match self.store.put_object(&key, request).await {
            Ok(url) => {
                info!(key = %key, size = request.len(), "Image uploaded");
                StoredReference::Remote { url, key }
            }
            Err(e) => {
                warn!(
                    key = %key,
                    error = %e,
                    "Remote upload failed, using inline fallback"
                );
                StoredReference::Inline {
                    data_uri: self.encoder.upload_image(request),
                }
            }
        }
    }

    /// Delete the image behind a stored URL string.
    ///
    /// Blank, inline and placeholder URLs make no remote call. Remote failures
    /// are logged and reported in the outcome, never returned as an error.
    pub async fn delete_image(&self, url: &str) -> DeleteOutcome {
        if url.trim().is_empty() {
            return DeleteOutcome::Skipped;
        }

        match self.classify(url) {
            Some(reference) => self.delete_reference(&reference).await,
            None => {
                error!(url = %url, "Cannot derive a storage key from image URL");
                DeleteOutcome::Failed("invalid image URL".to_string())
            }
        }
    }

    /// Delete the image behind an explicit reference.
    pub async fn delete_reference(&self, reference: &StoredReference) -> DeleteOutcome {
        match reference {
            StoredReference::Inline { data_uri } => {
                self.encoder.delete_image(data_uri);
                DeleteOutcome::Skipped
            }
            StoredReference::Placeholder { .. } => DeleteOutcome::Skipped,
            StoredReference::Remote { key, .. } => match self.store.delete_object(key).await {
                Ok(()) => {
                    info!(key = %key, "Image deleted");
                    DeleteOutcome::Deleted
                }
                Err(e) => {
                    error!(key = %key, error = %e, "Failed to delete image");
                    DeleteOutcome::Failed(e.to_string())
                }
            },
        }
    }

    /// List the images stored remotely.
    pub async fn list_files(&self) -> Result<Vec<StoredObject>, StorageError> {
        self.store
            .list_objects()
            .await
            .inspect_err(|e| error!(error = %e, "Failed to list images"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const BASE: &str = "https://images.example.com";

    /// Mock object store for testing.
    #[derive(Default)]
    struct MockObjectStore {
        fail_put: bool,
        fail_delete: bool,
        put_keys: Mutex<Vec<StorageKey>>,
        deleted_keys: Mutex<Vec<StorageKey>>,
    }

    impl MockObjectStore {
        fn failing() -> Self {
            Self {
                fail_put: true,
                fail_delete: true,
                ..Self::default()
            }
        }
    }

    impl ObjectStore for MockObjectStore {
        fn public_base(&self) -> &str {
            BASE
        }

        async fn put_object(
            &self,
            key: &StorageKey,
            _request: &UploadRequest,
        ) -> Result<String, StorageError> {
            self.put_keys.lock().unwrap().push(key.clone());
            if self.fail_put {
                return Err(StorageError::status(500, "internal error"));
            }
            Ok(format!("{BASE}/{key}"))
        }

        async fn delete_object(&self, key: &StorageKey) -> Result<(), StorageError> {
            self.deleted_keys.lock().unwrap().push(key.clone());
            if self.fail_delete {
                return Err(StorageError::Transport("connection refused".to_string()));
            }
            Ok(())
        }

        async fn list_objects(&self) -> Result<Vec<StoredObject>, StorageError> {
            Err(StorageError::Api("[{\"code\":10006}]".to_string()))
        }
    }

    fn service(store: MockObjectStore) -> UploadService<MockObjectStore> {
        UploadService::new(Arc::new(store), InlineEncoder::new())
    }

    fn request() -> UploadRequest {
        UploadRequest::new("my photo!.png", "image/png", b"png-bytes".to_vec())
    }

    #[tokio::test]
    async fn test_upload_returns_remote_reference() {
        let service = service(MockObjectStore::default());

        let reference = service.upload_image(&request()).await;

        assert!(reference.is_remote());
        assert!(reference.url().starts_with(BASE));
        assert!(reference.url().ends_with("-my_photo_.png"));
        let put_keys = service.store().put_keys.lock().unwrap();
        assert_eq!(put_keys.len(), 1);
        assert_eq!(reference.storage_key(), Some(&put_keys[0]));
    }

    #[tokio::test]
    async fn test_upload_falls_back_to_inline_once() {
        let service = service(MockObjectStore::failing());

        let reference = service.upload_image(&request()).await;

        assert_eq!(
            reference,
            StoredReference::Inline {
                data_uri: "data:image/png;base64,cG5nLWJ5dGVz".to_string()
            }
        );
        assert_eq!(service.store().put_keys.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_uploads_use_distinct_keys() {
        let service = service(MockObjectStore::default());
        let first = request();
        let second = request();

        let (a, b) = tokio::join!(service.upload_image(&first), service.upload_image(&second));

        assert_ne!(a.storage_key(), b.storage_key());
        let put_keys = service.store().put_keys.lock().unwrap();
        assert_ne!(put_keys[0], put_keys[1]);
    }

    #[tokio::test]
    async fn test_delete_inline_and_placeholder_skip_remote() {
        let service = service(MockObjectStore::default());

        assert_eq!(
            service.delete_image("data:image/png;base64,AAAA").await,
            DeleteOutcome::Skipped
        );
        assert_eq!(
            service
                .delete_image("/placeholder.svg?height=300&width=400")
                .await,
            DeleteOutcome::Skipped
        );
        assert_eq!(service.delete_image("").await, DeleteOutcome::Skipped);
        assert!(service.store().deleted_keys.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_remote_issues_one_delete() {
        let service = service(MockObjectStore::default());

        let outcome = service
            .delete_image("https://images.example.com/123-abcd1234-lake.png")
            .await;

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(
            *service.store().deleted_keys.lock().unwrap(),
            vec![StorageKey::new("123-abcd1234-lake.png")]
        );
    }

    #[tokio::test]
    async fn test_delete_remote_failure_is_swallowed() {
        let service = service(MockObjectStore::failing());

        let outcome = service
            .delete_image("https://images.example.com/123-abcd1234-lake.png")
            .await;

        assert!(!outcome.is_success());
        assert!(outcome.error().is_some_and(|e| e.contains("connection refused")));
        assert_eq!(service.store().deleted_keys.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_url_without_key_fails_without_remote_call() {
        let service = service(MockObjectStore::default());

        let outcome = service.delete_image("https://images.example.com/").await;

        assert_eq!(outcome, DeleteOutcome::Failed("invalid image URL".to_string()));
        assert!(service.store().deleted_keys.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_placeholder_marker() {
        let service = service(MockObjectStore::default()).with_placeholder_marker("stock-");

        let outcome = service
            .delete_image("https://images.example.com/stock-mountain.jpg")
            .await;

        assert_eq!(outcome, DeleteOutcome::Skipped);
        assert!(service.store().deleted_keys.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_files_surfaces_error() {
        let service = service(MockObjectStore::default());

        let result = service.list_files().await;

        assert!(matches!(result, Err(StorageError::Api(msg)) if msg.contains("10006")));
    }
}
