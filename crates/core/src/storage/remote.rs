//! Remote object store backed by the Cloudflare R2 REST API.

use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use super::config::R2Config;
use super::error::StorageError;
use super::key::StorageKey;
use super::types::{StoredObject, UploadRequest};

/// Key-addressed remote blob store.
///
/// Implemented by [`R2Client`]; tests substitute their own doubles.
pub trait ObjectStore: Send + Sync {
    /// Public base URL objects are served from, without a trailing slash.
    fn public_base(&self) -> &str;

    /// Store the payload under `key` and return its public URL.
    fn put_object(
        &self,
        key: &StorageKey,
        request: &UploadRequest,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;

    /// Delete the object stored under `key`.
    fn delete_object(
        &self,
        key: &StorageKey,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// List the objects in the bucket.
    fn list_objects(&self) -> impl Future<Output = Result<Vec<StoredObject>, StorageError>> + Send;
}

/// Envelope returned by the Cloudflare API for listings.
#[derive(Debug, Deserialize)]
struct ListEnvelope {
    success: bool,
    #[serde(default)]
    result: Option<Vec<ObjectEntry>>,
    #[serde(default)]
    errors: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ObjectEntry {
    key: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    last_modified: Option<String>,
    #[serde(default)]
    uploaded: Option<String>,
    #[serde(default)]
    modified: Option<String>,
}

/// Cloudflare R2 client.
pub struct R2Client {
    http: Client,
    config: R2Config,
    objects_url: String,
}

impl R2Client {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or the HTTP client
    /// cannot be built.
    pub fn new(config: R2Config) -> Result<Self, StorageError> {
        config.validate()?;

        if config.api_token.trim().is_empty() {
            warn!("R2 API token is empty; uploads will fall back to inline data");
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| StorageError::configuration(e.to_string()))?;

        Ok(Self {
            http,
            objects_url: config.objects_url(),
            config,
        })
    }

    fn object_url(&self, key: &StorageKey) -> String {
        format!("{}/{}", self.objects_url, key)
    }
}

impl ObjectStore for R2Client {
    fn public_base(&self) -> &str {
        self.config.public_base()
    }

    async fn put_object(
        &self,
        key: &StorageKey,
        request: &UploadRequest,
    ) -> Result<String, StorageError> {
        debug!(
            key = %key,
            size = request.len(),
            content_type = %request.media_type(),
            "Uploading object to R2"
        );

        let response = self
            .http
            .put(self.object_url(key))
            .bearer_auth(&self.config.api_token)
            .header(CONTENT_TYPE, request.media_type())
            .body(request.bytes.clone())
            .send()
            .await?;
        ensure_success(response).await?;

        Ok(self.config.public_url_for(key))
    }

    async fn delete_object(&self, key: &StorageKey) -> Result<(), StorageError> {
        debug!(key = %key, "Deleting object from R2");

        let response = self
            .http
            .delete(self.object_url(key))
            .bearer_auth(&self.config.api_token)
            .send()
            .await?;
        ensure_success(response).await?;

        Ok(())
    }

    async fn list_objects(&self) -> Result<Vec<StoredObject>, StorageError> {
        debug!(bucket = %self.config.bucket_name, "Listing R2 objects");

        let response = self
            .http
            .get(&self.objects_url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await?;
        let body = ensure_success(response).await?.text().await?;

        let envelope: ListEnvelope =
            serde_json::from_str(&body).map_err(|e| StorageError::Decode(e.to_string()))?;

        if !envelope.success {
            return Err(StorageError::Api(envelope.errors.to_string()));
        }

        let objects = envelope
            .result
            .unwrap_or_default()
            .into_iter()
            .map(|entry| {
                let key = StorageKey::new(entry.key);
                StoredObject {
                    url: self.config.public_url_for(&key),
                    last_modified: entry.last_modified.or(entry.uploaded).or(entry.modified),
                    size: entry.size,
                    key: key.to_string(),
                }
            })
            .collect::<Vec<_>>();

        debug!(count = objects.len(), "Listed R2 objects");
        Ok(objects)
    }
}

/// Turn a non-2xx response into a status error carrying the body text.
async fn ensure_success(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(StorageError::status(status.as_u16(), body))
}
