//! Storage configuration types.

use std::fmt;
use std::time::Duration;

use shanti_shared::StorageSettings;

use super::error::StorageError;
use super::key::StorageKey;

/// Cloudflare R2 client configuration.
#[derive(Clone)]
pub struct R2Config {
    /// Cloudflare account identifier.
    pub account_id: String,
    /// R2 bucket name.
    pub bucket_name: String,
    /// Public base URL objects are served from.
    pub public_url: String,
    /// API token sent as a bearer credential.
    pub api_token: String,
    /// Base URL of the Cloudflare REST API.
    pub api_base: String,
    /// Optional timeout for every request.
    pub request_timeout: Option<Duration>,
}

impl R2Config {
    /// Default Cloudflare REST API base.
    pub const DEFAULT_API_BASE: &'static str = "https://api.cloudflare.com/client/v4";

    /// Create a new config against the default API base.
    #[must_use]
    pub fn new(
        account_id: impl Into<String>,
        bucket_name: impl Into<String>,
        public_url: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            bucket_name: bucket_name.into(),
            public_url: public_url.into(),
            api_token: api_token.into(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
            request_timeout: None,
        }
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Check the fields every request URL is built from.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the account, bucket or public URL is empty.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.account_id.trim().is_empty() {
            return Err(StorageError::configuration("account id is empty"));
        }
        if self.bucket_name.trim().is_empty() {
            return Err(StorageError::configuration("bucket name is empty"));
        }
        if self.public_url.trim().is_empty() {
            return Err(StorageError::configuration("public URL is empty"));
        }
        Ok(())
    }

    /// Objects endpoint of the configured bucket.
    ///
    /// Format: `{api_base}/accounts/{account_id}/r2/buckets/{bucket_name}/objects`
    #[must_use]
    pub fn objects_url(&self) -> String {
        format!(
            "{}/accounts/{}/r2/buckets/{}/objects",
            self.api_base.trim_end_matches('/'),
            self.account_id,
            self.bucket_name
        )
    }

    /// Public base URL without a trailing slash.
    #[must_use]
    pub fn public_base(&self) -> &str {
        self.public_url.trim_end_matches('/')
    }

    /// Public URL an object key is served from.
    #[must_use]
    pub fn public_url_for(&self, key: &StorageKey) -> String {
        format!("{}/{}", self.public_base(), key)
    }
}

impl From<&StorageSettings> for R2Config {
    fn from(settings: &StorageSettings) -> Self {
        let config = Self::new(
            settings.account_id.clone(),
            settings.bucket_name.clone(),
            settings.public_url.clone(),
            settings.api_token.clone(),
        )
        .with_api_base(settings.api_base.clone());

        match settings.request_timeout_secs {
            Some(secs) => config.with_request_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

impl fmt::Debug for R2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("R2Config")
            .field("account_id", &self.account_id)
            .field("bucket_name", &self.bucket_name)
            .field("public_url", &self.public_url)
            .field("api_token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
