//! Storage request and result types.

use bytes::Bytes;
use serde::Serialize;

/// Raw file handed over by an admin form.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// File contents.
    pub bytes: Bytes,
    /// Declared media type.
    pub content_type: String,
    /// Original file name.
    pub file_name: String,
}

impl UploadRequest {
    /// Media type used when none was declared.
    pub const DEFAULT_MEDIA_TYPE: &'static str = "application/octet-stream";

    /// Create a new upload request.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Byte length of the payload.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Declared media type, or `application/octet-stream` if blank.
    #[must_use]
    pub fn media_type(&self) -> &str {
        let declared = self.content_type.trim();
        if declared.is_empty() {
            Self::DEFAULT_MEDIA_TYPE
        } else {
            declared
        }
    }
}

/// Object listed from the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    /// Object key.
    pub key: String,
    /// Public URL.
    pub url: String,
    /// Last modification time as reported by the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// Object size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Outcome of a best-effort delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Nothing stored remotely; no call was made.
    Skipped,
    /// The remote object was deleted.
    Deleted,
    /// The remote delete failed. Logged, never propagated.
    Failed(String),
}

impl DeleteOutcome {
    /// Whether the delete left nothing behind that the caller should know about.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Error message of a failed delete.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}
