//! Inline `data:` URI fallback.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::types::UploadRequest;

/// Encodes uploads into self-contained `data:` URIs.
///
/// Used when the remote store cannot take the upload. Encoding never fails and
/// inline data has no server-side lifetime, so deletion is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineEncoder;

impl InlineEncoder {
    /// Prefix every inline reference starts with.
    pub const PREFIX: &'static str = "data:";

    /// Create a new encoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Encode the upload as `data:{media_type};base64,{payload}`.
    #[must_use]
    pub fn upload_image(&self, request: &UploadRequest) -> String {
        format!(
            "{}{};base64,{}",
            Self::PREFIX,
            request.media_type(),
            STANDARD.encode(&request.bytes)
        )
    }

    /// Inline data owns nothing to reclaim.
    pub fn delete_image(&self, _url: &str) {}

    /// Whether `url` is an inline reference.
    #[must_use]
    pub fn is_inline(url: &str) -> bool {
        url.starts_with(Self::PREFIX)
    }
}
