//! Stored image references.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::fallback::InlineEncoder;
use super::key::StorageKey;

/// Reference an owning record keeps to its image.
///
/// The variant decides how the image is deleted. Records that only persisted
/// the URL string can recover it with [`StoredReference::classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoredReference {
    /// Object stored in the bucket, served from the public base URL.
    Remote {
        /// Public URL.
        url: String,
        /// Object key.
        key: StorageKey,
    },
    /// Image bytes embedded in a `data:` URI.
    Inline {
        /// The data URI.
        data_uri: String,
    },
    /// Stock placeholder image that owns no stored object.
    Placeholder {
        /// Placeholder URL.
        url: String,
    },
}

impl StoredReference {
    /// Recover the reference kind from a stored URL string.
    ///
    /// `data:` URIs are inline and URLs under `public_base` are remote. Any
    /// other URL containing `placeholder_marker` is a placeholder, and the rest
    /// are remote. Returns `None` for blank input or a remote URL with no key
    /// segment.
    #[must_use]
    pub fn classify(raw: &str, public_base: &str, placeholder_marker: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if InlineEncoder::is_inline(raw) {
            return Some(Self::Inline {
                data_uri: raw.to_string(),
            });
        }

        // Uploaded keys may contain the marker in their sanitized file name.
        if let Some(key) = key_under_public_base(raw, public_base) {
            return Some(Self::Remote {
                url: raw.to_string(),
                key,
            });
        }

        if !placeholder_marker.is_empty() && raw.contains(placeholder_marker) {
            return Some(Self::Placeholder {
                url: raw.to_string(),
            });
        }

        last_segment_key(raw).map(|key| Self::Remote {
            url: raw.to_string(),
            key,
        })
    }

    /// The URL string to hand to a browser.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Remote { url, .. } | Self::Placeholder { url } => url,
            Self::Inline { data_uri } => data_uri,
        }
    }

    /// Object key, for remote references.
    #[must_use]
    pub fn storage_key(&self) -> Option<&StorageKey> {
        match self {
            Self::Remote { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Whether the image lives in the bucket.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Short name of the variant.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Remote { .. } => "remote",
            Self::Inline { .. } => "inline",
            Self::Placeholder { .. } => "placeholder",
        }
    }
}

impl fmt::Display for StoredReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

fn url_path(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

fn non_empty_key(key: &str) -> Option<StorageKey> {
    (!key.is_empty()).then(|| StorageKey::new(key))
}

/// Object key of a URL served from the public base: everything after it.
fn key_under_public_base(url: &str, public_base: &str) -> Option<StorageKey> {
    let public_base = public_base.trim_end_matches('/');
    if public_base.is_empty() {
        return None;
    }

    url_path(url)
        .strip_prefix(public_base)
        .and_then(|rest| rest.strip_prefix('/'))
        .and_then(non_empty_key)
}

/// Object key of a foreign URL: its last path segment.
fn last_segment_key(url: &str) -> Option<StorageKey> {
    url_path(url).rsplit('/').next().and_then(non_empty_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BASE: &str = "https://images.example.com";
    const MARKER: &str = "placeholder.svg";

    #[rstest]
    #[case("data:image/png;base64,iVBORw0KGgo=", "inline")]
    #[case("/placeholder.svg?height=400&width=600", "placeholder")]
    #[case("https://images.example.com/123-abcd1234-lake.png", "remote")]
    #[case("https://cdn.other.net/photos/lake.png", "remote")]
    fn test_classify_kind(#[case] raw: &str, #[case] kind: &str) {
        let reference = StoredReference::classify(raw, BASE, MARKER).expect("classified");
        assert_eq!(reference.kind(), kind);
        assert_eq!(reference.url(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("https://images.example.com/")]
    fn test_classify_nothing_to_route(#[case] raw: &str) {
        assert_eq!(StoredReference::classify(raw, BASE, MARKER), None);
    }

    #[test]
    fn test_remote_key_under_public_base() {
        let reference = StoredReference::classify(
            "https://images.example.com/gallery/123-abcd1234-lake.png?v=2",
            "https://images.example.com/",
            MARKER,
        )
        .expect("classified");

        assert_eq!(
            reference.storage_key().map(StorageKey::as_str),
            Some("gallery/123-abcd1234-lake.png")
        );
        assert!(reference.is_remote());
    }

    #[test]
    fn test_remote_key_from_foreign_url_uses_last_segment() {
        let reference =
            StoredReference::classify("https://cdn.other.net/photos/lake.png", BASE, MARKER)
                .expect("classified");
        assert_eq!(
            reference.storage_key().map(StorageKey::as_str),
            Some("lake.png")
        );
    }

    #[test]
    fn test_inline_takes_precedence_over_placeholder() {
        let reference =
            StoredReference::classify("data:text/plain;base64,cGxhY2Vob2xkZXIuc3Zn", BASE, MARKER)
                .expect("classified");
        assert_eq!(reference.kind(), "inline");
        assert_eq!(reference.storage_key(), None);
    }

    #[rstest]
    #[case("https://images.example.com/1700000000000-abcd1234-placeholder.svg")]
    #[case("https://images.example.com/gallery/placeholder.svg?v=3")]
    fn test_public_url_containing_marker_is_remote(#[case] raw: &str) {
        let reference = StoredReference::classify(raw, BASE, MARKER).expect("classified");
        assert_eq!(reference.kind(), "remote");
        assert!(reference.storage_key().is_some());
    }

    #[test]
    fn test_marker_outside_public_base_is_placeholder() {
        let reference = StoredReference::classify(
            "https://cdn.other.net/static/placeholder.svg",
            BASE,
            MARKER,
        )
        .expect("classified");
        assert_eq!(reference.kind(), "placeholder");
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let reference = StoredReference::Remote {
            url: format!("{BASE}/k.png"),
            key: StorageKey::new("k.png"),
        };
        let json = serde_json::to_value(&reference).expect("serialize");
        assert_eq!(json["kind"], "remote");
        assert_eq!(json["key"], "k.png");

        let back: StoredReference = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, reference);
    }
}
