//! Storage key generation.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key of an object in the bucket.
///
/// Generated keys have the form `{unix_millis}-{random}-{sanitized_name}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Wrap an existing key, e.g. one recovered from a public URL.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Generate a fresh key for an upload of `original_name`.
    #[must_use]
    pub fn generate(original_name: &str) -> Self {
        let millis = Utc::now().timestamp_millis();
        let random = Uuid::new_v4().simple().to_string();

        Self(format!(
            "{millis}-{}-{}",
            &random[..8],
            sanitize_file_name(original_name)
        ))
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Sanitize a file name for use in a storage key.
///
/// Only ASCII alphanumerics, dots and hyphens are kept; every other character
/// becomes `_`. Applying it twice yields the same string as applying it once.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    if name.is_empty() {
        return "file".to_string();
    }

    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case("lake.png", "lake.png")]
    #[case("my photo!.png", "my_photo_.png")]
    #[case("sunrise (1).jpg", "sunrise__1_.jpg")]
    #[case("already_safe.jpg", "already_safe.jpg")]
    #[case("हिमालय.jpg", "______.jpg")]
    #[case("", "file")]
    fn test_sanitize_file_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_file_name(input), expected);
    }

    #[test]
    fn test_generate_key_format() {
        let key = StorageKey::generate("my photo!.png");
        let parts: Vec<&str> = key.as_str().splitn(3, '-').collect();

        assert_eq!(parts.len(), 3);
        assert!(parts[0].parse::<i64>().is_ok());
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(parts[2], "my_photo_.png");
    }

    #[test]
    fn test_generate_keys_are_distinct() {
        let keys: HashSet<StorageKey> = (0..1000)
            .map(|_| StorageKey::generate("gallery.jpg"))
            .collect();
        assert_eq!(keys.len(), 1000);
    }

    #[test]
    fn test_key_serializes_as_string() {
        let key = StorageKey::new("123-abc-file.png");
        assert_eq!(
            serde_json::to_string(&key).expect("serialize"),
            "\"123-abc-file.png\""
        );
    }
}
