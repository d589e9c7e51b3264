use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use std::fmt;

/// Second-precision upload timestamp embedded in every key.
pub const KEY_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
/// Only this many leading bytes of the image are hashed.
pub const HASHED_PREFIX_LEN: usize = 1000;
/// Hex characters of the digest kept in the key.
pub const DIGEST_HEX_LEN: usize = 8;
/// Extension used for every key, whatever the uploaded format.
pub const KEY_EXTENSION: &str = "jpg";

/// Storage key of a preview, e.g. `previews/20240518_142301_9f86d081.jpg`.
///
/// Two uploads within the same second whose first [`HASHED_PREFIX_LEN`] bytes match
/// map to the same key and the later write replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn derive(folder: &str, uploaded_at: DateTime<Utc>, image: &[u8]) -> Self {
        let timestamp = uploaded_at.format(KEY_TIMESTAMP_FORMAT);
        let digest = prefix_digest(image);
        Self(format!("{}/{timestamp}_{digest}.{KEY_EXTENSION}", folder.trim_matches('/')))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// MD5 of at most the first [`HASHED_PREFIX_LEN`] bytes, truncated to [`DIGEST_HEX_LEN`] hex chars.
fn prefix_digest(image: &[u8]) -> String {
    let prefix = &image[..image.len().min(HASHED_PREFIX_LEN)];
    let mut hex = format!("{:x}", Md5::digest(prefix));
    hex.truncate(DIGEST_HEX_LEN);
    hex
}
