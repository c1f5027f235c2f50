//! Deterministic short id derivation.

use md5::{Digest, Md5};

/// Length of a short id in hex characters.
pub const SHORT_ID_LEN: usize = 8;

/// Derives the short id for a URL.
///
/// The id is the first [`SHORT_ID_LEN`] characters of the lowercase hex MD5
/// digest of the URL's UTF-8 bytes. Identical inputs always produce identical
/// ids, which lets a resubmitted URL map back to its existing record without a
/// read-before-write.
///
/// # Examples
///
/// ```
/// use shawty::utils::short_id::derive_short_id;
///
/// assert_eq!(derive_short_id("https://www.google.com"), "8ffdefbd");
/// ```
pub fn derive_short_id(original_url: &str) -> String {
    let digest = Md5::digest(original_url.as_bytes());
    // 4 bytes encode to exactly SHORT_ID_LEN hex chars
    hex::encode(&digest[..SHORT_ID_LEN / 2])
}
