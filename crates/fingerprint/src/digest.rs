//! Favicon content digest
//!
//! The signature corpus is keyed by MD5, so that is what we compute. It is
//! used for lookup compatibility only.

/// Length of a hex-encoded digest.
pub const DIGEST_LEN: usize = 32;

/// Lowercase hex MD5 of `bytes`.
#[inline]
#[must_use]
pub fn digest(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}
