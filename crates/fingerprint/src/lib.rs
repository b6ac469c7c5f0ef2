//! Fingerprint Engine - favicon digests and signature matching
//!
//! This module provides:
//! - MD5 content digests in the format the signature corpus uses
//! - The load-once signature store and its digest lookup

mod digest;
mod store;

pub use digest::{digest, DIGEST_LEN};
pub use store::SignatureStore;
