//! Favscan Common - Shared types and traits
//!
//! This crate provides the data model, probe options, error type and the
//! prober seam used across the favscan fingerprinting engine.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{FavscanError, FavscanResult};
pub use traits::Prober;
pub use types::{
    FingerprintResult, MatchRecord, ProbeOptions, ProbeResult, Signature, SignatureParam,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
