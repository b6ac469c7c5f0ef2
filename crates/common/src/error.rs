//! Error types for favscan
//!
//! Only startup-time failures (signature database, configuration) are meant
//! to reach a caller. Per-target and per-address failures are logged and
//! folded into empty results by the engine.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FavscanError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Signature file parse error: {0}")]
    Parse(#[from] quick_xml::DeError),

    #[error("Invalid signature #{index}: {reason}")]
    InvalidSignature { index: usize, reason: String },

    #[error("Invalid pattern in signature #{index} ({pattern:?}): {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for favscan operations
pub type FavscanResult<T> = Result<T, FavscanError>;
