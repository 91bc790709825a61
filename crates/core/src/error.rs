//! Error taxonomy for the decoration store

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by store operations.
///
/// None of these are fatal to the host: callers log them, and only
/// `WriteFailure` is surfaced to the user.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The host's data root could not be resolved (e.g. non-local vault
    /// adapter). Decorations are disabled for the session.
    #[error("decoration storage unavailable: data root could not be resolved")]
    StorageUnavailable,

    /// The backing file is not a JSON array of `[path, status]` pairs.
    #[error("corrupt decoration config at {path}: {source}")]
    CorruptConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The backing file exists but could not be read.
    #[error("failed to read decoration config at {path}: {source}")]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file could not be written (permissions, disk full, ...).
    #[error("failed to write decoration config at {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A host path could not be turned into a map key.
    #[error("invalid decoration path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// A persisted status ordinal outside the closed enum.
    #[error("unknown decoration status ordinal {0}")]
    UnknownStatus(u8),
}

impl StoreError {
    /// Whether this error should be surfaced to the user (once per session)
    pub fn is_user_visible(&self) -> bool {
        matches!(self, StoreError::WriteFailure { .. })
    }
}
