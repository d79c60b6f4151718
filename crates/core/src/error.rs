use thiserror::Error;

use crate::config::ConfigError;

/// Top-level failure modes of a single document-splitting request.
///
/// Local, recoverable conditions (empty document, unsupported grammar)
/// never surface here — they degrade to well-defined fallback output.
/// Remote and configuration errors are fatal to the request.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Unreadable input where the caller requires at least one file.
    #[error("input error: {0}")]
    Input(String),

    /// The embedding oracle failed (network, auth, quota). The whole
    /// document fails; no partial chunk list is produced.
    #[error("embedding service error: {0}")]
    Remote(String),

    /// Invalid parameters, rejected before any segmentation work.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
