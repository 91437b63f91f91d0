//! Error types for policy loading and inference.
//!
//! Every variant is recoverable: the caller's response to any of these is to
//! keep simulating under manual control.

use thiserror::Error;

/// Errors from policy loading and inference.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Failed to load checkpoint weights.
    #[error("failed to load checkpoint from {path}: {reason}")]
    LoadCheckpoint {
        /// Path to the checkpoint file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to save checkpoint weights.
    #[error("failed to save checkpoint to {path}: {reason}")]
    SaveCheckpoint {
        /// Path to the checkpoint file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Checkpoint file not found.
    #[error("checkpoint not found: {0}")]
    CheckpointNotFound(String),

    /// Checkpoint extension maps to no known recorder.
    #[error("unsupported checkpoint format: {0}")]
    UnsupportedFormat(String),

    /// Config sidecar missing or unparseable.
    #[error("bad policy config {path}: {reason}")]
    Config {
        /// Path to the sidecar file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Invalid network dimensions.
    #[error("invalid policy configuration: {0}")]
    InvalidConfig(String),
}

impl PolicyError {
    pub fn load_checkpoint(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadCheckpoint {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn save_checkpoint(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SaveCheckpoint {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn config(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;
