//! Error types shared across Mochi crates.

use std::path::PathBuf;

/// Top-level error type for Mochi operations.
#[derive(Debug, thiserror::Error)]
pub enum MochiError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Media error: {message}")]
    Media { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Download error: {message}")]
    Download { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using MochiError.
pub type MochiResult<T> = Result<T, MochiError>;

impl MochiError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media {
            message: msg.into(),
        }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
        }
    }

    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download {
            message: msg.into(),
        }
    }
}
