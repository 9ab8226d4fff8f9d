//! CLI error types and conversions

use crate::output::FormatError;
use crate::session::SessionError;
use crate::upload::UploadError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Session error
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Output format error
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Upload error
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid argument combination
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
