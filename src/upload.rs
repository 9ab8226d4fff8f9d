//! Upload collaborator boundary
//!
//! Remote storage is an external collaborator: it accepts a local file and a
//! destination name/mimetype and reports success or failure. Credential
//! management and upload semantics live behind this trait.

use async_trait::async_trait;
use std::path::Path;

/// Upload errors
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The configured backend rejected or failed the upload
    #[error("upload failed: {0}")]
    Failed(String),

    /// The local file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for generated report files.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload a local file under a remote name.
    async fn upload(
        &self,
        local_path: &Path,
        remote_name: &str,
        source_mime: &str,
        dest_mime: &str,
    ) -> Result<(), UploadError>;
}
