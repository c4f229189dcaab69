use std::io;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::StoragePath;

/// Staging area for uploaded PDFs. Files are written once at upload time
/// and read back by the analysis pipeline; nothing in the core ever deletes
/// them.
#[async_trait::async_trait]
pub trait UploadStore: Send + Sync {
    async fn store(
        &self,
        path: &StoragePath,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, UploadStoreError>;

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, UploadStoreError>;

    /// Size of the stored object; `NotFound` if nothing exists at `path`.
    async fn head(&self, path: &StoragePath) -> Result<u64, UploadStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UploadStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
