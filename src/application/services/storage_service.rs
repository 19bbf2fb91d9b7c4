use async_trait::async_trait;

use crate::{application::error::ApplicationError, domain::models::file::StoredFile};

/// Outcome of removing every file in storage.
#[derive(Debug, Default)]
pub struct BulkDeleteReport {
    pub deleted: Vec<String>,
    pub errors: Vec<String>,
}

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Reserves a unique name for `original_name` and opens it for writing.
    async fn begin_upload(
        &self,
        original_name: &str,
    ) -> Result<Box<dyn UploadSink>, ApplicationError>;
    /// All stored files, newest first.
    async fn list(&self) -> Result<Vec<StoredFile>, ApplicationError>;
    async fn delete(&self, name: &str) -> Result<(), ApplicationError>;
    async fn delete_all(&self) -> Result<BulkDeleteReport, ApplicationError>;
}

/// An upload in progress. Either `finish` or `abort` must be called.
#[async_trait]
pub trait UploadSink: Send {
    fn name(&self) -> &str;
    fn bytes_written(&self) -> u64;
    async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), ApplicationError>;
    /// Flushes the file and returns its metadata as read back from storage.
    async fn finish(self: Box<Self>) -> Result<StoredFile, ApplicationError>;
    /// Removes whatever was written so far.
    async fn abort(self: Box<Self>);
}
