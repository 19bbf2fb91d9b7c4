mod storage_service;

pub use storage_service::{BulkDeleteReport, StorageService, UploadSink};
