use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::file::{StoredFile, UploadedFile};

#[derive(Debug, Serialize)]
pub struct FileRecordResponse {
    pub name: String,
    #[serde(rename = "originalName", skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    pub size: u64,
    #[serde(rename = "uploadTime")]
    pub upload_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub url: String,
}

impl From<StoredFile> for FileRecordResponse {
    fn from(file: StoredFile) -> Self {
        Self {
            mime_type: file.mime_type().to_string(),
            url: file.url(),
            name: file.name,
            original_name: None,
            size: file.size,
            upload_time: file.uploaded_at,
        }
    }
}

impl From<UploadedFile> for FileRecordResponse {
    fn from(upload: UploadedFile) -> Self {
        Self {
            original_name: Some(upload.original_name),
            ..Self::from(upload.stored)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListFilesResponse {
    pub success: bool,
    pub files: Vec<FileRecordResponse>,
}

#[derive(Debug, Serialize)]
pub struct UploadFileResponse {
    pub success: bool,
    pub file: FileRecordResponse,
}

#[derive(Debug, Serialize)]
pub struct UploadFilesResponse {
    pub success: bool,
    pub files: Vec<FileRecordResponse>,
}

#[derive(Debug, Serialize)]
pub struct DeleteFileResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteAllResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "deletedCount")]
    pub deleted_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}
