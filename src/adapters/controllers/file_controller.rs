use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{error, info, warn};

use crate::{
    adapters::{
        dto::file_dto::{
            DeleteAllResponse, DeleteFileResponse, FileRecordResponse, ListFilesResponse,
            UploadFileResponse, UploadFilesResponse,
        },
        state::{AppState, UploadLimits},
    },
    application::{error::ApplicationError, services::StorageService},
    domain::models::file::{client_file_name, UploadedFile},
};

#[derive(Debug, Clone, Copy)]
enum UploadKind {
    Single,
    Multiple,
}

impl UploadKind {
    fn field_name(self) -> &'static str {
        match self {
            UploadKind::Single => "file",
            UploadKind::Multiple => "files",
        }
    }

    fn max_files(self, limits: &UploadLimits) -> usize {
        match self {
            UploadKind::Single => 1,
            UploadKind::Multiple => limits.max_files,
        }
    }

    fn no_file_message(self) -> &'static str {
        match self {
            UploadKind::Single => "No file uploaded",
            UploadKind::Multiple => "No files uploaded",
        }
    }

    fn too_large_message(self, limits: &UploadLimits) -> String {
        match self {
            UploadKind::Single => {
                format!("File too large. Maximum size is {}.", limits.size_label)
            }
            UploadKind::Multiple => format!(
                "One or more files are too large. Maximum size is {} per file.",
                limits.size_label
            ),
        }
    }

    fn too_many_message(self, limits: &UploadLimits) -> String {
        match self {
            UploadKind::Single => "Only one file may be uploaded".to_string(),
            UploadKind::Multiple => {
                format!("Too many files. Maximum is {} per request.", limits.max_files)
            }
        }
    }
}

fn multipart_error(error: MultipartError, too_large_message: &str) -> ApplicationError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApplicationError::PayloadTooLarge(too_large_message.to_string())
    } else {
        warn!("Invalid multipart data: {}", error);
        ApplicationError::BadRequest(format!("Invalid multipart data: {}", error.body_text()))
    }
}

/// Streams one file part to storage, enforcing the per-file cap as bytes arrive.
async fn receive_file(
    storage: &dyn StorageService,
    mut field: Field<'_>,
    max_file_size: u64,
    too_large_message: &str,
) -> Result<UploadedFile, ApplicationError> {
    let original_name = client_file_name(field.file_name());
    let mut sink = storage.begin_upload(&original_name).await?;

    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                if sink.bytes_written() + chunk.len() as u64 > max_file_size {
                    warn!(
                        "Upload {} ({}) exceeds {} bytes",
                        original_name,
                        sink.name(),
                        max_file_size
                    );
                    sink.abort().await;
                    return Err(ApplicationError::PayloadTooLarge(
                        too_large_message.to_string(),
                    ));
                }
                if let Err(e) = sink.write_chunk(&chunk).await {
                    sink.abort().await;
                    return Err(e);
                }
            }
            Ok(None) => break,
            Err(e) => {
                sink.abort().await;
                return Err(multipart_error(e, too_large_message));
            }
        }
    }

    let stored = sink.finish().await?;
    info!(
        "Stored upload {} as {} ({} bytes)",
        original_name, stored.name, stored.size
    );

    Ok(UploadedFile {
        original_name,
        stored,
    })
}

async fn discard(storage: &dyn StorageService, uploads: &[UploadedFile]) {
    for upload in uploads {
        if let Err(e) = storage.delete(&upload.stored.name).await {
            warn!(
                "Failed to discard {} after a failed upload: {}",
                upload.stored.name,
                e.message()
            );
        }
    }
}

/// Collects every file part under the kind's field name. On any failure the
/// files already stored by this request are removed again.
async fn collect_uploads(
    app_state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    kind: UploadKind,
) -> Result<Vec<UploadedFile>, ApplicationError> {
    let storage = app_state.storage_service.as_ref();
    let limits = &app_state.upload_limits;
    let too_large_message = kind.too_large_message(limits);

    let mut multipart = multipart.map_err(|e| {
        warn!("Upload request is not multipart: {}", e);
        ApplicationError::BadRequest(kind.no_file_message().to_string())
    })?;

    let mut uploads: Vec<UploadedFile> = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                discard(storage, &uploads).await;
                return Err(multipart_error(e, &too_large_message));
            }
        };

        // Parts without a filename are plain form fields, not files.
        if field.name() != Some(kind.field_name()) || field.file_name().is_none() {
            continue;
        }

        if uploads.len() >= kind.max_files(limits) {
            discard(storage, &uploads).await;
            return Err(ApplicationError::BadRequest(kind.too_many_message(limits)));
        }

        match receive_file(storage, field, limits.max_file_size, &too_large_message).await {
            Ok(upload) => uploads.push(upload),
            Err(e) => {
                discard(storage, &uploads).await;
                return Err(e);
            }
        }
    }

    if uploads.is_empty() {
        return Err(ApplicationError::BadRequest(
            kind.no_file_message().to_string(),
        ));
    }

    Ok(uploads)
}

pub struct FileController;

impl FileController {
    /// GET /api/files
    pub async fn list_files(
        State(app_state): State<AppState>,
    ) -> Result<Json<ListFilesResponse>, ApplicationError> {
        let files = app_state.storage_service.list().await?;

        Ok(Json(ListFilesResponse {
            success: true,
            files: files.into_iter().map(FileRecordResponse::from).collect(),
        }))
    }

    /// POST /api/upload, single file under the `file` field
    pub async fn upload_file(
        State(app_state): State<AppState>,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Json<UploadFileResponse>, ApplicationError> {
        let mut uploads = collect_uploads(&app_state, multipart, UploadKind::Single).await?;
        let upload = uploads.remove(0);

        Ok(Json(UploadFileResponse {
            success: true,
            file: FileRecordResponse::from(upload),
        }))
    }

    /// POST /api/upload-multiple, files under the `files` field in part order
    pub async fn upload_files(
        State(app_state): State<AppState>,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Json<UploadFilesResponse>, ApplicationError> {
        let uploads = collect_uploads(&app_state, multipart, UploadKind::Multiple).await?;
        info!("Stored {} files from multi upload", uploads.len());

        Ok(Json(UploadFilesResponse {
            success: true,
            files: uploads.into_iter().map(FileRecordResponse::from).collect(),
        }))
    }

    /// DELETE /api/files/{filename}
    pub async fn delete_file(
        State(app_state): State<AppState>,
        Path(filename): Path<String>,
    ) -> Result<Json<DeleteFileResponse>, ApplicationError> {
        app_state.storage_service.delete(&filename).await?;
        info!("Deleted file {}", filename);

        Ok(Json(DeleteFileResponse {
            success: true,
            message: "File deleted successfully".to_string(),
        }))
    }

    /// DELETE /api/files
    pub async fn delete_all_files(
        State(app_state): State<AppState>,
    ) -> Result<(StatusCode, Json<DeleteAllResponse>), ApplicationError> {
        let report = app_state.storage_service.delete_all().await?;
        let deleted_count = report.deleted.len();

        if report.errors.is_empty() {
            info!("Deleted all files ({} removed)", deleted_count);
            return Ok((
                StatusCode::OK,
                Json(DeleteAllResponse {
                    success: true,
                    message: Some("All files deleted successfully".to_string()),
                    error: None,
                    deleted_count,
                    errors: Vec::new(),
                }),
            ));
        }

        error!(
            "Bulk delete removed {} files, {} failed: {:?}",
            deleted_count,
            report.errors.len(),
            report.errors
        );

        Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(DeleteAllResponse {
                success: false,
                message: None,
                error: Some(format!("Failed to delete {} file(s)", report.errors.len())),
                deleted_count,
                errors: report.errors,
            }),
        ))
    }
}
