use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::{
    fs::{self, File, OpenOptions},
    io::AsyncWriteExt,
};
use tracing::{debug, info, warn};

use crate::{
    application::{
        error::ApplicationError,
        services::{BulkDeleteReport, StorageService, UploadSink},
    },
    domain::models::file::{is_valid_stored_name, unique_file_name, StoredFile},
    services::error::StorageError,
};

const MAX_NAME_ATTEMPTS: usize = 5;
const SUFFIX_RANGE: u32 = 1_000_000_000;

/// Stores uploads as plain files in a single directory. The directory
/// listing is the only source of truth; nothing is indexed in memory.
pub struct LocalStorageService {
    root: PathBuf,
}

impl LocalStorageService {
    /// Creates the storage directory (and missing parents) if it is absent.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();

        if !fs::try_exists(&root).await? {
            fs::create_dir_all(&root).await?;
            info!("Created upload directory at {}", root.display());
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn generate_file_name(original_name: &str) -> String {
        let suffix = rand::rng().random_range(0..SUFFIX_RANGE);
        unique_file_name(original_name, Utc::now().timestamp_millis(), suffix)
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_stored_name(name) {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

async fn stat(path: &Path, name: String) -> std::io::Result<StoredFile> {
    let metadata = fs::metadata(path).await?;
    // Not every platform/filesystem reports a birth time.
    let created = metadata.created().or_else(|_| metadata.modified())?;

    Ok(StoredFile {
        name,
        size: metadata.len(),
        uploaded_at: DateTime::<Utc>::from(created),
    })
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn begin_upload(
        &self,
        original_name: &str,
    ) -> Result<Box<dyn UploadSink>, ApplicationError> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = Self::generate_file_name(original_name);
            let path = self.resolve(&name)?;

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => {
                    debug!("Writing upload {} to {}", original_name, path.display());
                    return Ok(Box::new(LocalUploadSink {
                        name,
                        path,
                        file,
                        written: 0,
                    }));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    warn!("Generated name {} already taken, retrying", name);
                }
                Err(e) => return Err(StorageError::from(e).into()),
            }
        }

        Err(StorageError::NameExhausted(original_name.to_string()).into())
    }

    async fn list(&self) -> Result<Vec<StoredFile>, ApplicationError> {
        let mut entries = fs::read_dir(&self.root).await.map_err(StorageError::from)?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(StorageError::from)? {
            // Such a name could not be addressed through the API.
            let Ok(name) = entry.file_name().into_string() else {
                warn!("Skipping non UTF-8 entry {:?}", entry.file_name());
                continue;
            };

            match stat(&entry.path(), name).await {
                Ok(file) => files.push(file),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("Entry vanished during listing: {:?}", entry.file_name());
                }
                Err(e) => return Err(StorageError::from(e).into()),
            }
        }

        files.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| b.name.cmp(&a.name))
        });

        Ok(files)
    }

    async fn delete(&self, name: &str) -> Result<(), ApplicationError> {
        let path = self.resolve(name)?;

        fs::remove_file(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(name.to_string()),
            _ => StorageError::from(e),
        })?;

        Ok(())
    }

    async fn delete_all(&self) -> Result<BulkDeleteReport, ApplicationError> {
        let mut entries = fs::read_dir(&self.root).await.map_err(StorageError::from)?;
        let mut snapshot = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(StorageError::from)? {
            snapshot.push(entry.file_name());
        }

        let mut report = BulkDeleteReport::default();

        for file_name in snapshot {
            let name = file_name.to_string_lossy().into_owned();

            match fs::remove_file(self.root.join(&file_name)).await {
                Ok(()) => report.deleted.push(name),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("{} already removed", name);
                }
                Err(e) => report.errors.push(format!("{}: {}", name, e)),
            }
        }

        Ok(report)
    }
}

pub struct LocalUploadSink {
    name: String,
    path: PathBuf,
    file: File,
    written: u64,
}

#[async_trait]
impl UploadSink for LocalUploadSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn bytes_written(&self) -> u64 {
        self.written
    }

    async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), ApplicationError> {
        self.file
            .write_all(chunk)
            .await
            .map_err(StorageError::from)?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    async fn finish(self: Box<Self>) -> Result<StoredFile, ApplicationError> {
        let LocalUploadSink {
            name,
            path,
            mut file,
            ..
        } = *self;

        let flushed = file.flush().await;
        drop(file);

        let result = match flushed {
            Ok(()) => stat(&path, name).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(stored) => Ok(stored),
            Err(e) => {
                if let Err(remove_err) = fs::remove_file(&path).await {
                    debug!(
                        "Could not remove unfinished upload {}: {}",
                        path.display(),
                        remove_err
                    );
                }
                Err(StorageError::from(e).into())
            }
        }
    }

    async fn abort(self: Box<Self>) {
        let LocalUploadSink { path, file, .. } = *self;
        drop(file);

        if let Err(e) = fs::remove_file(&path).await {
            warn!("Failed to remove partial upload {}: {}", path.display(), e);
        }
    }
}
