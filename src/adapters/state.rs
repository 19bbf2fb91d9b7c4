use std::sync::Arc;

use crate::{application::services::StorageService, domain::config::server::ServerConfig};

#[derive(Debug, Clone)]
pub struct UploadLimits {
    pub max_file_size: u64,
    pub max_files: usize,
    pub size_label: String,
}

impl From<&ServerConfig> for UploadLimits {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
            max_files: config.max_files,
            size_label: config.max_file_size_label(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub storage_service: Arc<dyn StorageService>,
    pub upload_limits: UploadLimits,
}

impl AppState {
    pub fn new(storage_service: Arc<dyn StorageService>, config: &ServerConfig) -> Self {
        Self {
            storage_service,
            upload_limits: UploadLimits::from(config),
        }
    }
}
