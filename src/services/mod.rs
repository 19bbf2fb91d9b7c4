mod error;
mod local_storage;

pub use error::StorageError;
pub use local_storage::LocalStorageService;

use std::sync::Arc;

use tracing::info;

use crate::{application::services::StorageService, domain::config::server::ServerConfig};

/// Prepares the storage directory. Failure here is fatal to startup.
pub async fn create_storage_service(
    config: &ServerConfig,
) -> Result<Arc<dyn StorageService>, StorageError> {
    let service = LocalStorageService::new(&config.upload_dir).await?;
    info!("Storing uploads in {}", service.root().display());
    Ok(Arc::new(service))
}
