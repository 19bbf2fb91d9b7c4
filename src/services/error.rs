use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid filename: {0}")]
    InvalidName(String),

    #[error("Could not allocate a unique name for {0}")]
    NameExhausted(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for ApplicationError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound(_) => ApplicationError::NotFound("File not found".to_string()),
            StorageError::InvalidName(_) => {
                ApplicationError::BadRequest("Invalid filename".to_string())
            }
            StorageError::NameExhausted(_) | StorageError::Io(_) => {
                ApplicationError::InternalError(error.to_string())
            }
        }
    }
}
