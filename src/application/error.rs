#[derive(Debug)]
pub enum ApplicationError {
    NotFound(String),
    BadRequest(String),
    PayloadTooLarge(String),
    InternalError(String),
}

impl ApplicationError {
    pub fn message(&self) -> &str {
        match self {
            ApplicationError::NotFound(msg)
            | ApplicationError::BadRequest(msg)
            | ApplicationError::PayloadTooLarge(msg)
            | ApplicationError::InternalError(msg) => msg,
        }
    }
}
