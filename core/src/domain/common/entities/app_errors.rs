use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("no file")]
    MissingImage,

    #[error("invalid user id")]
    InvalidUserId,

    #[error("history store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("object storage error: {0}")]
    ObjectStorageError(String),

    #[error("external service error: {0}")]
    ExternalServiceError(String),

    #[error("internal server error")]
    InternalServerError,
}

impl CoreError {
    /// Errors caused by the caller's input rather than by the service.
    pub fn is_input_error(&self) -> bool {
        matches!(self, CoreError::MissingImage | CoreError::InvalidUserId)
    }
}
