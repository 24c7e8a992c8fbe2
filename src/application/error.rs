use crate::domain::payload::PayloadError;

#[derive(Debug)]
pub enum ApplicationError {
    NotFound,
    InternalError(String),
    DatabaseError(String),
    BadRequest(String),
    Unauthorized,
    Forbidden,
    PayloadTooLarge,
    UnsupportedMediaType(String),
    /// The attachment exists but its data cannot be served in full.
    AttachmentUnavailable(String),
    InvalidToken,
}

impl From<PayloadError> for ApplicationError {
    fn from(error: PayloadError) -> Self {
        ApplicationError::AttachmentUnavailable(format!("Stored payload is corrupt: {}", error))
    }
}
