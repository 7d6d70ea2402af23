use super::types::TagId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Tag with ID {0} not found")]
    NotFound(TagId),

    #[error("Tag with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),
}

pub type Result<T> = std::result::Result<T, TagError>;

impl From<serde_json::Error> for TagError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for TagError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Store(err.to_string())
    }
}
