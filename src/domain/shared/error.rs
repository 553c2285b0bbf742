//! Domain errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
