//! Application error types

use taskboard_domain::{DomainError, TokenDecodeError};
use thiserror::Error;

use crate::gateway::ApiError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No session is stored.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The session was evicted; the user must sign in again.
    #[error("session ended, sign in again")]
    SignedOut,

    /// The stored access token cannot be read.
    #[error("invalid access token: {0}")]
    InvalidToken(#[from] TokenDecodeError),

    /// The backend answered successfully but without the expected body.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A request body could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
