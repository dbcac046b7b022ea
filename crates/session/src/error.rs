//! Session error types

use banquet_core::CoreError;
use banquet_http::client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend refused the credentials or registration data
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The backend could not be asked
    #[error(transparent)]
    Request(ClientError),

    /// The new token could not be persisted
    #[error("Failed to store token: {0}")]
    Storage(#[from] CoreError),
}

impl SessionError {
    /// Split backend failures into credential rejections and transport problems
    pub fn from_client(error: ClientError) -> Self {
        match error {
            ClientError::Rejected { .. } => Self::InvalidCredentials(error.user_message()),
            ClientError::Unhandled { status, .. } if matches!(status, 400 | 401 | 403 | 422) => {
                Self::InvalidCredentials(error.user_message())
            }
            other => Self::Request(other),
        }
    }

    /// Message suitable for a notification toast
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials(message) => message.clone(),
            Self::Request(error) => error.user_message(),
            Self::Storage(_) => "Signed in, but the session could not be saved.".to_string(),
        }
    }
}
