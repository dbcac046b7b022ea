//! Client error types
//!
//! Every failed call is normalized into one of these variants so call sites
//! can branch on the failure class without inspecting transport details.

use crate::types::{ErrorBody, FieldError};
use reqwest::StatusCode;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP 429
    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    /// HTTP 5xx
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// No response within the client timeout
    #[error("Request timed out")]
    Timeout,

    /// No response received at all
    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    /// Any other non-2xx response, passed through for the caller to inspect
    #[error("Request failed with status {status}: {message}")]
    Unhandled {
        status: u16,
        message: String,
        errors: Vec<FieldError>,
    },

    /// 2xx response whose envelope reported `success: false`
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    /// Response body did not match the expected shape
    #[error("Serialization error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code and raw response body
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .filter(|m| !m.trim().is_empty())
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty() && !trimmed.starts_with('{')).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .map_or_else(|| status.to_string(), str::to_string)
            });

        match status.as_u16() {
            429 => Self::RateLimited { message },
            500..=599 => Self::ServerError {
                status: status.as_u16(),
                message,
            },
            code => Self::Unhandled {
                status: code,
                message,
                errors: parsed.errors,
            },
        }
    }

    /// Classify a failure that happened before a response was read
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_builder() {
            Self::Configuration(error.to_string())
        } else {
            Self::NetworkUnreachable(error.to_string())
        }
    }

    /// HTTP status of the response, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::ServerError { status, .. } | Self::Unhandled { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected the bearer token
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Field-level validation messages, if the backend sent any
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Unhandled { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Message suitable for showing to an end user
    pub fn user_message(&self) -> String {
        match self {
            Self::RateLimited { .. } => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            Self::ServerError { .. } => {
                "The server encountered an error. Please try again later.".to_string()
            }
            Self::Timeout => {
                "The request timed out. Please check your connection and try again.".to_string()
            }
            Self::NetworkUnreachable(_) => {
                "Unable to reach the server. Please check your connection.".to_string()
            }
            Self::Unhandled { message, .. } | Self::Rejected { message } => message.clone(),
            Self::Decode(_) => "Received an unexpected response from the server.".to_string(),
            Self::Configuration(_) => self.to_string(),
        }
    }
}
