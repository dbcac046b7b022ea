//! Common error type for core operations

/// Standard result type for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Core error types shared across crates
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Platform directories could not be determined")]
    PlatformDirsNotFound,
}

impl CoreError {
    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
