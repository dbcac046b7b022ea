//! Banquet core types and utilities

pub mod config;
pub mod error;
pub mod token_store;
pub mod tracing;
pub mod types;

pub use config::Settings;
pub use error::{CoreError, CoreResult};
pub use token_store::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};
pub use types::{Role, UnknownRole, User};
