//! Banquet HTTP client
//!
//! Typed clients for the dashboard backend: the auth endpoints and one CRUD
//! client per resource group, all sharing the bearer-token pipeline.

pub mod client;
pub mod types;

pub use client::{
    ApiClient, ApiClientBuilder, AuthClient, ClientError, ResourceClient, ResourceKind, Upload,
};
pub use types::{ApiResponse, AuthPayload, Credentials, FieldError, ListQuery, Page, RegisterRequest};
