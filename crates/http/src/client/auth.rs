//! Authentication API client methods

use super::{ApiClient, ClientError};
use crate::types::{AuthPayload, Credentials, RegisterRequest};
use banquet_core::User;
use reqwest::Method;

/// Client for the `/auth` resource group
#[derive(Clone)]
pub struct AuthClient {
    inner: ApiClient,
}

impl AuthClient {
    pub fn new(inner: ApiClient) -> Self {
        Self { inner }
    }

    /// Exchange credentials for a token and the account behind it
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, ClientError> {
        let request = self
            .inner
            .request(Method::POST, "/auth/login")
            .json(credentials);
        self.inner.execute_envelope(request).await
    }

    /// Create an account and sign in as it
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, ClientError> {
        let request = self
            .inner
            .request(Method::POST, "/auth/register")
            .json(request);
        self.inner.execute_envelope(request).await
    }

    /// Get the account owning the stored token
    pub async fn me(&self) -> Result<User, ClientError> {
        let request = self.inner.request(Method::GET, "/auth/me");
        self.inner.execute_envelope(request).await
    }

    /// Invalidate the stored token on the backend
    pub async fn logout(&self) -> Result<Option<String>, ClientError> {
        let request = self.inner.request(Method::POST, "/auth/logout");
        self.inner.execute_ack(request).await
    }
}
