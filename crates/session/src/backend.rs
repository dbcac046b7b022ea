//! Remote side of the session: credential exchange, identity resolution and
//! token invalidation

use async_trait::async_trait;
use banquet_core::User;
use banquet_http::client::{AuthClient, ClientError};
use banquet_http::types::{AuthPayload, Credentials, RegisterRequest};

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, ClientError>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, ClientError>;

    /// Resolve the account behind the currently stored token
    ///
    /// Never touches the token store; the caller decides what a failure means.
    async fn resolve_identity(&self) -> Result<User, ClientError>;

    async fn logout(&self) -> Result<(), ClientError>;
}

#[async_trait]
impl AuthBackend for AuthClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, ClientError> {
        AuthClient::login(self, credentials).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, ClientError> {
        AuthClient::register(self, request).await
    }

    async fn resolve_identity(&self) -> Result<User, ClientError> {
        self.me().await
    }

    async fn logout(&self) -> Result<(), ClientError> {
        AuthClient::logout(self).await.map(|_| ())
    }
}

// Mock implementation for testing
#[cfg(test)]
pub mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub AuthBackend {}

        #[async_trait]
        impl AuthBackend for AuthBackend {
            async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, ClientError>;
            async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, ClientError>;
            async fn resolve_identity(&self) -> Result<User, ClientError>;
            async fn logout(&self) -> Result<(), ClientError>;
        }
    }
}
