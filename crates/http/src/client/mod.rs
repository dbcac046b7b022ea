//! Banquet HTTP client
//!
//! One [`ApiClient`] is built per backend resource group. Each client reads
//! the token store before every request, so a login or logout elsewhere in
//! the process is visible to the next call without rebuilding anything.

pub mod auth;
pub mod error;
pub mod resources;

pub use auth::AuthClient;
pub use error::ClientError;
pub use resources::{ResourceClient, ResourceKind, Upload};

use crate::types::ApiResponse;
use banquet_core::config::{ApiSettings, DEFAULT_TIMEOUT_SECS};
use banquet_core::{MemoryTokenStore, TokenStore};
use bytes::Bytes;
use reqwest::{Client, ClientBuilder, header};
use serde::de::{DeserializeOwned, Error as _};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Header carrying the static API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Token-aware API client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder carrying the current credentials
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);

        if let Some(token) = self.tokens.read() {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }

        request
    }

    /// Execute a request and decode the raw JSON body
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let body = self.send(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Execute a request and unwrap the `data` of its response envelope
    pub async fn execute_envelope<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let envelope: ApiResponse<T> = self.execute(request).await?;

        if !envelope.success {
            return Err(ClientError::Rejected {
                message: envelope
                    .message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            });
        }

        envelope.data.ok_or_else(|| {
            ClientError::Decode(serde_json::Error::custom(
                "response envelope has no data",
            ))
        })
    }

    /// Execute a request whose response carries no data, returning its message
    pub async fn execute_ack(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<String>, ClientError> {
        let body = self.send(request).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let envelope: ApiResponse<serde_json::Value> = serde_json::from_slice(&body)?;
        if envelope.success {
            Ok(envelope.message)
        } else {
            Err(ClientError::Rejected {
                message: envelope
                    .message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            })
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Bytes, ClientError> {
        let request = request.build().map_err(ClientError::from_transport)?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "Sending request");

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let error = ClientError::from_transport(e);
                warn!(%method, %path, error = %error, "Request failed without a response");
                return Err(error);
            }
        };

        let status = response.status();
        if status.is_success() {
            response.bytes().await.map_err(ClientError::from_transport)
        } else {
            let body = response.text().await.unwrap_or_default();
            let error = ClientError::from_status(status, &body);
            warn!(%method, %path, status = status.as_u16(), error = %error, "Request failed");
            Err(error)
        }
    }
}

/// Builder for [`ApiClient`]
#[derive(Clone, Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    tokens: Option<Arc<dyn TokenStore>>,
}

impl ApiClientBuilder {
    /// Start from the `[api]` settings section
    pub fn from_settings(settings: &ApiSettings) -> Self {
        let mut builder = Self::default()
            .base_url(&settings.base_url)
            .timeout(settings.timeout())
            .user_agent(&settings.user_agent);
        if let Some(api_key) = &settings.api_key {
            builder = builder.api_key(api_key);
        }
        builder
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the static API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the token store read before each request
    pub fn token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        url::Url::parse(&base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url {base_url:?}: {e}")))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let client = ClientBuilder::new()
            .timeout(
                self.timeout
                    .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            )
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| format!("banquet-client/{}", env!("CARGO_PKG_VERSION"))),
            )
            .build()
            .map_err(ClientError::from_transport)?;

        Ok(ApiClient {
            client,
            base_url,
            api_key: self.api_key,
            tokens: self
                .tokens
                .unwrap_or_else(|| Arc::new(MemoryTokenStore::new())),
        })
    }
}
