//! Secure Auth API client

pub mod auth;
pub mod error;

use error::ClientError;
use reqwest::{Client, ClientBuilder};
use secure_auth_core::AppConfig;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Client for the public authentication endpoints
#[derive(Clone, Debug)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a client pointed at the configured API
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(config.api_base_url.clone())
    }

    /// Create a new client builder
    pub fn builder() -> AuthClientBuilder {
        AuthClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder for an API path
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Execute a request and handle common errors.
    ///
    /// Success bodies come back as raw JSON for the caller to validate.
    pub async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::from_status(status, &body))
        }
    }

    /// POST a JSON body
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ClientError> {
        tracing::debug!(path, "POST");
        let request = self.request(reqwest::Method::POST, path).json(body);
        self.execute(request).await.inspect_err(|e| {
            tracing::warn!(path, error = %e, "Auth API call failed");
        })
    }
}

/// Builder for [`AuthClient`]
#[derive(Debug, Default)]
pub struct AuthClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl AuthClientBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[cfg(not(target_arch = "wasm32"))]
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<AuthClient, ClientError> {
        let base_url = self
            .base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?
            .trim_end_matches('/')
            .to_string();

        #[cfg(not(target_arch = "wasm32"))]
        let client = {
            let mut builder = ClientBuilder::new().user_agent("secure-auth-client/0.1.0");
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            builder.build()?
        };

        #[cfg(target_arch = "wasm32")]
        let client = {
            let _ = self.timeout; // Timeouts not supported on WASM
            ClientBuilder::new().build()?
        };

        Ok(AuthClient { client, base_url })
    }
}
