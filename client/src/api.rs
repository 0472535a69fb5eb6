//! Remote profile service client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The reconciler and editors talk to the profile service through the
//! `ProfileService` trait so they can be driven by a mock in tests and by
//! `HttpProfileService` (reqwest) in the CLI.
//!
//! ERROR HANDLING
//! ==============
//! The service reports failures as `{success: false, message}` bodies on
//! 4xx/5xx as well as 200, so the body is parsed regardless of status. Only
//! transport failures and unparseable bodies become `ApiError`. Nothing is
//! retried.

use std::time::Duration;

use async_trait::async_trait;
use profiles::{ApiResponse, LogEntryRequest, ProfileUpdate, ProviderSignInRequest, SignInResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_API_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_API_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const SIGN_IN_PATH: &str = "/api/google-auth";
pub const UPDATE_PATH: &str = "/api/editar_usuario";
pub const LOG_PATH: &str = "/api/log";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("profile service request failed: {0}")]
    Transport(String),
    #[error("profile service returned an unreadable body (HTTP {status})")]
    Malformed { status: u16 },
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// Operations offered by the remote profile service.
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Create or link the account for a provider identity.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unreadable body.
    async fn provider_sign_in(&self, request: &ProviderSignInRequest) -> Result<SignInResponse, ApiError>;

    /// Apply a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unreadable body.
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<ApiResponse, ApiError>;

    /// Forward one front-end log line.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unreadable body.
    async fn send_log(&self, entry: &str) -> Result<ApiResponse, ApiError>;
}

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeouts: ApiTimeouts,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeouts: ApiTimeouts {
                request_secs: DEFAULT_API_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_API_CONNECT_TIMEOUT_SECS,
            },
        }
    }

    /// Build client config from environment variables.
    ///
    /// Optional:
    /// - `PROFILE_API_BASE_URL`: default `http://localhost:3000`
    /// - `PROFILE_API_REQUEST_TIMEOUT_SECS`: default 30
    /// - `PROFILE_API_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("PROFILE_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let parse = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(default)
        };
        Self {
            timeouts: ApiTimeouts {
                request_secs: parse("PROFILE_API_REQUEST_TIMEOUT_SECS", DEFAULT_API_REQUEST_TIMEOUT_SECS),
                connect_secs: parse("PROFILE_API_CONNECT_TIMEOUT_SECS", DEFAULT_API_CONNECT_TIMEOUT_SECS),
            },
            ..Self::new(&base_url)
        }
    }

    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpProfileService {
    http: reqwest::Client,
    config: ApiConfig,
}

impl HttpProfileService {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        tracing::debug!(%url, status, bytes = text.len(), "profile service responded");
        parse_body(status, &text)
    }
}

#[async_trait]
impl ProfileService for HttpProfileService {
    async fn provider_sign_in(&self, request: &ProviderSignInRequest) -> Result<SignInResponse, ApiError> {
        self.post_json(SIGN_IN_PATH, request).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<ApiResponse, ApiError> {
        self.post_json(UPDATE_PATH, update).await
    }

    async fn send_log(&self, entry: &str) -> Result<ApiResponse, ApiError> {
        let body = LogEntryRequest { log_entry: Some(entry.to_owned()) };
        self.post_json(LOG_PATH, &body).await
    }
}

/// Parse a response body of any status.
pub(crate) fn parse_body<T: DeserializeOwned>(status: u16, text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| {
        tracing::warn!(status, error = %e, "unparseable profile service body");
        ApiError::Malformed { status }
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
