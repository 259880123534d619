//! HTTP gateway to the storefront backend.
//!
//! Resource-specific calls live in the sibling modules as further
//! `impl BackendClient` blocks.

mod addresses;
mod admin;
mod cache;
mod carts;
mod envelope;
mod orders;
mod products;
mod users;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, instrument};
use url::Url;
use uuid::Uuid;

use crate::backend::{ApiError, Result};
use crate::config::StorefrontConfig;

use cache::ReadCache;
use envelope::unwrap_envelope;

/// Called with the status code when the backend answers 401 or 403.
pub type UnauthorizedHook = Arc<dyn Fn(u16) + Send + Sync>;

/// Header carrying the per-request correlation id.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest response body excerpt written to the log.
const LOG_BODY_LIMIT: usize = 500;

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the storefront backend REST API.
///
/// Cheap to clone; clones share the HTTP connection pool, the read cache
/// and the bearer token.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    /// Bearer token for authenticated calls
    token: RwLock<Option<SecretString>>,
    cache: ReadCache,
    on_unauthorized: RwLock<Option<UnauthorizedHook>>,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Build` if the HTTP client cannot be constructed.
    pub fn new(config: &StorefrontConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Build(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.clone(),
                timeout: config.timeout,
                token: RwLock::new(config.api_token.clone()),
                cache: ReadCache::new(config.cache_ttl),
                on_unauthorized: RwLock::new(None),
            }),
        })
    }

    /// The configured API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Set or replace the bearer token.
    ///
    /// Cached reads belong to the previous identity and are dropped.
    pub async fn set_token(&self, token: SecretString) {
        *self.inner.token.write().await = Some(token);
        self.inner.cache.clear().await;
    }

    /// Drop the bearer token and every cached read.
    pub async fn clear_token(&self) {
        *self.inner.token.write().await = None;
        self.inner.cache.clear().await;
    }

    /// Whether a bearer token is currently held.
    pub async fn has_token(&self) -> bool {
        self.inner.token.read().await.is_some()
    }

    /// Register the callback run when the backend answers 401 or 403.
    ///
    /// Replaces any previously registered callback.
    pub async fn on_unauthorized(&self, hook: UnauthorizedHook) {
        *self.inner.on_unauthorized.write().await = Some(hook);
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// GET through the read cache.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-success status, or if
    /// the payload does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.resolve(path)?;
        let value = self
            .inner
            .cache
            .get_or_fetch(url.to_string(), self.send(Method::GET, path, url, None))
            .await?;
        decode(path, &value)
    }

    /// POST a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-success status, or if
    /// the payload does not decode as `T`.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = encode(path, body)?;
        let value = self.write(Method::POST, path, Some(body)).await?;
        decode(path, &value)
    }

    /// PUT a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-success status, or if
    /// the payload does not decode as `T`.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = encode(path, body)?;
        let value = self.write(Method::PUT, path, Some(body)).await?;
        decode(path, &value)
    }

    /// PATCH a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-success status, or if
    /// the payload does not decode as `T`.
    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = encode(path, body)?;
        let value = self.write(Method::PATCH, path, Some(body)).await?;
        decode(path, &value)
    }

    /// DELETE. Any response payload is returned undecoded.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or non-success status.
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.write(Method::DELETE, path, None).await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Absolute URLs pass through; everything else joins onto the base URL.
    fn resolve(&self, path: &str) -> Result<Url> {
        let joined = if path.starts_with("http") {
            Url::parse(path)
        } else {
            self.inner.base_url.join(path.trim_start_matches('/'))
        };
        joined.map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Send a mutating request, then clear the read cache regardless of
    /// the outcome.
    async fn write(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = self.resolve(path)?;
        let result = self.send(method, path, url, body).await;
        self.inner.cache.clear().await;
        result
    }

    #[instrument(skip(self, url, body), fields(request_id = tracing::field::Empty))]
    async fn send(
        &self,
        method: Method,
        path: &str,
        url: Url,
        body: Option<Value>,
    ) -> Result<Value> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let mut request = self
            .inner
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, &request_id)
            .timeout(self.inner.timeout);

        if let Some(token) = self.inner.token.read().await.as_ref() {
            request = request.bearer_auth(token.expose_secret());
        }
        // `json` also sets the content type; bodiless requests carry none
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(path, &e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(path, &e))?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %text.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                "Backend returned non-success status"
            );
            if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
                self.handle_unauthorized(status).await;
            }
            return Err(ApiError::Http {
                status: status.as_u16(),
                path: path.to_string(),
                body: text,
            });
        }

        debug!(status = %status, "Backend request succeeded");

        unwrap_envelope(&text).map_err(|e| {
            error!(
                error = %e,
                body = %text.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Decode {
                path: path.to_string(),
                message: e.to_string(),
            }
        })
    }

    fn transport_error(&self, path: &str, err: &reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout {
                path: path.to_string(),
                timeout_ms: u64::try_from(self.inner.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            ApiError::Network {
                path: path.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Drop the token and tell whoever owns the session.
    async fn handle_unauthorized(&self, status: StatusCode) {
        self.clear_token().await;
        let hook = self.inner.on_unauthorized.read().await.clone();
        if let Some(hook) = hook {
            hook(status.as_u16());
        }
    }
}

fn encode<B: Serialize + ?Sized>(path: &str, body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| ApiError::Encode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(path: &str, value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}
