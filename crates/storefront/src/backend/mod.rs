//! REST client for the storefront backend.
//!
//! # Architecture
//!
//! - [`BackendClient`] is the only place that talks HTTP
//! - Responses wrapped in a `{success, data}` envelope are unwrapped
//!   transparently; anything else is returned as parsed
//! - GETs go through a short-lived in-process cache (10 second TTL by
//!   default) that also collapses concurrent identical requests
//! - Every write clears the whole read cache, whether it succeeded or not
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config)?;
//!
//! let cart = client.my_cart().await?;
//! let products = client.products_by_ids(&[ProductId::new(7)]).await?;
//! ```

mod client;
pub mod conversions;
pub mod endpoints;
pub mod types;

pub use client::{BackendClient, UnauthorizedHook};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the backend.
///
/// `Clone` so a single failed fetch can be handed to every caller that was
/// waiting on it through the read cache.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request did not complete within the configured timeout.
    #[error("Request to {path} timed out after {timeout_ms}ms")]
    Timeout { path: String, timeout_ms: u64 },

    /// The request failed before a response arrived.
    #[error("Network error on {path}: {message}")]
    Network { path: String, message: String },

    /// The backend answered with a non-success status.
    #[error("HTTP {status} on {path}")]
    Http {
        status: u16,
        path: String,
        /// Raw response body, as received.
        body: String,
    },

    /// The response body was not the JSON shape expected.
    #[error("Failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },

    /// The request body could not be serialized.
    #[error("Failed to encode request to {path}: {message}")]
    Encode { path: String, message: String },

    /// The path could not be turned into a URL.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl ApiError {
    /// HTTP status, if the backend answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401 or 403: the session is gone or the caller lacks permission.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// 409: the backend refused a state change.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Failures worth retrying unchanged: timeouts, transport errors, 5xx.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            Self::Decode { .. } | Self::Encode { .. } | Self::InvalidUrl(_) | Self::Build(_) => {
                false
            }
        }
    }
}

/// Result type alias for backend calls.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Http {
            status: 404,
            path: "/products/9".to_string(),
            body: "{\"message\":\"not found\"}".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 on /products/9");

        let err = ApiError::Timeout {
            path: "/carts/me".to_string(),
            timeout_ms: 15_000,
        };
        assert_eq!(err.to_string(), "Request to /carts/me timed out after 15000ms");
    }

    #[test]
    fn test_api_error_classification() {
        let http = |status| ApiError::Http {
            status,
            path: "/x".to_string(),
            body: String::new(),
        };

        assert!(http(401).is_unauthorized());
        assert!(http(403).is_unauthorized());
        assert!(!http(404).is_unauthorized());
        assert!(http(409).is_conflict());
        assert!(http(404).is_not_found());
        assert!(http(503).is_retryable());
        assert!(!http(400).is_retryable());

        let timeout = ApiError::Timeout {
            path: "/x".to_string(),
            timeout_ms: 1,
        };
        assert!(timeout.is_retryable());
        assert_eq!(timeout.status(), None);
    }
}
