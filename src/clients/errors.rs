//! HTTP-specific error types for upstream communication.
//!
//! This module contains error types for HTTP operations: non-2xx responses,
//! request validation failures and network errors.
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: Non-2xx HTTP responses from an upstream
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! There is no retry-exhaustion variant: every request is attempted exactly
//! once and the first failure is returned to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use gql_gateway::clients::{HttpClient, HttpRequest, HttpError};
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => {
//!         println!("Upstream error {}: {}", e.code, e.body);
//!     }
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when an upstream answers with a non-successful status.
///
/// The raw response payload is kept verbatim so it can be handed back to the
/// gateway's caller for diagnostics.
///
/// # Example
///
/// ```rust
/// use gql_gateway::clients::HttpResponseError;
/// use serde_json::json;
///
/// let error = HttpResponseError {
///     code: 503,
///     body: json!({ "error": "Service Unavailable" }),
///     request_id: None,
/// };
///
/// assert!(error.to_string().contains("503"));
/// ```
#[derive(Debug, Error)]
#[error("Upstream responded with status {code}: {body}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The response body as JSON, or `{"raw_body": "..."}` if it was not JSON.
    pub body: serde_json::Value,
    /// Request ID from the upstream's `X-Request-Id` header, if any.
    pub request_id: Option<String>,
}

/// Error returned when an HTTP request fails validation.
///
/// Raised before anything is sent over the wire.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// GraphQL bodies must be JSON objects.
    #[error("Request body must be a JSON object, got {kind}.")]
    NonObjectBody {
        /// The JSON kind that was provided.
        kind: &'static str,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the diagnostic payload to pass back to the gateway's caller.
    ///
    /// For upstream responses this is the raw body; for every other failure
    /// it is the error message as a JSON string.
    #[must_use]
    pub fn details(&self) -> serde_json::Value {
        match self {
            Self::Response(e) => e.body.clone(),
            other => serde_json::Value::String(other.to_string()),
        }
    }
}
