//! GraphQL-specific error types.
//!
//! # Error Handling
//!
//! - [`GraphqlError::Http`]: The call failed at the transport level, or the
//!   upstream answered with a non-2xx status and no GraphQL `errors` body
//! - [`GraphqlError::Upstream`]: The upstream reported GraphQL `errors`
//! - [`GraphqlError::Decode`]: The `data` payload did not have the expected shape
//!
//! # Example
//!
//! ```rust,ignore
//! use gql_gateway::clients::graphql::GraphqlError;
//!
//! match upstreams.execute(&operation).await {
//!     Ok(response) => println!("Data: {:?}", response.data),
//!     Err(GraphqlError::Upstream { errors, .. }) => println!("GraphQL errors: {errors:?}"),
//!     Err(e) => println!("Request failed: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::graphql::Upstream;
use crate::clients::HttpError;

/// Error type for GraphQL operations.
///
/// # Example
///
/// ```rust
/// use gql_gateway::clients::graphql::{GraphqlError, Upstream};
/// use gql_gateway::clients::{HttpError, HttpResponseError};
/// use serde_json::json;
///
/// let error = GraphqlError::Http {
///     upstream: Upstream::Twitch,
///     source: HttpError::Response(HttpResponseError {
///         code: 502,
///         body: json!({ "raw_body": "Bad Gateway" }),
///         request_id: None,
///     }),
/// };
/// assert!(error.to_string().starts_with("Twitch request failed"));
/// ```
#[derive(Debug, Error)]
pub enum GraphqlError {
    /// An HTTP-level error occurred.
    #[error("{upstream} request failed: {source}")]
    Http {
        /// The upstream that failed.
        upstream: Upstream,
        /// The underlying HTTP error.
        #[source]
        source: HttpError,
    },

    /// The upstream answered with GraphQL `errors`.
    #[error("{upstream} returned {} GraphQL error(s)", .errors.len())]
    Upstream {
        /// The upstream that reported the errors.
        upstream: Upstream,
        /// The `errors` array, verbatim.
        errors: Vec<serde_json::Value>,
    },

    /// The response payload did not match the expected shape.
    #[error("{upstream} response to {operation} could not be decoded: {source}")]
    Decode {
        /// The upstream that answered.
        upstream: Upstream,
        /// The operation label.
        operation: &'static str,
        /// The deserialization error.
        #[source]
        source: serde_json::Error,
    },
}

impl GraphqlError {
    /// Returns the upstream the error originated from.
    #[must_use]
    pub const fn upstream(&self) -> Upstream {
        match self {
            Self::Http { upstream, .. }
            | Self::Upstream { upstream, .. }
            | Self::Decode { upstream, .. } => *upstream,
        }
    }
}
