//! Mapping of resource errors onto HTTP responses.
//!
//! Every error body is a JSON object with an `error` member:
//!
//! | Error | Status | Body |
//! |---|---|---|
//! | missing or invalid parameter | 400 | `{"error": "Missing ?login="}` |
//! | GraphQL `errors` from an upstream | 400 | `{"error": [...]}` |
//! | entity not found | 404 | `{"error": "<message>"}` |
//! | transport or decode failure | 500 | `{"error": "<Upstream> request failed", "details": ...}` |
//! | upstream answered without data | 500 | `{"error": "<message>"}` |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::clients::graphql::GraphqlError;
use crate::resources::ResourceError;

/// A handler error, rendered as a JSON response.
#[derive(Debug)]
pub struct ApiError(pub ResourceError);

impl From<ResourceError> for ApiError {
    fn from(error: ResourceError) -> Self {
        Self(error)
    }
}

impl From<GraphqlError> for ApiError {
    fn from(error: GraphqlError) -> Self {
        Self(ResourceError::Graphql(error))
    }
}

impl ApiError {
    /// Returns the status code and JSON body for this error.
    #[must_use]
    pub fn status_and_body(&self) -> (StatusCode, Value) {
        match &self.0 {
            ResourceError::MissingParameter { .. } | ResourceError::InvalidParameter { .. } => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.0.to_string() }))
            }
            ResourceError::NotFound { message } => {
                (StatusCode::NOT_FOUND, json!({ "error": message }))
            }
            ResourceError::EmptyResponse { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
            ResourceError::Graphql(GraphqlError::Upstream { errors, .. }) => {
                (StatusCode::BAD_REQUEST, json!({ "error": errors }))
            }
            ResourceError::Graphql(GraphqlError::Http { upstream, source }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": format!("{upstream} request failed"),
                    "details": source.details(),
                }),
            ),
            ResourceError::Graphql(error @ GraphqlError::Decode { upstream, .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": format!("{upstream} request failed"),
                    "details": error.to_string(),
                }),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }
        (status, Json(body)).into_response()
    }
}
