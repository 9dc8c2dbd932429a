//! HTTP request types for upstream GraphQL calls.
//!
//! Every upstream call the gateway makes is a JSON `POST` to a fixed
//! endpoint with the client's default headers, so a request is just its
//! body. The body is validated once, when the request is created.

use crate::clients::errors::InvalidHttpRequestError;

/// A validated JSON request body to be posted upstream.
///
/// # Example
///
/// ```rust
/// use gql_gateway::clients::HttpRequest;
/// use serde_json::json;
///
/// let request = HttpRequest::new(json!({ "query": "{ __typename }" })).unwrap();
/// assert!(request.body().is_object());
///
/// assert!(HttpRequest::new(json!([1, 2])).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    body: serde_json::Value,
}

impl HttpRequest {
    /// Creates a request around a GraphQL body.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::NonObjectBody`] if `body` is not a
    /// JSON object.
    pub fn new(body: impl Into<serde_json::Value>) -> Result<Self, InvalidHttpRequestError> {
        let body = body.into();
        if !body.is_object() {
            return Err(InvalidHttpRequestError::NonObjectBody {
                kind: json_kind(&body),
            });
        }
        Ok(Self { body })
    }

    /// Returns the JSON body.
    #[must_use]
    pub const fn body(&self) -> &serde_json::Value {
        &self.body
    }
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
