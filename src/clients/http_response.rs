//! HTTP response types for upstream calls.
//!
//! This module provides the [`HttpResponse`] type for accessing the status,
//! headers and parsed JSON body of an upstream reply.

use std::collections::HashMap;

/// An HTTP response from an upstream GraphQL endpoint.
///
/// Header names are stored lowercased; a header may repeat, so each name
/// maps to every value received for it.
///
/// # Example
///
/// ```rust
/// use gql_gateway::clients::HttpResponse;
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let mut headers = HashMap::new();
/// headers.insert("x-request-id".to_string(), vec!["req-1".to_string()]);
///
/// let response = HttpResponse::new(200, headers, json!({ "data": null }));
/// assert!(response.is_ok());
/// assert_eq!(response.request_id(), Some("req-1"));
/// ```
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub code: u16,
    /// Response headers (lowercased names).
    pub headers: HashMap<String, Vec<String>>,
    /// Parsed JSON body.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new response.
    #[must_use]
    pub const fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` for 2xx status codes.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the upstream request ID, if the upstream sent one.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_ok_for_2xx_only() {
        for code in [200, 201, 204, 299] {
            assert!(HttpResponse::new(code, HashMap::new(), json!({})).is_ok());
        }
        for code in [199, 301, 400, 500] {
            assert!(!HttpResponse::new(code, HashMap::new(), json!({})).is_ok());
        }
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            vec!["application/json".to_string()],
        );
        let response = HttpResponse::new(200, headers, json!({}));

        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn test_request_id_returns_first_value() {
        let mut headers = HashMap::new();
        headers.insert(
            "x-request-id".to_string(),
            vec!["first".to_string(), "second".to_string()],
        );
        let response = HttpResponse::new(200, headers, json!({}));

        assert_eq!(response.request_id(), Some("first"));
    }
}
