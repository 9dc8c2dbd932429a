//! HTTP client for upstream GraphQL communication.
//!
//! This module provides the [`HttpClient`] type, which sends JSON `POST`
//! requests to a single upstream endpoint with a fixed set of default headers.

use std::collections::HashMap;

use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::HttpResponse;
use crate::config::EndpointUrl;

/// Crate version from Cargo.toml.
pub const GATEWAY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client bound to one upstream endpoint.
///
/// The client handles:
/// - Default headers including User-Agent, Accept and Content-Type
/// - JSON body parsing, falling back to `{"raw_body": ...}` for non-JSON replies
///
/// Each call to [`request`](Self::request) performs exactly one HTTP attempt.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use gql_gateway::clients::{HttpClient, HttpRequest};
/// use gql_gateway::EndpointUrl;
/// use serde_json::json;
///
/// let endpoint = EndpointUrl::new("https://7tv.io/v4/gql")?;
/// let client = HttpClient::new(endpoint, Default::default(), None)?;
///
/// let request = HttpRequest::new(json!({ "query": "{ badges { badges { id } } }" }))?;
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Upstream endpoint every request is posted to.
    endpoint: EndpointUrl,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the given endpoint.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The upstream GraphQL URL
    /// * `extra_default_headers` - Upstream-specific headers sent on every request
    ///   (for example Twitch's `Client-ID`)
    /// * `user_agent_prefix` - Optional prefix prepended to the User-Agent
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g. TLS backend initialization failure).
    pub fn new(
        endpoint: EndpointUrl,
        extra_default_headers: HashMap<String, String>,
        user_agent_prefix: Option<&str>,
    ) -> Result<Self, HttpError> {
        let user_agent_prefix =
            user_agent_prefix.map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}gql-gateway v{GATEWAY_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        default_headers.extend(extra_default_headers);

        // Decompression is negotiated by reqwest's gzip/brotli/deflate features
        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            endpoint,
            default_headers,
        })
    }

    /// Posts a request to the upstream endpoint with the default headers.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Response`), carrying the raw payload
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut req_builder = self.client.post(self.endpoint.as_ref());
        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }
        req_builder = req_builder.body(request.body().to_string());

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;
        let body = Self::parse_body(&body_text);

        let response = HttpResponse::new(code, res_headers, body);

        if response.is_ok() {
            return Ok(response);
        }

        tracing::debug!(
            endpoint = %self.endpoint,
            status = code,
            "Upstream returned non-success status"
        );

        Err(HttpError::Response(HttpResponseError {
            code,
            request_id: response.request_id().map(String::from),
            body: response.body,
        }))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Parses a body as JSON, keeping unparseable text under `raw_body`.
    fn parse_body(body_text: &str) -> serde_json::Value {
        if body_text.is_empty() {
            return serde_json::json!({});
        }
        serde_json::from_str(body_text)
            .unwrap_or_else(|_| serde_json::json!({ "raw_body": body_text }))
    }
}
