//! GraphQL client implementation for the Twitch and 7TV upstreams.
//!
//! This module provides the [`GraphqlClient`] type for executing a single
//! [`Operation`] against one upstream, and [`Upstreams`], which owns one
//! client per upstream and dispatches operations to the right one.

use std::collections::HashMap;

use futures::future::try_join_all;

use crate::clients::graphql::{ErrorPolicy, GraphqlError, GraphqlResponse, Operation, Upstream};
use crate::clients::{HttpClient, HttpError, HttpRequest};
use crate::config::{EndpointUrl, GatewayConfig};

/// GraphQL client bound to one upstream.
///
/// Every call to [`execute`](Self::execute) issues exactly one HTTP `POST`.
/// Nothing is retried and nothing is cached.
///
/// # Thread Safety
///
/// `GraphqlClient` is `Send + Sync`, making it safe to share across async tasks.
#[derive(Debug)]
pub struct GraphqlClient {
    /// The upstream this client talks to.
    upstream: Upstream,
    /// The internal HTTP client for making requests.
    http_client: HttpClient,
}

// Verify GraphqlClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

impl GraphqlClient {
    /// Creates a new GraphQL client.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the underlying HTTP client cannot be built.
    pub fn new(
        upstream: Upstream,
        endpoint: EndpointUrl,
        default_headers: HashMap<String, String>,
        user_agent_prefix: Option<&str>,
    ) -> Result<Self, HttpError> {
        let http_client = HttpClient::new(endpoint, default_headers, user_agent_prefix)?;
        Ok(Self {
            upstream,
            http_client,
        })
    }

    /// Returns the upstream this client talks to.
    #[must_use]
    pub const fn upstream(&self) -> Upstream {
        self.upstream
    }

    /// Executes one GraphQL operation.
    ///
    /// Twitch answers batched bodies with a JSON array; the first element of
    /// an array reply is treated as the envelope.
    ///
    /// # Errors
    ///
    /// - [`GraphqlError::Http`] for network failures and non-2xx replies
    ///   without a GraphQL `errors` body
    /// - [`GraphqlError::Upstream`] for GraphQL `errors`, subject to the
    ///   operation's [`ErrorPolicy`]
    /// - [`GraphqlError::Decode`] if the reply is not a GraphQL envelope
    pub async fn execute(&self, operation: &Operation) -> Result<GraphqlResponse, GraphqlError> {
        let upstream = self.upstream;
        tracing::debug!(
            %upstream,
            operation = operation.label(),
            "Dispatching GraphQL operation"
        );

        let request = HttpRequest::new(operation.to_body()).map_err(|e| GraphqlError::Http {
            upstream,
            source: e.into(),
        })?;

        let response = match self.http_client.request(request).await {
            Ok(response) => response,
            Err(HttpError::Response(e)) => {
                if let Some(errors) = graphql_errors(&e.body) {
                    return Err(GraphqlError::Upstream { upstream, errors });
                }
                return Err(GraphqlError::Http {
                    upstream,
                    source: HttpError::Response(e),
                });
            }
            Err(source) => return Err(GraphqlError::Http { upstream, source }),
        };

        let envelope = match response.body {
            serde_json::Value::Array(mut replies) if !replies.is_empty() => replies.swap_remove(0),
            serde_json::Value::Array(_) => serde_json::Value::Null,
            body => body,
        };

        let envelope: GraphqlResponse = if envelope.is_null() {
            GraphqlResponse::default()
        } else {
            serde_json::from_value(envelope).map_err(|source| GraphqlError::Decode {
                upstream,
                operation: operation.label(),
                source,
            })?
        };

        self.apply_error_policy(envelope, operation)
    }

    fn apply_error_policy(
        &self,
        envelope: GraphqlResponse,
        operation: &Operation,
    ) -> Result<GraphqlResponse, GraphqlError> {
        if envelope.errors().is_empty() {
            return Ok(envelope);
        }

        let data_missing = envelope.data.as_ref().map_or(true, serde_json::Value::is_null);
        let fail = match operation.error_policy() {
            ErrorPolicy::Strict => true,
            ErrorPolicy::Lenient => data_missing,
        };

        if fail {
            return Err(GraphqlError::Upstream {
                upstream: self.upstream,
                errors: envelope.errors.unwrap_or_default(),
            });
        }

        tracing::warn!(
            upstream = %self.upstream,
            operation = operation.label(),
            errors = %serde_json::Value::Array(envelope.errors().to_vec()),
            "Upstream returned partial data with GraphQL errors"
        );
        Ok(envelope)
    }
}

/// Extracts a non-empty GraphQL `errors` array from an error body.
fn graphql_errors(body: &serde_json::Value) -> Option<Vec<serde_json::Value>> {
    let errors = body.get("errors")?.as_array()?;
    if errors.is_empty() {
        None
    } else {
        Some(errors.clone())
    }
}

/// The set of upstream clients, one per platform.
///
/// # Example
///
/// ```rust,ignore
/// use gql_gateway::clients::graphql::{Operation, Upstream, Upstreams};
///
/// let upstreams = Upstreams::from_config(&config)?;
/// let response = upstreams
///     .execute(&Operation::query(Upstream::SevenTv, "query { badges { badges { id } } }"))
///     .await?;
/// ```
#[derive(Debug)]
pub struct Upstreams {
    twitch: GraphqlClient,
    seventv: GraphqlClient,
}

// Verify Upstreams is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Upstreams>();
};

impl Upstreams {
    /// Builds both upstream clients from configuration.
    ///
    /// The Twitch client sends the configured `Client-ID` on every request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if an HTTP client cannot be built.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, HttpError> {
        let mut twitch_headers = HashMap::new();
        twitch_headers.insert(
            "Client-ID".to_string(),
            config.twitch_client_id().as_ref().to_string(),
        );

        let twitch = GraphqlClient::new(
            Upstream::Twitch,
            config.twitch_endpoint().clone(),
            twitch_headers,
            config.user_agent_prefix(),
        )?;
        let seventv = GraphqlClient::new(
            Upstream::SevenTv,
            config.seventv_endpoint().clone(),
            HashMap::new(),
            config.user_agent_prefix(),
        )?;

        Ok(Self { twitch, seventv })
    }

    /// Returns the client for an upstream.
    #[must_use]
    pub const fn client(&self, upstream: Upstream) -> &GraphqlClient {
        match upstream {
            Upstream::Twitch => &self.twitch,
            Upstream::SevenTv => &self.seventv,
        }
    }

    /// Executes one operation against its upstream.
    ///
    /// # Errors
    ///
    /// See [`GraphqlClient::execute`].
    pub async fn execute(&self, operation: &Operation) -> Result<GraphqlResponse, GraphqlError> {
        self.client(operation.upstream()).execute(operation).await
    }

    /// Executes independent operations concurrently.
    ///
    /// All operations are issued before any is awaited. Replies are returned
    /// in the order the operations were given, regardless of completion
    /// order. The first failure fails the whole batch and drops the
    /// remaining in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns the first [`GraphqlError`] observed.
    pub async fn execute_all(
        &self,
        operations: &[Operation],
    ) -> Result<Vec<GraphqlResponse>, GraphqlError> {
        try_join_all(operations.iter().map(|op| self.execute(op))).await
    }
}
