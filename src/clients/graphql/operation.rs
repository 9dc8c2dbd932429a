//! GraphQL operation and response envelope types.
//!
//! An [`Operation`] is an immutable, request-scoped description of one
//! upstream call: which upstream, which document (literal query text or a
//! persisted-query reference) and which variables. Values are always passed
//! as variables; query text is never built by string interpolation.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::clients::graphql::GraphqlError;

/// The upstream platforms the gateway talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Upstream {
    /// Twitch GraphQL (`gql.twitch.tv`).
    Twitch,
    /// 7TV GraphQL (`7tv.io`).
    SevenTv,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Twitch => f.write_str("Twitch"),
            Self::SevenTv => f.write_str("7TV"),
        }
    }
}

/// The document an operation executes.
///
/// A literal query and a persisted-query reference are mutually exclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Document {
    /// Literal GraphQL query text.
    Query(&'static str),
    /// A persisted query known to the upstream by its hash.
    Persisted {
        /// Persisted query protocol version.
        version: u32,
        /// Hex-encoded SHA-256 of the query text.
        sha256_hash: &'static str,
    },
}

/// How GraphQL-level `errors` in a successful HTTP reply are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Fail only when `errors` is present and `data` is null; otherwise log
    /// the errors and keep the partial data.
    #[default]
    Lenient,
    /// Fail whenever `errors` is non-empty.
    Strict,
}

/// One GraphQL operation against one upstream.
///
/// # Example
///
/// ```rust
/// use gql_gateway::clients::graphql::{Operation, Upstream};
/// use serde_json::json;
///
/// let op = Operation::query(Upstream::Twitch, "query Q($login: String!) { user(login: $login) { id } }")
///     .named("Q")
///     .variables(json!({ "login": "forsen" }));
///
/// let body = op.to_body();
/// assert_eq!(body["operationName"], "Q");
/// assert_eq!(body["variables"]["login"], "forsen");
/// ```
#[derive(Clone, Debug)]
pub struct Operation {
    upstream: Upstream,
    operation_name: Option<&'static str>,
    document: Document,
    variables: Value,
    error_policy: ErrorPolicy,
}

impl Operation {
    /// Creates an operation that sends literal query text.
    #[must_use]
    pub fn query(upstream: Upstream, text: &'static str) -> Self {
        Self {
            upstream,
            operation_name: None,
            document: Document::Query(text),
            variables: Value::Object(Map::new()),
            error_policy: ErrorPolicy::default(),
        }
    }

    /// Creates an operation that references a version 1 persisted query.
    ///
    /// Persisted queries are resolved by operation name and hash, so the
    /// name is mandatory here.
    #[must_use]
    pub fn persisted(upstream: Upstream, name: &'static str, sha256_hash: &'static str) -> Self {
        Self {
            upstream,
            operation_name: Some(name),
            document: Document::Persisted {
                version: 1,
                sha256_hash,
            },
            variables: Value::Object(Map::new()),
            error_policy: ErrorPolicy::default(),
        }
    }

    /// Sets the operation name.
    #[must_use]
    pub const fn named(mut self, name: &'static str) -> Self {
        self.operation_name = Some(name);
        self
    }

    /// Sets the operation variables.
    #[must_use]
    pub fn variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }

    /// Makes any GraphQL error in the reply fail the operation.
    #[must_use]
    pub const fn strict(mut self) -> Self {
        self.error_policy = ErrorPolicy::Strict;
        self
    }

    /// Returns the upstream this operation targets.
    #[must_use]
    pub const fn upstream(&self) -> Upstream {
        self.upstream
    }

    /// Returns a label for logs and errors.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.operation_name.unwrap_or("anonymous")
    }

    /// Returns the error policy.
    #[must_use]
    pub const fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// Serializes the operation into the upstream wire format.
    #[must_use]
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(name) = self.operation_name {
            body.insert("operationName".to_string(), json!(name));
        }
        body.insert("variables".to_string(), self.variables.clone());

        match &self.document {
            Document::Query(text) => {
                body.insert("query".to_string(), json!(text));
            }
            Document::Persisted {
                version,
                sha256_hash,
            } => {
                body.insert(
                    "extensions".to_string(),
                    json!({
                        "persistedQuery": {
                            "version": version,
                            "sha256Hash": sha256_hash,
                        }
                    }),
                );
            }
        }

        Value::Object(body)
    }
}

/// The standard GraphQL response envelope.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphqlResponse {
    /// The `data` member; `None` when absent or null.
    #[serde(default)]
    pub data: Option<Value>,
    /// The `errors` member, verbatim.
    #[serde(default)]
    pub errors: Option<Vec<Value>>,
    /// The `extensions` member, verbatim.
    #[serde(default)]
    pub extensions: Option<Value>,
}

impl GraphqlResponse {
    /// Returns the GraphQL errors, or an empty slice.
    #[must_use]
    pub fn errors(&self) -> &[Value] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// Deserializes `data` into a typed payload.
    ///
    /// A null or absent `data` yields `T::default()`, so payload types are
    /// expected to model every field as optional.
    ///
    /// # Errors
    ///
    /// Returns [`GraphqlError::Decode`] if `data` does not match `T`.
    pub fn data_as<T>(&self, operation: &Operation) -> Result<T, GraphqlError>
    where
        T: DeserializeOwned + Default,
    {
        match &self.data {
            None | Some(Value::Null) => Ok(T::default()),
            Some(data) => {
                T::deserialize(data).map_err(|source| GraphqlError::Decode {
                    upstream: operation.upstream(),
                    operation: operation.label(),
                    source,
                })
            }
        }
    }

    /// Returns the raw envelope without its `extensions` member.
    #[must_use]
    pub fn without_extensions(&self) -> Value {
        let mut out = Map::new();
        out.insert(
            "data".to_string(),
            self.data.clone().unwrap_or(Value::Null),
        );
        if let Some(errors) = &self.errors {
            out.insert("errors".to_string(), Value::Array(errors.clone()));
        }
        Value::Object(out)
    }
}
