//! HTTP client types for upstream communication.
//!
//! This module provides the foundational HTTP layer the gateway uses to talk
//! to the Twitch and 7TV GraphQL endpoints, plus the GraphQL layer built on
//! top of it.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client bound to one upstream endpoint
//! - [`HttpRequest`]: A JSON request to be posted upstream
//! - [`HttpResponse`]: A parsed upstream response
//! - [`graphql::Upstreams`]: One GraphQL client per upstream
//! - [`graphql::GraphqlError`]: GraphQL-specific error types
//!
//! # Retry Behavior
//!
//! There is none. Every request is a single attempt and any failure is
//! propagated to the caller unchanged.

mod errors;
pub mod graphql;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, GATEWAY_VERSION};
pub use http_request::HttpRequest;
pub use http_response::HttpResponse;

// Re-export GraphQL client types at the clients module level
pub use graphql::{GraphqlClient, GraphqlError, Upstreams};
