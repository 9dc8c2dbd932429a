//! GraphQL layer over the upstream HTTP client.
//!
//! This module provides the request-scoped [`Operation`] model and the
//! clients that execute operations against the Twitch and 7TV GraphQL APIs.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`Operation`]: One GraphQL call (literal query or persisted-query hash)
//! - [`GraphqlResponse`]: The `{data, errors, extensions}` envelope
//! - [`GraphqlClient`]: Executes operations against one upstream
//! - [`Upstreams`]: Owns both upstream clients and supports concurrent fan-out
//! - [`GraphqlError`]: Error type for GraphQL operations
//!
//! # Error policy
//!
//! GraphQL reports most failures with HTTP 200 and an `errors` array. By
//! default an operation fails only when `errors` is present and `data` is
//! null; partial data is kept and the errors are logged. Operations built
//! with [`Operation::strict`] fail on any error.

mod client;
mod errors;
mod operation;

pub use client::{GraphqlClient, Upstreams};
pub use errors::GraphqlError;
pub use operation::{ErrorPolicy, GraphqlResponse, Operation, Upstream};
