//! # gql-gateway
//!
//! A REST gateway over the Twitch and 7TV GraphQL APIs.
//!
//! ## Overview
//!
//! Each endpoint validates a query parameter, issues one or more GraphQL
//! operations upstream and reshapes the nested replies into flat JSON.
//! The crate provides:
//!
//! - Type-safe configuration via [`GatewayConfig`] and [`GatewayConfigBuilder`]
//! - An upstream GraphQL client that POSTs literal or persisted queries, via
//!   [`clients::graphql`]
//! - Reusable aggregation primitives via [`aggregate`]: cursor pagination
//!   with a limit and resume cursor, and a declared-order fragment merge
//! - One function per endpoint via [`resources`]
//! - The axum service via [`server`]
//!
//! ## Quick Start
//!
//! ```rust
//! use gql_gateway::{ClientId, EndpointUrl, GatewayConfig};
//!
//! let config = GatewayConfig::builder()
//!     .twitch_client_id(ClientId::new("your-client-id").unwrap())
//!     .seventv_endpoint(EndpointUrl::new("https://7tv.io/v4/gql").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Calling a Resource Directly
//!
//! ```rust,ignore
//! use gql_gateway::clients::Upstreams;
//! use gql_gateway::resources::twitch;
//!
//! let upstreams = Upstreams::from_config(&config)?;
//! let followers = twitch::followers(&upstreams, "forsen", 500, None).await?;
//! println!("{} of {:?}", followers.count, followers.total_count);
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration and clients are passed explicitly
//! - **No retries, no caching**: every upstream call is one POST
//! - **Variables, not interpolation**: user input never enters query text
//! - **Deterministic merges**: multi-operation results are merged in
//!   declared order, never completion order
//! - **Thread-safe**: all shared types are `Send + Sync`

pub mod aggregate;
pub mod clients;
pub mod config;
pub mod error;
pub mod resources;
pub mod server;

pub use config::{ClientId, EndpointUrl, GatewayConfig, GatewayConfigBuilder};
pub use error::ConfigError;

pub use clients::graphql::{Operation, Upstream};
pub use clients::{GraphqlClient, GraphqlError, HttpError, Upstreams};
pub use resources::ResourceError;
pub use server::{app, AppState};
