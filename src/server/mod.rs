//! HTTP surface of the gateway.
//!
//! # Overview
//!
//! [`app`] builds the complete service: an axum [`Router`] with one GET
//! route per resource under `/twitch`, `/7tv` and `/misc`, a
//! [`TraceLayer`] for request logging, and an outer request mapping that
//! lowercases the path so routes match case-insensitively
//! (`/twitch/UserInfo` and `/twitch/userinfo` are the same endpoint).
//! Query values keep their case.
//!
//! # Example
//!
//! ```rust,ignore
//! use gql_gateway::server::{app, AppState};
//! use gql_gateway::clients::Upstreams;
//!
//! let state = AppState::new(Upstreams::from_config(&config)?);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, axum::ServiceExt::<axum::extract::Request>::into_make_service(app(state))).await?;
//! ```

mod errors;
mod misc;
mod params;
mod seventv;
mod twitch;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::http::uri::PathAndQuery;
use axum::http::Uri;
use axum::Router;
use chrono::{DateTime, Utc};
use tower::util::{MapRequest, MapRequestLayer};
use tower::Layer;
use tower_http::trace::TraceLayer;

use crate::clients::Upstreams;

pub use errors::ApiError;
pub use misc::ServerInfo;

/// Shared, read-only state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    upstreams: Arc<Upstreams>,
    started: Instant,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// Creates state around the upstream clients, stamping the start time.
    #[must_use]
    pub fn new(upstreams: Upstreams) -> Self {
        Self {
            upstreams: Arc::new(upstreams),
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Returns the upstream clients.
    #[must_use]
    pub fn upstreams(&self) -> &Upstreams {
        &self.upstreams
    }

    /// Returns the time elapsed since the state was created.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Returns the wall-clock start time.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// The router wrapped in path lowercasing.
pub type Gateway = MapRequest<Router, fn(Request) -> Request>;

/// Builds the routed service with lowercase route paths.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/twitch", twitch::routes())
        .nest("/7tv", seventv::routes())
        .nest("/misc", misc::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the complete gateway service.
///
/// Path lowercasing must run before routing, so it wraps the router rather
/// than being added with [`Router::layer`].
pub fn app(state: AppState) -> Gateway {
    MapRequestLayer::new(lowercase_path as fn(Request) -> Request).layer(router(state))
}

fn lowercase_path(mut request: Request) -> Request {
    let uri = request.uri();
    if !uri.path().bytes().any(|b| b.is_ascii_uppercase()) {
        return request;
    }

    let path = uri.path().to_ascii_lowercase();
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };

    let mut parts = uri.clone().into_parts();
    match path_and_query.parse::<PathAndQuery>() {
        Ok(pq) => parts.path_and_query = Some(pq),
        Err(_) => return request,
    }
    if let Ok(lowered) = Uri::from_parts(parts) {
        *request.uri_mut() = lowered;
    }
    request
}
