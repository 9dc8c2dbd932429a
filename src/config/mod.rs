//! Configuration types for the gateway.
//!
//! This module provides the configuration used to construct the upstream
//! GraphQL clients.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`GatewayConfig`]: The main configuration struct holding all gateway settings
//! - [`GatewayConfigBuilder`]: A builder for constructing [`GatewayConfig`] instances
//! - [`ClientId`]: The validated Twitch `Client-ID` credential, masked in debug output
//! - [`EndpointUrl`]: A validated upstream GraphQL endpoint
//!
//! # Example
//!
//! ```rust
//! use gql_gateway::{ClientId, GatewayConfig};
//!
//! let config = GatewayConfig::builder()
//!     .twitch_client_id(ClientId::new("my-client-id").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.twitch_endpoint().as_ref(), "https://gql.twitch.tv/gql");
//! ```

mod newtypes;

pub use newtypes::{ClientId, EndpointUrl};

use crate::error::ConfigError;

/// Default Twitch GraphQL endpoint.
pub const DEFAULT_TWITCH_GQL_URL: &str = "https://gql.twitch.tv/gql";

/// Default 7TV GraphQL endpoint.
pub const DEFAULT_SEVENTV_GQL_URL: &str = "https://7tv.io/v4/gql";

/// Configuration for the gateway's upstream clients.
///
/// # Thread Safety
///
/// `GatewayConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    twitch_client_id: ClientId,
    twitch_endpoint: EndpointUrl,
    seventv_endpoint: EndpointUrl,
    user_agent_prefix: Option<String>,
}

impl GatewayConfig {
    /// Creates a new builder for constructing a `GatewayConfig`.
    #[must_use]
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::new()
    }

    /// Returns the Twitch `Client-ID`.
    #[must_use]
    pub const fn twitch_client_id(&self) -> &ClientId {
        &self.twitch_client_id
    }

    /// Returns the Twitch GraphQL endpoint.
    #[must_use]
    pub const fn twitch_endpoint(&self) -> &EndpointUrl {
        &self.twitch_endpoint
    }

    /// Returns the 7TV GraphQL endpoint.
    #[must_use]
    pub const fn seventv_endpoint(&self) -> &EndpointUrl {
        &self.seventv_endpoint
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify GatewayConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GatewayConfig>();
};

/// Builder for constructing [`GatewayConfig`] instances.
///
/// `twitch_client_id` is required. Endpoints default to the public Twitch
/// and 7TV GraphQL URLs; overriding them is mostly useful for pointing the
/// gateway at a mock server.
///
/// # Example
///
/// ```rust
/// use gql_gateway::{ClientId, EndpointUrl, GatewayConfig};
///
/// let config = GatewayConfig::builder()
///     .twitch_client_id(ClientId::new("id").unwrap())
///     .seventv_endpoint(EndpointUrl::new("http://localhost:9000/gql").unwrap())
///     .user_agent_prefix("MyDeployment/1.0")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.seventv_endpoint().host_name(), "localhost");
/// ```
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
    twitch_client_id: Option<ClientId>,
    twitch_endpoint: Option<EndpointUrl>,
    seventv_endpoint: Option<EndpointUrl>,
    user_agent_prefix: Option<String>,
}

impl GatewayConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Twitch `Client-ID` (required).
    #[must_use]
    pub fn twitch_client_id(mut self, id: ClientId) -> Self {
        self.twitch_client_id = Some(id);
        self
    }

    /// Overrides the Twitch GraphQL endpoint.
    #[must_use]
    pub fn twitch_endpoint(mut self, url: EndpointUrl) -> Self {
        self.twitch_endpoint = Some(url);
        self
    }

    /// Overrides the 7TV GraphQL endpoint.
    #[must_use]
    pub fn seventv_endpoint(mut self, url: EndpointUrl) -> Self {
        self.seventv_endpoint = Some(url);
        self
    }

    /// Sets the user agent prefix for upstream requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`GatewayConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `twitch_client_id`
    /// is not set.
    pub fn build(self) -> Result<GatewayConfig, ConfigError> {
        let twitch_client_id = self
            .twitch_client_id
            .ok_or(ConfigError::MissingRequiredField {
                field: "twitch_client_id",
            })?;

        let twitch_endpoint = match self.twitch_endpoint {
            Some(url) => url,
            None => EndpointUrl::new(DEFAULT_TWITCH_GQL_URL)?,
        };
        let seventv_endpoint = match self.seventv_endpoint {
            Some(url) => url,
            None => EndpointUrl::new(DEFAULT_SEVENTV_GQL_URL)?,
        };

        Ok(GatewayConfig {
            twitch_client_id,
            twitch_endpoint,
            seventv_endpoint,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
