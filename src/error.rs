//! Error types for gateway configuration.
//!
//! This module contains the error type returned while building a
//! [`GatewayConfig`](crate::GatewayConfig) and its validated newtypes.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation at startup. Error messages are designed to be clear and
//! actionable, since they usually end up on an operator's terminal.
//!
//! # Example
//!
//! ```rust
//! use gql_gateway::{ClientId, ConfigError};
//!
//! let result = ClientId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyClientId)));
//! ```

use thiserror::Error;

/// Errors that can occur during gateway configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Twitch client ID cannot be empty.
    #[error("Twitch client ID cannot be empty. Set TWITCH_CLIENT_ID to a valid Client-ID.")]
    EmptyClientId,

    /// Upstream endpoint URL is invalid.
    #[error("Invalid endpoint URL '{url}'. Expected an http(s) URL such as 'https://gql.twitch.tv/gql'.")]
    InvalidEndpointUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
