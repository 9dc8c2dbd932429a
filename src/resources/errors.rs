//! Error types for gateway resources.
//!
//! Each variant maps to exactly one HTTP response class at the server
//! boundary:
//!
//! - [`ResourceError::MissingParameter`] / [`ResourceError::InvalidParameter`]: 400
//! - [`ResourceError::NotFound`]: 404
//! - [`ResourceError::EmptyResponse`]: 500
//! - [`ResourceError::Graphql`]: 400 for GraphQL `errors`, 500 otherwise

use thiserror::Error;

use crate::clients::graphql::GraphqlError;

/// Error type for resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A required query parameter was absent or empty.
    #[error("Missing {hint}")]
    MissingParameter {
        /// The expected parameter(s), e.g. `?login=`.
        hint: &'static str,
    },

    /// A query parameter was present but unusable.
    #[error("Invalid {hint}")]
    InvalidParameter {
        /// The offending parameter, e.g. `?limit=`.
        hint: &'static str,
    },

    /// The requested entity does not exist upstream.
    #[error("{message}")]
    NotFound {
        /// Human-readable message returned to the caller.
        message: String,
    },

    /// The upstream answered successfully but without usable data.
    #[error("{message}")]
    EmptyResponse {
        /// Human-readable message returned to the caller.
        message: &'static str,
    },

    /// An upstream GraphQL operation failed.
    #[error(transparent)]
    Graphql(#[from] GraphqlError),
}

impl ResourceError {
    /// Creates a [`ResourceError::NotFound`].
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_message() {
        let error = ResourceError::MissingParameter { hint: "?login=" };
        assert_eq!(error.to_string(), "Missing ?login=");
    }

    #[test]
    fn test_invalid_parameter_message() {
        let error = ResourceError::InvalidParameter { hint: "?limit=" };
        assert_eq!(error.to_string(), "Invalid ?limit=");
    }

    #[test]
    fn test_not_found_uses_message_verbatim() {
        let error = ResourceError::not_found("Game not found");
        assert_eq!(error.to_string(), "Game not found");
    }
}
