//! Query-string helpers.
//!
//! An empty value counts as absent.

use std::collections::HashMap;
use std::num::IntErrorKind;

use crate::resources::twitch::{DEFAULT_FOLLOWER_LIMIT, MAX_FOLLOWER_LIMIT};
use crate::resources::ResourceError;

pub type Params = HashMap<String, String>;

/// Returns a non-empty parameter.
pub fn optional<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

/// Returns a non-empty parameter or a [`ResourceError::MissingParameter`].
pub fn required<'a>(
    params: &'a Params,
    key: &str,
    hint: &'static str,
) -> Result<&'a str, ResourceError> {
    optional(params, key).ok_or(ResourceError::MissingParameter { hint })
}

/// Parses the follower `limit`.
///
/// Values too large for `usize` become [`MAX_FOLLOWER_LIMIT`]; smaller
/// values are clamped downstream.
pub fn follower_limit(params: &Params) -> Result<usize, ResourceError> {
    optional(params, "limit").map_or(Ok(DEFAULT_FOLLOWER_LIMIT), |raw| {
        raw.trim().parse::<usize>().or_else(|e| match e.kind() {
            IntErrorKind::PosOverflow => Ok(MAX_FOLLOWER_LIMIT),
            _ => Err(ResourceError::InvalidParameter { hint: "?limit=" }),
        })
    })
}
