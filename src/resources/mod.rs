//! Gateway resources, one function per endpoint.
//!
//! Resource functions validate nothing: they receive already-checked
//! parameters, talk to the upstreams through
//! [`Upstreams`](crate::clients::Upstreams), and return typed, serializable
//! response shapes or a [`ResourceError`].
//!
//! - [`twitch`]: Twitch GraphQL (`gql.twitch.tv`)
//! - [`seventv`]: 7TV GraphQL (`7tv.io`)

mod errors;
pub mod seventv;
pub mod twitch;

pub use errors::ResourceError;
