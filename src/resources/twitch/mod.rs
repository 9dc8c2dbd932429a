//! Twitch GraphQL resources.
//!
//! Every function here takes the shared [`Upstreams`](crate::clients::Upstreams)
//! and returns a serializable response shape. Request bodies are either
//! literal queries with variables or persisted-query references.
//!
//! # Resources
//!
//! | Function | Pattern |
//! |---|---|
//! | [`user_info`] | three operations, concurrent, merged |
//! | [`followers`] | paginated up to a limit, resumable |
//! | [`follows`], [`mods_and_vips`] | paginated to exhaustion |
//! | [`follow_pair`] | single query |
//! | [`founders`] | single query, strict about GraphQL errors |
//! | [`pinned_message`] | two sequential persisted queries |
//! | [`user_badges`], [`global_badges`] | single persisted query |
//! | [`team`] | two operations, concurrent, merged |
//! | [`username_available`], [`game_info`], [`clip_info`] | single query |

mod channel;
mod follows;
mod global;
mod queries;
mod user_info;

pub use channel::{
    founders, mods_and_vips, pinned_message, user_badges, ChannelUser, EarnedBadge, Founder,
    Founders, ModsAndVips, Pinned, PinnedBy, PinnedMessage, PinnedSender, RoleGrant, UserBadges,
};
pub use follows::{
    follow_pair, followers, follows, Follow, FollowEnd, FollowList, FollowPair, FollowerList,
    DEFAULT_FOLLOWER_LIMIT, MAX_FOLLOWER_LIMIT,
};
pub use global::{
    clip_info, game_info, global_badges, team, username_available, Game, Team, TeamBody,
    UsernameAvailability,
};
pub use user_info::{user_info, DisplayBadge, Panel, UserInfo, UserRoles, BAN_REASONS};
