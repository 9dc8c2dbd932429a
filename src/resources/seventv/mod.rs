//! 7TV GraphQL resources.
//!
//! User endpoints resolve a login to a 7TV user ID with an exact-match
//! search before querying by ID; the two requests are sequential.

mod global;
mod queries;
mod users;

pub use global::{badges_and_paints, BadgesPaints};
pub use users::{
    user_info, user_roles, user_subscription, BadgeProgressSummary, BadgeSummary, Counted,
    CreatedByInfo, Editor, EditorList, Gift, ItemList, NextBadgeSummary, Plan, RoleList,
    SevenTvSubscription, SevenTvUserInfo, SevenTvUserRoles, SubscriptionIds, SubscriptionSummary,
};
