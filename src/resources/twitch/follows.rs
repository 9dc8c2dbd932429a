//! Follower and follow lists.
//!
//! Followers are accumulated up to a caller limit and can be resumed from
//! the returned `cursor`; follows are always fetched in full.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::aggregate::{accumulate, Accumulation, CursorPolicy, Page, PageLimit, PagedEdge};
use crate::clients::graphql::{Operation, Upstream, Upstreams};
use crate::resources::twitch::queries::{
    FIRST_FOLLOWS, FIRST_FOLLOWS_DOCUMENT, FOLLOWERS, FOLLOWERS_DOCUMENT, FOLLOWS,
    FOLLOWS_DOCUMENT, RECENT_FOLLOWS, RECENT_FOLLOWS_DOCUMENT,
};
use crate::resources::ResourceError;

/// Followers returned when no `limit` is given.
pub const DEFAULT_FOLLOWER_LIMIT: usize = 100;

/// Largest accepted follower `limit`; larger values are clamped.
pub const MAX_FOLLOWER_LIMIT: usize = 10_000;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FollowEdge {
    cursor: Option<String>,
    followed_at: Option<DateTime<Utc>>,
    node: Option<FollowNode>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FollowNode {
    id: Option<String>,
    login: Option<String>,
    display_name: Option<String>,
}

impl PagedEdge for FollowEdge {
    fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    fn has_node(&self) -> bool {
        self.node.is_some()
    }
}

/// A user on either side of a follow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub id: Option<String>,
    pub login: Option<String>,
    pub display_name: Option<String>,
    pub followed_at: Option<DateTime<Utc>>,
}

impl From<FollowEdge> for Follow {
    fn from(edge: FollowEdge) -> Self {
        let node = edge.node.unwrap_or_default();
        Self {
            id: node.id,
            login: node.login,
            display_name: node.display_name,
            followed_at: edge.followed_at,
        }
    }
}

/// The `/twitch/UserFollowers` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowerList {
    pub total_count: Option<u64>,
    pub count: usize,
    pub truncated: bool,
    /// Resume cursor; present only when `truncated` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    pub followers: Vec<Follow>,
}

/// The `/twitch/UserFollows` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowList {
    pub total_count: Option<u64>,
    pub count: usize,
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    pub follows: Vec<Follow>,
}

/// The `/twitch/UserRecentFollows` and `/twitch/UserFirstFollows` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FollowPair {
    /// Newest (or oldest) follower.
    pub follower: Option<Follow>,
    /// Newest (or oldest) followed channel.
    pub follow: Option<Follow>,
}

#[derive(Debug, Default, Deserialize)]
struct FollowersData {
    user: Option<FollowersUser>,
}

#[derive(Debug, Default, Deserialize)]
struct FollowersUser {
    followers: Option<Page<FollowEdge>>,
}

#[derive(Debug, Default, Deserialize)]
struct FollowsData {
    user: Option<FollowsUser>,
}

#[derive(Debug, Default, Deserialize)]
struct FollowsUser {
    follows: Option<Page<FollowEdge>>,
}

#[derive(Debug, Default, Deserialize)]
struct PairData {
    user: Option<PairUser>,
}

#[derive(Debug, Default, Deserialize)]
struct PairUser {
    followers: Option<Page<FollowEdge>>,
    follows: Option<Page<FollowEdge>>,
}

/// Which end of the follow history to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowEnd {
    /// Most recent follower and follow.
    Newest,
    /// Oldest follower and follow.
    Oldest,
}

/// Fetches up to `limit` followers, newest first.
///
/// `cursor` resumes a previous truncated call; the returned cursor is that
/// of the last follower included, so no follower is skipped or repeated.
///
/// # Errors
///
/// - [`ResourceError::NotFound`] if the user does not exist
/// - [`ResourceError::Graphql`] if any page fails
pub async fn followers(
    upstreams: &Upstreams,
    login: &str,
    limit: usize,
    cursor: Option<String>,
) -> Result<FollowerList, ResourceError> {
    let limit = limit.min(MAX_FOLLOWER_LIMIT);
    let acc = accumulate(
        cursor,
        PageLimit::AtMost(limit),
        CursorPolicy::LastRetainedEdge,
        move |after| async move {
            let op = Operation::query(Upstream::Twitch, FOLLOWERS_DOCUMENT)
                .named(FOLLOWERS)
                .variables(json!({ "login": login, "after": after }));
            let data: FollowersData = upstreams.execute(&op).await?.data_as(&op)?;
            let user = data.user.ok_or_else(|| ResourceError::not_found("User not found"))?;
            Ok::<_, ResourceError>(user.followers.unwrap_or_default())
        },
    )
    .await?;

    let (total_count, truncated, cursor, items) = split(acc);
    Ok(FollowerList {
        total_count,
        count: items.len(),
        truncated,
        cursor,
        followers: items,
    })
}

/// Fetches every channel a user follows, newest first.
///
/// # Errors
///
/// - [`ResourceError::NotFound`] if the user does not exist
/// - [`ResourceError::Graphql`] if any page fails
pub async fn follows(upstreams: &Upstreams, login: &str) -> Result<FollowList, ResourceError> {
    let acc = accumulate(
        None,
        PageLimit::Unbounded,
        CursorPolicy::EndCursor,
        move |after| async move {
            let op = Operation::query(Upstream::Twitch, FOLLOWS_DOCUMENT)
                .named(FOLLOWS)
                .variables(json!({ "login": login, "after": after }));
            let data: FollowsData = upstreams.execute(&op).await?.data_as(&op)?;
            let user = data.user.ok_or_else(|| ResourceError::not_found("User not found"))?;
            Ok::<_, ResourceError>(user.follows.unwrap_or_default())
        },
    )
    .await?;

    let (total_count, truncated, cursor, items) = split(acc);
    Ok(FollowList {
        total_count,
        count: items.len(),
        truncated,
        cursor,
        follows: items,
    })
}

/// Fetches the newest or oldest follower and follow of a user.
///
/// # Errors
///
/// - [`ResourceError::NotFound`] if the user does not exist
/// - [`ResourceError::Graphql`] if the query fails
pub async fn follow_pair(
    upstreams: &Upstreams,
    login: &str,
    end: FollowEnd,
) -> Result<FollowPair, ResourceError> {
    let (name, document) = match end {
        FollowEnd::Newest => (RECENT_FOLLOWS, RECENT_FOLLOWS_DOCUMENT),
        FollowEnd::Oldest => (FIRST_FOLLOWS, FIRST_FOLLOWS_DOCUMENT),
    };
    let op = Operation::query(Upstream::Twitch, document)
        .named(name)
        .variables(json!({ "login": login }));

    let data: PairData = upstreams.execute(&op).await?.data_as(&op)?;
    let user = data.user.ok_or_else(|| ResourceError::not_found("User not found"))?;

    Ok(FollowPair {
        follower: first_follow(user.followers),
        follow: first_follow(user.follows),
    })
}

fn first_follow(page: Option<Page<FollowEdge>>) -> Option<Follow> {
    page?
        .edges?
        .into_iter()
        .find(|edge| edge.has_node())
        .map(Follow::from)
}

fn split(acc: Accumulation<FollowEdge>) -> (Option<u64>, bool, Option<String>, Vec<Follow>) {
    let cursor = if acc.truncated { acc.next_cursor } else { None };
    let items = acc.items.into_iter().map(Follow::from).collect();
    (acc.total_count, acc.truncated, cursor, items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_from_edge_keeps_timestamp() {
        let edge: FollowEdge = serde_json::from_value(json!({
            "cursor": "c1",
            "followedAt": "2021-03-04T05:06:07Z",
            "node": { "id": "1", "login": "a", "displayName": "A" }
        }))
        .unwrap();

        let follow = Follow::from(edge);
        assert_eq!(follow.login.as_deref(), Some("a"));

        let body = serde_json::to_value(&follow).unwrap();
        assert_eq!(body["displayName"], "A");
        assert_eq!(body["followedAt"], "2021-03-04T05:06:07Z");
    }

    #[test]
    fn test_first_follow_skips_null_nodes() {
        let page: Page<FollowEdge> = serde_json::from_value(json!({
            "edges": [
                { "followedAt": null, "node": null },
                { "followedAt": "2020-01-01T00:00:00Z", "node": { "login": "b" } }
            ]
        }))
        .unwrap();

        let follow = first_follow(Some(page)).unwrap();
        assert_eq!(follow.login.as_deref(), Some("b"));
        assert!(first_follow(None).is_none());
    }

    #[test]
    fn test_split_drops_cursor_when_not_truncated() {
        let acc = Accumulation {
            total_count: Some(3),
            items: vec![FollowEdge::default()],
            truncated: false,
            next_cursor: Some("c0".to_string()),
            pages_fetched: 1,
        };

        let (total, truncated, cursor, items) = split(acc);
        assert_eq!(total, Some(3));
        assert!(!truncated);
        assert!(cursor.is_none());
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_follower_list_serializes_without_cursor() {
        let list = FollowerList {
            total_count: Some(0),
            ..FollowerList::default()
        };

        let body = serde_json::to_value(&list).unwrap();
        assert_eq!(
            body,
            json!({ "totalCount": 0, "count": 0, "truncated": false, "followers": [] })
        );
    }
}
