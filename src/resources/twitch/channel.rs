//! Channel-scoped Twitch resources: moderators, VIPs, founders, the pinned
//! chat message and the badges a user holds in a channel.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::aggregate::{accumulate, CursorPolicy, Page, PageLimit, PagedEdge};
use crate::clients::graphql::{Operation, Upstream, Upstreams};
use crate::resources::twitch::queries::{
    FOUNDERS, FOUNDERS_DOCUMENT, GET_PINNED_CHAT, GET_PINNED_CHAT_HASH, MODS, MODS_DOCUMENT,
    USE_LIVE, USE_LIVE_HASH, VIEWER_CARD, VIEWER_CARD_HASH, VIPS, VIPS_DOCUMENT,
};
use crate::resources::twitch::user_info::ViewerCardData;
use crate::resources::ResourceError;

// ---- mods & vips ----

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GrantEdge {
    cursor: Option<String>,
    granted_at: Option<String>,
    node: Option<ChannelUser>,
}

impl PagedEdge for GrantEdge {
    fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    fn has_node(&self) -> bool {
        self.node.is_some()
    }
}

/// A user as Twitch reports it inside channel listings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelUser {
    pub id: Option<String>,
    pub login: Option<String>,
    pub display_name: Option<String>,
}

/// A moderator or VIP and when the role was granted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleGrant {
    #[serde(flatten)]
    pub user: ChannelUser,
    pub granted_at: Option<String>,
}

impl From<GrantEdge> for RoleGrant {
    fn from(edge: GrantEdge) -> Self {
        Self {
            user: edge.node.unwrap_or_default(),
            granted_at: edge.granted_at,
        }
    }
}

/// The `/twitch/ModVip` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ModsAndVips {
    pub mods: Vec<RoleGrant>,
    pub vips: Vec<RoleGrant>,
}

#[derive(Debug, Default, Deserialize)]
struct GrantsData {
    user: Option<GrantsUser>,
}

#[derive(Debug, Default, Deserialize)]
struct GrantsUser {
    mods: Option<Page<GrantEdge>>,
    vips: Option<Page<GrantEdge>>,
}

#[derive(Clone, Copy)]
enum Grant {
    Mod,
    Vip,
}

async fn all_grants(
    upstreams: &Upstreams,
    login: &str,
    grant: Grant,
) -> Result<Vec<RoleGrant>, ResourceError> {
    let (name, document) = match grant {
        Grant::Mod => (MODS, MODS_DOCUMENT),
        Grant::Vip => (VIPS, VIPS_DOCUMENT),
    };

    let acc = accumulate(
        None,
        PageLimit::Unbounded,
        CursorPolicy::EndCursor,
        move |after| async move {
            let op = Operation::query(Upstream::Twitch, document)
                .named(name)
                .variables(json!({ "login": login, "after": after }));
            let data: GrantsData = upstreams.execute(&op).await?.data_as(&op)?;
            let user = data.user.ok_or_else(|| ResourceError::not_found("User not found"))?;
            let page = match grant {
                Grant::Mod => user.mods,
                Grant::Vip => user.vips,
            };
            Ok::<_, ResourceError>(page.unwrap_or_default())
        },
    )
    .await?;

    Ok(acc.items.into_iter().map(RoleGrant::from).collect())
}

/// Fetches every moderator and VIP of a channel.
///
/// The two lists are paginated independently and concurrently.
///
/// # Errors
///
/// - [`ResourceError::NotFound`] if the channel does not exist
/// - [`ResourceError::Graphql`] if any page of either list fails
pub async fn mods_and_vips(upstreams: &Upstreams, login: &str) -> Result<ModsAndVips, ResourceError> {
    let (mods, vips) = futures::try_join!(
        all_grants(upstreams, login, Grant::Mod),
        all_grants(upstreams, login, Grant::Vip),
    )?;
    Ok(ModsAndVips { mods, vips })
}

// ---- founders ----

#[derive(Debug, Default, Deserialize)]
struct FoundersData {
    user: Option<FoundersUser>,
}

#[derive(Debug, Default, Deserialize)]
struct FoundersUser {
    channel: Option<FoundersChannel>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoundersChannel {
    founder_badge_availability: Option<i64>,
    founders: Option<Vec<FounderEdge>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FounderEdge {
    is_subscribed: Option<bool>,
    granted_at: Option<String>,
    node: Option<ChannelUser>,
}

/// A channel founder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Founder {
    #[serde(flatten)]
    pub user: ChannelUser,
    pub is_subscribed: Option<bool>,
    pub granted_at: Option<String>,
}

/// The `/twitch/Founders` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Founders {
    pub founder_badge_availability: Option<i64>,
    pub founders: Vec<Founder>,
}

/// Fetches a channel's founders.
///
/// Any GraphQL error fails the request, even alongside partial data.
///
/// # Errors
///
/// Returns [`ResourceError::Graphql`] if the query fails or reports errors.
pub async fn founders(upstreams: &Upstreams, login: &str) -> Result<Founders, ResourceError> {
    let op = Operation::query(Upstream::Twitch, FOUNDERS_DOCUMENT)
        .named(FOUNDERS)
        .variables(json!({ "login": login }))
        .strict();

    let data: FoundersData = upstreams.execute(&op).await?.data_as(&op)?;
    let channel = data.user.and_then(|u| u.channel).unwrap_or_default();

    Ok(Founders {
        founder_badge_availability: channel.founder_badge_availability,
        founders: channel
            .founders
            .unwrap_or_default()
            .into_iter()
            .map(|f| Founder {
                user: f.node.unwrap_or_default(),
                is_subscribed: f.is_subscribed,
                granted_at: f.granted_at,
            })
            .collect(),
    })
}

// ---- pinned message ----

#[derive(Debug, Default, Deserialize)]
struct UseLiveData {
    user: Option<IdOnly>,
}

#[derive(Debug, Default, Deserialize)]
struct IdOnly {
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PinnedData {
    channel: Option<PinnedChannel>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PinnedChannel {
    pinned_chat_messages: Option<Page<PinnedEdge>>,
}

#[derive(Debug, Default, Deserialize)]
struct PinnedEdge {
    node: Option<PinnedNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PinnedNode {
    pinned_message: Option<PinnedPayload>,
    pinned_by: Option<ChannelUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PinnedPayload {
    id: Option<String>,
    sent_at: Option<String>,
    content: Option<PinnedContent>,
    sender: Option<ChannelUser>,
}

#[derive(Debug, Default, Deserialize)]
struct PinnedContent {
    text: Option<String>,
}

/// Who sent a pinned message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PinnedSender {
    pub sentat: Option<String>,
    pub id: Option<String>,
    pub displayname: Option<String>,
}

/// Who pinned a message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PinnedBy {
    pub id: Option<String>,
    pub displayname: Option<String>,
}

/// A pinned chat message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PinnedMessage {
    pub id: Option<String>,
    pub text: Option<String>,
    pub sender: PinnedSender,
    pub pinnedby: PinnedBy,
}

/// The `/twitch/PinnedMessage` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Pinned {
    /// `null` when nothing is pinned.
    pub pinnedmessage: Option<PinnedMessage>,
}

/// Fetches the message currently pinned in a channel's chat.
///
/// Resolves the channel ID first, then reads the pin; the second request
/// depends on the first.
///
/// # Errors
///
/// - [`ResourceError::NotFound`] if the channel does not exist
/// - [`ResourceError::Graphql`] if either request fails
pub async fn pinned_message(upstreams: &Upstreams, login: &str) -> Result<Pinned, ResourceError> {
    let live = Operation::persisted(Upstream::Twitch, USE_LIVE, USE_LIVE_HASH)
        .variables(json!({ "channelLogin": login }));
    let data: UseLiveData = upstreams.execute(&live).await?.data_as(&live)?;
    let channel_id = data
        .user
        .and_then(|u| u.id)
        .ok_or_else(|| ResourceError::not_found("User not found"))?;

    let pinned = Operation::persisted(Upstream::Twitch, GET_PINNED_CHAT, GET_PINNED_CHAT_HASH)
        .variables(json!({ "channelID": channel_id, "count": 1 }));
    let data: PinnedData = upstreams.execute(&pinned).await?.data_as(&pinned)?;

    let edge = data
        .channel
        .and_then(|c| c.pinned_chat_messages)
        .and_then(|page| page.edges)
        .and_then(|edges| edges.into_iter().next());

    Ok(Pinned {
        pinnedmessage: edge.map(shape_pin),
    })
}

fn shape_pin(edge: PinnedEdge) -> PinnedMessage {
    let node = edge.node.unwrap_or_default();
    let msg = node.pinned_message.unwrap_or_default();
    let sender = msg.sender.unwrap_or_default();
    let pinned_by = node.pinned_by.unwrap_or_default();

    PinnedMessage {
        id: msg.id,
        text: msg.content.and_then(|c| c.text),
        sender: PinnedSender {
            sentat: msg.sent_at,
            id: sender.id,
            displayname: sender.display_name,
        },
        pinnedby: PinnedBy {
            id: pinned_by.id,
            displayname: pinned_by.display_name,
        },
    }
}

// ---- user badges ----

/// A badge a user has earned. Fields other than `setID` pass through.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EarnedBadge {
    /// Badge set the badge belongs to.
    #[serde(rename = "setID")]
    pub set_id: Option<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// The `/twitch/UserBadges` response.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBadges {
    /// Number of distinct badge sets.
    pub total_badges: usize,
    pub earned_badges: Vec<EarnedBadge>,
}

/// Fetches the badges `login` holds in `channel`.
///
/// # Errors
///
/// Returns [`ResourceError::Graphql`] if the request fails.
pub async fn user_badges(
    upstreams: &Upstreams,
    login: &str,
    channel: &str,
) -> Result<UserBadges, ResourceError> {
    let op = Operation::persisted(Upstream::Twitch, VIEWER_CARD, VIEWER_CARD_HASH).variables(json!({
        "channelID": "1",
        "channelIDStr": "1",
        "channelLogin": channel,
        "targetLogin": login,
        "isViewerBadgeCollectionEnabled": true,
        "lookupType": "ALL",
    }));

    let data: ViewerCardData = upstreams.execute(&op).await?.data_as(&op)?;
    let earned_badges = data
        .channel_viewer
        .and_then(|v| v.earned_badges)
        .unwrap_or_default();

    Ok(UserBadges {
        total_badges: distinct_sets(&earned_badges),
        earned_badges,
    })
}

// Badges without a setID all fall into one shared set.
fn distinct_sets(badges: &[EarnedBadge]) -> usize {
    badges
        .iter()
        .map(|b| b.set_id.as_deref())
        .collect::<HashSet<_>>()
        .len()
}
