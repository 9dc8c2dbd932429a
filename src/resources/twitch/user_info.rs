//! Twitch user profile, assembled from three operations.
//!
//! | Operation | Contributes |
//! |---|---|
//! | `ChannelShell` (persisted) | identity, suspension status |
//! | `UserQuery` | the profile itself (primary) |
//! | `ViewerCard` (persisted) | earned-badge count and badge-derived roles |
//!
//! The three operations are issued concurrently and merged in that declared
//! order. A suspended account is reported as `banned` with its reason rather
//! than as missing.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::aggregate::{merge, FieldRule, Fragment, OwnershipTable, WriteMode};
use crate::clients::graphql::{GraphqlResponse, Operation, Upstream, Upstreams};
use crate::resources::twitch::queries::{
    CHANNEL_SHELL, CHANNEL_SHELL_HASH, USER_QUERY, USER_QUERY_DOCUMENT, VIEWER_CARD,
    VIEWER_CARD_HASH,
};
use crate::resources::twitch::EarnedBadge;
use crate::resources::ResourceError;

/// `UserDoesNotExist` reasons that mean "suspended" rather than "absent".
pub const BAN_REASONS: [&str; 4] = ["TOS_TEMPORARY", "TOS_INDEFINITE", "DEACTIVATED", "DMCA"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Field {
    Id,
    Login,
    DisplayName,
    Description,
    ChatColor,
    Followers,
    Follows,
    Chatters,
    BadgeCount,
    FounderBadgeAvailability,
    UpdatedAt,
    CreatedAt,
    ProfileViewCount,
    ProfileImageUrl,
    BannerImageUrl,
    PrimaryTeam,
    Roles,
    HasPrime,
    HasTurbo,
    IsAmbassador,
    DisplayBadges,
    Stream,
    LastBroadcast,
    ChatSettings,
    LeaderboardSettings,
    Panels,
}

const IDENTITY: &[&str] = &[CHANNEL_SHELL, USER_QUERY];
const PROFILE: &[&str] = &[USER_QUERY];
const CARD: &[&str] = &[VIEWER_CARD];
const TURBO: &[&str] = &[USER_QUERY, VIEWER_CARD];

const fn rule(field: Field, owners: &'static [&'static str], mode: WriteMode) -> FieldRule<Field> {
    FieldRule {
        field,
        owners,
        mode,
    }
}

// Identity fields are overridden by the profile when it exists; the shell's
// copy survives only for accounts the profile query cannot see.
static RULES: [FieldRule<Field>; 26] = [
    rule(Field::Id, IDENTITY, WriteMode::Override),
    rule(Field::Login, IDENTITY, WriteMode::Override),
    rule(Field::DisplayName, IDENTITY, WriteMode::Override),
    rule(Field::Description, PROFILE, WriteMode::FirstWins),
    rule(Field::ChatColor, PROFILE, WriteMode::FirstWins),
    rule(Field::Followers, PROFILE, WriteMode::FirstWins),
    rule(Field::Follows, PROFILE, WriteMode::FirstWins),
    rule(Field::Chatters, PROFILE, WriteMode::FirstWins),
    rule(Field::BadgeCount, CARD, WriteMode::FirstWins),
    rule(Field::FounderBadgeAvailability, PROFILE, WriteMode::FirstWins),
    rule(Field::UpdatedAt, PROFILE, WriteMode::FirstWins),
    rule(Field::CreatedAt, PROFILE, WriteMode::FirstWins),
    rule(Field::ProfileViewCount, PROFILE, WriteMode::FirstWins),
    rule(Field::ProfileImageUrl, PROFILE, WriteMode::FirstWins),
    rule(Field::BannerImageUrl, PROFILE, WriteMode::FirstWins),
    rule(Field::PrimaryTeam, PROFILE, WriteMode::FirstWins),
    rule(Field::Roles, PROFILE, WriteMode::FirstWins),
    rule(Field::HasPrime, CARD, WriteMode::FirstWins),
    rule(Field::HasTurbo, TURBO, WriteMode::Override),
    rule(Field::IsAmbassador, CARD, WriteMode::FirstWins),
    rule(Field::DisplayBadges, PROFILE, WriteMode::FirstWins),
    rule(Field::Stream, PROFILE, WriteMode::FirstWins),
    rule(Field::LastBroadcast, PROFILE, WriteMode::FirstWins),
    rule(Field::ChatSettings, PROFILE, WriteMode::FirstWins),
    rule(Field::LeaderboardSettings, PROFILE, WriteMode::FirstWins),
    rule(Field::Panels, PROFILE, WriteMode::FirstWins),
];

static OWNERSHIP: OwnershipTable<Field> = OwnershipTable::new(&RULES);

// ---- upstream payloads ----

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelShellData {
    user_or_error: Option<UserOrError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserOrError {
    #[serde(rename = "__typename")]
    typename: Option<String>,
    id: Option<String>,
    login: Option<String>,
    display_name: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UserQueryData {
    user: Option<ProfileUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileUser {
    id: Option<String>,
    login: Option<String>,
    display_name: Option<String>,
    description: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
    chat_color: Option<String>,
    profile_view_count: Option<u64>,
    #[serde(rename = "profileImageURL")]
    profile_image_url: Option<String>,
    #[serde(rename = "bannerImageURL")]
    banner_image_url: Option<String>,
    followers: Option<TotalCount>,
    follows: Option<TotalCount>,
    roles: Option<Value>,
    has_turbo: Option<bool>,
    primary_team: Option<Value>,
    display_badges: Option<Value>,
    stream: Option<Value>,
    last_broadcast: Option<Value>,
    chat_settings: Option<Value>,
    panels: Option<Value>,
    channel: Option<ProfileChannel>,
    settings: Option<ProfileSettings>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCount {
    total_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileChannel {
    founder_badge_availability: Option<i64>,
    chatters: Option<Chatters>,
}

#[derive(Debug, Default, Deserialize)]
struct Chatters {
    count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileSettings {
    leaderboard: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ViewerCardData {
    pub(crate) channel_viewer: Option<ChannelViewer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChannelViewer {
    pub(crate) earned_badges: Option<Vec<EarnedBadge>>,
}

// ---- output ----

/// A badge displayed next to the user's name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayBadge {
    /// Badge ID.
    pub id: Option<String>,
    /// Badge set ID.
    #[serde(rename = "setID")]
    pub set_id: Option<String>,
    /// Badge title.
    pub title: Option<String>,
    /// Badge description.
    pub description: Option<String>,
    /// Badge image URL.
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
}

/// A channel panel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// Panel ID.
    pub id: Option<String>,
    /// Panel image URL.
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    /// Panel link URL.
    #[serde(rename = "linkURL")]
    pub link_url: Option<String>,
    /// Panel description.
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileRoles {
    #[serde(rename = "isParticipatingDJ")]
    is_participating_dj: Option<bool>,
    is_pre_affiliate: Option<bool>,
    is_affiliate: Option<bool>,
    is_partner: Option<bool>,
    is_staff: Option<bool>,
    is_site_admin: Option<bool>,
    is_global_mod: Option<bool>,
    is_extensions_developer: Option<bool>,
}

/// Account roles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRoles {
    pub has_prime: bool,
    pub has_turbo: bool,
    #[serde(rename = "isParticipatingDJ")]
    pub is_participating_dj: Option<bool>,
    pub is_pre_affiliate: Option<bool>,
    pub is_affiliate: Option<bool>,
    pub is_partner: Option<bool>,
    pub is_ambassador: bool,
    pub is_staff: Option<bool>,
    pub is_site_admin: Option<bool>,
    pub is_global_mod: Option<bool>,
    pub is_extensions_developer: Option<bool>,
}

/// The `/twitch/UserInfo` response.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub banned: bool,
    /// Present only when `banned` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ban_reason: Option<String>,
    pub id: Option<String>,
    pub login: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub chat_color: Option<String>,
    pub followers: Option<u64>,
    pub follows: Option<u64>,
    pub chatters: Option<u64>,
    /// Number of badges earned, from the viewer card.
    pub badges: u64,
    pub founder_badge_availability: Option<i64>,
    pub updated_at: Option<String>,
    pub created_at: Option<String>,
    pub profile_view_count: Option<u64>,
    #[serde(rename = "profileImageURL")]
    pub profile_image_url: Option<String>,
    #[serde(rename = "bannerImageURL")]
    pub banner_image_url: Option<String>,
    pub primary_team: Option<Value>,
    pub roles: UserRoles,
    pub badge: Vec<DisplayBadge>,
    pub stream: Option<Value>,
    pub last_broadcast: Option<Value>,
    pub chat_settings: Option<Value>,
    pub leaderboard_settings: Option<Value>,
    pub panels: Vec<Panel>,
}

fn operations(login: &str) -> [Operation; 3] {
    [
        Operation::persisted(Upstream::Twitch, CHANNEL_SHELL, CHANNEL_SHELL_HASH)
            .variables(json!({ "login": login })),
        Operation::query(Upstream::Twitch, USER_QUERY_DOCUMENT)
            .named(USER_QUERY)
            .variables(json!({ "login": login })),
        Operation::persisted(Upstream::Twitch, VIEWER_CARD, VIEWER_CARD_HASH).variables(json!({
            "channelID": "1",
            "channelIDStr": "1",
            "channelLogin": "browser",
            "targetLogin": login,
            "isViewerBadgeCollectionEnabled": true,
        })),
    ]
}

/// Fetches a Twitch user's profile.
///
/// # Errors
///
/// - [`ResourceError::NotFound`] if the user does not exist and is not suspended
/// - [`ResourceError::Graphql`] if any of the three operations fails
pub async fn user_info(upstreams: &Upstreams, login: &str) -> Result<UserInfo, ResourceError> {
    let ops = operations(login);
    let replies = upstreams.execute_all(&ops).await?;
    assemble(&ops, &replies)
}

fn assemble(ops: &[Operation; 3], replies: &[GraphqlResponse]) -> Result<UserInfo, ResourceError> {
    let [shell_op, profile_op, card_op] = ops;
    let [shell, profile, card] = replies else {
        return Err(ResourceError::EmptyResponse {
            message: "Twitch returned an unexpected number of replies",
        });
    };

    let fragments = vec![
        shell_fragment(shell.data_as(shell_op)?),
        profile_fragment(profile.data_as(profile_op)?),
        card_fragment(card.data_as(card_op)?),
    ];

    let mut record = merge(fragments, &OWNERSHIP, USER_QUERY)
        .map_err(|_| ResourceError::not_found("User not found"))?;

    let roles: ProfileRoles = record.take(&Field::Roles).unwrap_or_default();
    let ban_reason = record.status().map(|status| status.reason.clone());

    Ok(UserInfo {
        banned: ban_reason.is_some(),
        ban_reason,
        id: record.take(&Field::Id),
        login: record.take(&Field::Login),
        display_name: record.take(&Field::DisplayName),
        description: record.take(&Field::Description),
        chat_color: record.take(&Field::ChatColor),
        followers: record.take(&Field::Followers),
        follows: record.take(&Field::Follows),
        chatters: record.take(&Field::Chatters),
        badges: record.take(&Field::BadgeCount).unwrap_or(0),
        founder_badge_availability: record.take(&Field::FounderBadgeAvailability),
        updated_at: record.take(&Field::UpdatedAt),
        created_at: record.take(&Field::CreatedAt),
        profile_view_count: record.take(&Field::ProfileViewCount),
        profile_image_url: record.take(&Field::ProfileImageUrl),
        banner_image_url: record.take(&Field::BannerImageUrl),
        primary_team: record.take(&Field::PrimaryTeam),
        roles: UserRoles {
            has_prime: record.take(&Field::HasPrime).unwrap_or(false),
            has_turbo: record.take(&Field::HasTurbo).unwrap_or(false),
            is_participating_dj: roles.is_participating_dj,
            is_pre_affiliate: roles.is_pre_affiliate,
            is_affiliate: roles.is_affiliate,
            is_partner: roles.is_partner,
            is_ambassador: record.take(&Field::IsAmbassador).unwrap_or(false),
            is_staff: roles.is_staff,
            is_site_admin: roles.is_site_admin,
            is_global_mod: roles.is_global_mod,
            is_extensions_developer: roles.is_extensions_developer,
        },
        badge: record.take(&Field::DisplayBadges).unwrap_or_default(),
        stream: record.take(&Field::Stream),
        last_broadcast: record.take(&Field::LastBroadcast),
        chat_settings: record.take(&Field::ChatSettings),
        leaderboard_settings: record.take(&Field::LeaderboardSettings),
        panels: record.take(&Field::Panels).unwrap_or_default(),
    })
}

fn shell_fragment(data: ChannelShellData) -> Fragment<Field> {
    let mut fragment = Fragment::new(CHANNEL_SHELL);
    let Some(user) = data.user_or_error else {
        return fragment;
    };

    match user.typename.as_deref() {
        Some("User") => {
            fragment = fragment
                .set(Field::Id, user.id)
                .set(Field::Login, user.login)
                .set(Field::DisplayName, user.display_name);
        }
        Some("UserDoesNotExist") => {
            if let Some(reason) = user.reason.filter(|r| BAN_REASONS.contains(&r.as_str())) {
                fragment = fragment.status(reason);
            }
        }
        _ => {}
    }
    fragment
}

fn profile_fragment(data: UserQueryData) -> Fragment<Field> {
    let Some(user) = data.user else {
        return Fragment::new(USER_QUERY);
    };

    let (founder_badge_availability, chatters) = user
        .channel
        .map_or((None, None), |c| {
            (c.founder_badge_availability, c.chatters.and_then(|ch| ch.count))
        });

    Fragment::new(USER_QUERY)
        .entity(true)
        .set(Field::Id, user.id)
        .set(Field::Login, user.login)
        .set(Field::DisplayName, user.display_name)
        .set(Field::Description, user.description)
        .set(Field::ChatColor, user.chat_color)
        .set(Field::Followers, user.followers.and_then(|f| f.total_count))
        .set(Field::Follows, user.follows.and_then(|f| f.total_count))
        .set(Field::Chatters, chatters)
        .set(Field::FounderBadgeAvailability, founder_badge_availability)
        .set(Field::UpdatedAt, user.updated_at)
        .set(Field::CreatedAt, user.created_at)
        .set(Field::ProfileViewCount, user.profile_view_count)
        .set(Field::ProfileImageUrl, user.profile_image_url)
        .set(Field::BannerImageUrl, user.banner_image_url)
        .set(Field::PrimaryTeam, user.primary_team)
        .set(Field::Roles, user.roles)
        .set(Field::HasTurbo, user.has_turbo)
        .set(Field::DisplayBadges, user.display_badges)
        .set(Field::Stream, user.stream)
        .set(Field::LastBroadcast, user.last_broadcast)
        .set(Field::ChatSettings, user.chat_settings)
        .set(Field::LeaderboardSettings, user.settings.and_then(|s| s.leaderboard))
        .set(Field::Panels, user.panels)
}

fn card_fragment(data: ViewerCardData) -> Fragment<Field> {
    let fragment = Fragment::new(VIEWER_CARD);
    let Some(badges) = data.channel_viewer.and_then(|v| v.earned_badges) else {
        return fragment;
    };

    let has_set = |set: &str| badges.iter().any(|b| b.set_id.as_deref() == Some(set));
    fragment
        .set(Field::BadgeCount, badges.len())
        .set(Field::HasPrime, has_set("premium"))
        .set(Field::HasTurbo, has_set("turbo"))
        .set(Field::IsAmbassador, has_set("ambassador"))
}
