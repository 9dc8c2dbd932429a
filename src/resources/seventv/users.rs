//! 7TV user resources.
//!
//! 7TV users are keyed by an internal ID, so every lookup starts with a
//! username search and requires an exact, case-insensitive match on the
//! user's main connection before the by-ID query is issued.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::clients::graphql::{Operation, Upstream, Upstreams};
use crate::resources::seventv::queries::{
    USER_INFO, USER_INFO_DOCUMENT, USER_ROLES, USER_ROLES_DOCUMENT, USER_SEARCH,
    USER_SEARCH_DOCUMENT, USER_SUBSCRIPTION, USER_SUBSCRIPTION_DOCUMENT,
};
use crate::resources::ResourceError;

#[derive(Debug, Default, Deserialize)]
struct UsersData<T> {
    users: Option<UsersRoot<T>>,
}

#[derive(Debug, Default, Deserialize)]
struct UsersRoot<T> {
    search: Option<SearchResult>,
    user: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    items: Option<Vec<SearchItem>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    id: Option<String>,
    main_connection: Option<Connection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection {
    platform: Option<String>,
    platform_id: Option<String>,
    platform_username: Option<String>,
    platform_display_name: Option<String>,
}

/// A search hit whose username matched exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Match {
    id: String,
    username: String,
}

/// Marker for the search reply, which never carries a `user`.
#[derive(Debug, Default, Deserialize)]
struct NoUser {}

async fn resolve(upstreams: &Upstreams, login: &str) -> Result<Match, ResourceError> {
    let op = Operation::query(Upstream::SevenTv, USER_SEARCH_DOCUMENT)
        .named(USER_SEARCH)
        .variables(json!({ "query": login }));
    let data: UsersData<NoUser> = upstreams.execute(&op).await?.data_as(&op)?;

    let items = data
        .users
        .and_then(|u| u.search)
        .and_then(|s| s.items)
        .unwrap_or_default();

    exact_match(items, login).ok_or_else(|| {
        ResourceError::not_found(format!("No exact match found for username '{login}'"))
    })
}

fn exact_match(items: Vec<SearchItem>, login: &str) -> Option<Match> {
    let wanted = login.to_lowercase();
    items.into_iter().find_map(|item| {
        let username = item.main_connection?.platform_username?;
        if username.to_lowercase() != wanted {
            return None;
        }
        Some(Match {
            id: item.id?,
            username,
        })
    })
}

async fn lookup<T>(
    upstreams: &Upstreams,
    id: &str,
    name: &'static str,
    document: &'static str,
) -> Result<T, ResourceError>
where
    T: serde::de::DeserializeOwned + Default,
{
    let op = Operation::query(Upstream::SevenTv, document)
        .named(name)
        .variables(json!({ "id": id }));
    let data: UsersData<T> = upstreams.execute(&op).await?.data_as(&op)?;

    data.users
        .and_then(|u| u.user)
        .ok_or_else(|| ResourceError::not_found("User not found after ID lookup"))
}

// ---- user info ----

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InfoUser {
    inventory: Option<Inventory>,
    roles: Option<Vec<Value>>,
    connections: Option<Vec<Value>>,
    editor_for: Option<Vec<EditorEntry>>,
}

#[derive(Debug, Default, Deserialize)]
struct Inventory {
    badges: Option<Vec<InventoryEntry>>,
    paints: Option<Vec<InventoryEntry>>,
}

#[derive(Debug, Default, Deserialize)]
struct InventoryEntry {
    to: Option<InventoryTarget>,
}

#[derive(Debug, Default, Deserialize)]
struct InventoryTarget {
    badge: Option<Value>,
    paint: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditorEntry {
    user_id: Option<String>,
    user: Option<EditorUser>,
    added_at: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditorUser {
    main_connection: Option<Connection>,
}

/// A counted list.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Counted<T> {
    pub total: usize,
    #[serde(flatten)]
    pub items: T,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RoleList {
    pub roles: Vec<Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EditorList {
    pub users: Vec<Editor>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ItemList {
    pub items: Vec<Value>,
}

/// A user the looked-up user can edit for.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Editor {
    pub user_id: Option<String>,
    pub platform_username: Option<String>,
    pub platform: Option<String>,
    pub added_at: Option<Value>,
}

/// The `/7tv/UserInfo` response.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SevenTvUserInfo {
    pub id: String,
    pub username: String,
    pub roles: Counted<RoleList>,
    pub connections: Vec<Value>,
    pub editor_for: Counted<EditorList>,
    pub badges: Counted<ItemList>,
    pub paints: Counted<ItemList>,
}

fn counted_items(items: Vec<Value>) -> Counted<ItemList> {
    Counted {
        total: items.len(),
        items: ItemList { items },
    }
}

/// Fetches a 7TV user's roles, connections, editor grants and cosmetics.
///
/// # Errors
///
/// - [`ResourceError::NotFound`] if no user matches `login` exactly, or the
///   matched ID no longer resolves
/// - [`ResourceError::Graphql`] if either request fails
pub async fn user_info(upstreams: &Upstreams, login: &str) -> Result<SevenTvUserInfo, ResourceError> {
    let found = resolve(upstreams, login).await?;
    let user: InfoUser = lookup(upstreams, &found.id, USER_INFO, USER_INFO_DOCUMENT).await?;
    Ok(shape_info(found, user))
}

fn shape_info(found: Match, user: InfoUser) -> SevenTvUserInfo {
    let roles = user.roles.unwrap_or_default();
    let editors: Vec<Editor> = user
        .editor_for
        .unwrap_or_default()
        .into_iter()
        .map(|entry| {
            let connection = entry
                .user
                .and_then(|u| u.main_connection)
                .unwrap_or_default();
            Editor {
                user_id: entry.user_id,
                platform_username: connection.platform_username,
                platform: connection.platform,
                added_at: entry.added_at,
            }
        })
        .collect();

    let inventory = user.inventory.unwrap_or_default();
    let badges = inventory
        .badges
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| entry.to?.badge)
        .filter(|badge| !badge.is_null())
        .collect();
    let paints = inventory
        .paints
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| entry.to?.paint)
        .filter(|paint| !paint.is_null())
        .collect();

    SevenTvUserInfo {
        id: found.id,
        username: found.username,
        roles: Counted {
            total: roles.len(),
            items: RoleList { roles },
        },
        connections: user.connections.unwrap_or_default(),
        editor_for: Counted {
            total: editors.len(),
            items: EditorList { users: editors },
        },
        badges: counted_items(badges),
        paints: counted_items(paints),
    }
}

// ---- roles ----

#[derive(Debug, Default, Deserialize)]
struct RolesUser {
    roles: Option<Vec<Value>>,
}

/// The `/7tv/UserRoles` response.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SevenTvUserRoles {
    pub user_id: String,
    pub username: String,
    pub roles: Vec<Value>,
}

/// Fetches a 7TV user's roles.
///
/// # Errors
///
/// - [`ResourceError::NotFound`] if no user matches `login` exactly, or the
///   matched ID no longer resolves
/// - [`ResourceError::Graphql`] if either request fails
pub async fn user_roles(upstreams: &Upstreams, login: &str) -> Result<SevenTvUserRoles, ResourceError> {
    let found = resolve(upstreams, login).await?;
    let user: RolesUser = lookup(upstreams, &found.id, USER_ROLES, USER_ROLES_DOCUMENT).await?;

    Ok(SevenTvUserRoles {
        user_id: found.id,
        username: found.username,
        roles: user.roles.unwrap_or_default(),
    })
}

// ---- subscription ----

#[derive(Debug, Default, Deserialize)]
struct SubscriptionUser {
    id: Option<String>,
    billing: Option<Billing>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Billing {
    subscription_info: Option<SubscriptionInfo>,
    badge_progress: Option<BadgeProgress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionInfo {
    end_date: Option<Value>,
    total_days: Option<Value>,
    active_period: Option<ActivePeriod>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivePeriod {
    auto_renew: Option<bool>,
    gifted_by_id: Option<String>,
    is_trial: Option<bool>,
    start: Option<Value>,
    end: Option<Value>,
    subscription_product: Option<Product>,
    subscription: Option<Subscription>,
    subscription_product_variant: Option<Variant>,
    gifted_by: Option<EditorUser>,
    created_by: Option<CreatedBy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Product {
    name: Option<String>,
    provider_id: Option<Value>,
    default_variant: Option<Variant>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Variant {
    id: Option<String>,
    kind: Option<Value>,
    paypal_id: Option<String>,
    price: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Subscription {
    state: Option<Value>,
    created_at: Option<Value>,
    ended_at: Option<Value>,
    id: Option<SubscriptionId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionId {
    product_id: Option<String>,
    user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedBy {
    #[serde(rename = "__typename")]
    typename: Option<String>,
    invoice_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BadgeProgress {
    current_badge: Option<BadgeRef>,
    next_badge: Option<NextBadge>,
}

#[derive(Debug, Default, Deserialize)]
struct BadgeRef {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NextBadge {
    percentage: Option<f64>,
    days_left: Option<Value>,
    badge: Option<BadgeRef>,
}

/// Who gifted the subscription.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gift {
    pub user_id: String,
    pub platform: Option<String>,
    pub platform_id: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedByInfo {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub invoice_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionIds {
    pub product_id: Option<String>,
    pub user_id: Option<String>,
}

/// A subscription plan variant.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    pub paypal_id: Option<String>,
    pub price: Option<Value>,
}

impl From<Variant> for Plan {
    fn from(variant: Variant) -> Self {
        Self {
            id: variant.id,
            kind: variant.kind,
            paypal_id: variant.paypal_id,
            price: variant.price,
        }
    }
}

/// The active subscription period.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSummary {
    pub name: Option<String>,
    pub status: Option<Value>,
    pub start_date: Option<Value>,
    pub end_date: Option<Value>,
    pub renewal_end_date: Option<Value>,
    pub duration_in_days: Option<Value>,
    pub auto_renews: bool,
    pub is_trial: bool,
    pub created_at: Option<Value>,
    pub ended_at: Option<Value>,
    /// Present only for gifted subscriptions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gifted: Option<Gift>,
    pub created_by: CreatedByInfo,
    pub subscription_ids: SubscriptionIds,
    pub provider_id: Option<Value>,
    pub default_plan: Plan,
    pub current_plan: Plan,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BadgeSummary {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextBadgeSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Percentage with two decimals.
    pub progress_percent: f64,
    pub days_left: Option<Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BadgeProgressSummary {
    pub current: BadgeSummary,
    pub next: NextBadgeSummary,
}

/// The `/7tv/UserSubscriptionInfo` response.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SevenTvSubscription {
    /// The login as requested.
    pub username: String,
    pub user_id: Option<String>,
    pub subscription: SubscriptionSummary,
    pub badges: BadgeProgressSummary,
}

/// Fetches a 7TV user's subscription and subscriber-badge progress.
///
/// # Errors
///
/// - [`ResourceError::NotFound`] if no user matches `login` exactly, or the
///   matched ID no longer resolves
/// - [`ResourceError::Graphql`] if either request fails
pub async fn user_subscription(
    upstreams: &Upstreams,
    login: &str,
) -> Result<SevenTvSubscription, ResourceError> {
    let found = resolve(upstreams, login).await?;
    let user: SubscriptionUser =
        lookup(upstreams, &found.id, USER_SUBSCRIPTION, USER_SUBSCRIPTION_DOCUMENT).await?;
    Ok(shape_subscription(login, user))
}

/// Converts a 0..1 fraction to a percentage rounded to two decimals.
fn progress_percent(fraction: f64) -> f64 {
    (fraction * 10_000.0).round() / 100.0
}

fn shape_subscription(login: &str, user: SubscriptionUser) -> SevenTvSubscription {
    let billing = user.billing.unwrap_or_default();
    let info = billing.subscription_info.unwrap_or_default();
    let period = info.active_period.unwrap_or_default();
    let product = period.subscription_product.unwrap_or_default();
    let subscription = period.subscription.unwrap_or_default();
    let ids = subscription.id.unwrap_or_default();
    let created_by = period.created_by.unwrap_or_default();

    let gifted = period.gifted_by_id.and_then(|user_id| {
        let connection = period.gifted_by?.main_connection?;
        Some(Gift {
            user_id,
            platform: connection.platform,
            platform_id: connection.platform_id,
            username: connection.platform_username,
            display_name: connection.platform_display_name,
        })
    });

    let progress = billing.badge_progress.unwrap_or_default();
    let current = progress.current_badge.unwrap_or_default();
    let next = progress.next_badge.unwrap_or_default();
    let next_badge = next.badge.unwrap_or_default();

    SevenTvSubscription {
        username: login.to_string(),
        user_id: user.id,
        subscription: SubscriptionSummary {
            name: product.name,
            status: subscription.state,
            start_date: period.start,
            end_date: info.end_date,
            renewal_end_date: period.end,
            duration_in_days: info.total_days,
            auto_renews: period.auto_renew.unwrap_or(false),
            is_trial: period.is_trial.unwrap_or(false),
            created_at: subscription.created_at,
            ended_at: subscription.ended_at,
            gifted,
            created_by: CreatedByInfo {
                kind: created_by.typename,
                invoice_id: created_by.invoice_id,
            },
            subscription_ids: SubscriptionIds {
                product_id: ids.product_id,
                user_id: ids.user_id,
            },
            provider_id: product.provider_id,
            default_plan: product.default_variant.unwrap_or_default().into(),
            current_plan: period.subscription_product_variant.unwrap_or_default().into(),
        },
        badges: BadgeProgressSummary {
            current: BadgeSummary {
                id: current.id,
                name: current.name,
            },
            next: NextBadgeSummary {
                id: next_badge.id,
                name: next_badge.name,
                progress_percent: progress_percent(next.percentage.unwrap_or(0.0)),
                days_left: next.days_left,
            },
        },
    }
}
