//! `/twitch/...` handlers.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::resources::twitch::{
    self, FollowEnd, FollowList, FollowPair, FollowerList, Founders, Game, ModsAndVips, Pinned,
    Team, UserBadges, UserInfo, UsernameAvailability,
};
use crate::server::errors::ApiError;
use crate::server::params::{follower_limit, optional, required, Params};
use crate::server::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

const LOGIN: &str = "?login=";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/userinfo", get(user_info))
        .route("/userfollows", get(user_follows))
        .route("/userfollowers", get(user_followers))
        .route("/userrecentfollows", get(user_recent_follows))
        .route("/userfirstfollows", get(user_first_follows))
        .route("/userbadges", get(user_badges))
        .route("/modvip", get(mod_vip))
        .route("/founders", get(founders))
        .route("/pinnedmessage", get(pinned_message))
        .route("/clipinfo", get(clip_info))
        .route("/globalbadges", get(global_badges))
        .route("/team", get(team))
        .route("/usernameavailable", get(username_available))
        .route("/gameinfo", get(game_info))
}

async fn user_info(State(state): State<AppState>, Query(params): Query<Params>) -> ApiResult<UserInfo> {
    let login = required(&params, "login", LOGIN)?;
    Ok(Json(twitch::user_info(state.upstreams(), login).await?))
}

async fn user_follows(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> ApiResult<FollowList> {
    let login = required(&params, "login", LOGIN)?;
    Ok(Json(twitch::follows(state.upstreams(), login).await?))
}

async fn user_followers(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> ApiResult<FollowerList> {
    let login = required(&params, "login", LOGIN)?;
    let limit = follower_limit(&params)?;
    let cursor = optional(&params, "cursor").map(str::to_string);
    Ok(Json(
        twitch::followers(state.upstreams(), login, limit, cursor).await?,
    ))
}

async fn user_recent_follows(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> ApiResult<FollowPair> {
    let login = required(&params, "login", LOGIN)?;
    Ok(Json(
        twitch::follow_pair(state.upstreams(), login, FollowEnd::Newest).await?,
    ))
}

async fn user_first_follows(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> ApiResult<FollowPair> {
    let login = required(&params, "login", LOGIN)?;
    Ok(Json(
        twitch::follow_pair(state.upstreams(), login, FollowEnd::Oldest).await?,
    ))
}

async fn user_badges(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> ApiResult<UserBadges> {
    const HINT: &str = "?login= or ?channel=";
    let login = required(&params, "login", HINT)?;
    let channel = required(&params, "channel", HINT)?;
    Ok(Json(twitch::user_badges(state.upstreams(), login, channel).await?))
}

async fn mod_vip(State(state): State<AppState>, Query(params): Query<Params>) -> ApiResult<ModsAndVips> {
    let login = required(&params, "login", LOGIN)?;
    Ok(Json(twitch::mods_and_vips(state.upstreams(), login).await?))
}

async fn founders(State(state): State<AppState>, Query(params): Query<Params>) -> ApiResult<Founders> {
    let login = required(&params, "login", LOGIN)?;
    Ok(Json(twitch::founders(state.upstreams(), login).await?))
}

async fn pinned_message(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> ApiResult<Pinned> {
    let login = required(&params, "login", LOGIN)?;
    Ok(Json(twitch::pinned_message(state.upstreams(), login).await?))
}

async fn clip_info(State(state): State<AppState>, Query(params): Query<Params>) -> ApiResult<Value> {
    let slug = required(&params, "slug", "?slug=")?;
    Ok(Json(twitch::clip_info(state.upstreams(), slug).await?))
}

async fn global_badges(State(state): State<AppState>) -> ApiResult<Value> {
    Ok(Json(twitch::global_badges(state.upstreams()).await?))
}

async fn team(State(state): State<AppState>, Query(params): Query<Params>) -> ApiResult<Team> {
    let name = required(&params, "team", "?team=")?;
    Ok(Json(twitch::team(state.upstreams(), name).await?))
}

async fn username_available(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> ApiResult<UsernameAvailability> {
    let username = required(&params, "username", "?username=")?;
    Ok(Json(
        twitch::username_available(state.upstreams(), username).await?,
    ))
}

async fn game_info(State(state): State<AppState>, Query(params): Query<Params>) -> ApiResult<Game> {
    let name = required(&params, "name", "?name=")?;
    Ok(Json(twitch::game_info(state.upstreams(), name).await?))
}
