//! `/7tv/...` handlers.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::resources::seventv::{
    self, BadgesPaints, SevenTvSubscription, SevenTvUserInfo, SevenTvUserRoles,
};
use crate::server::errors::ApiError;
use crate::server::params::{required, Params};
use crate::server::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/userinfo", get(user_info))
        .route("/usersubscriptioninfo", get(user_subscription_info))
        .route("/userroles", get(user_roles))
        .route("/badgespaints", get(badges_paints))
}

async fn user_info(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<SevenTvUserInfo>, ApiError> {
    let login = required(&params, "login", "?login=")?;
    Ok(Json(seventv::user_info(state.upstreams(), login).await?))
}

async fn user_subscription_info(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<SevenTvSubscription>, ApiError> {
    let login = required(&params, "login", "?login=")?;
    Ok(Json(
        seventv::user_subscription(state.upstreams(), login).await?,
    ))
}

async fn user_roles(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<SevenTvUserRoles>, ApiError> {
    let login = required(&params, "login", "?login=")?;
    Ok(Json(seventv::user_roles(state.upstreams(), login).await?))
}

async fn badges_paints(State(state): State<AppState>) -> Result<Json<BadgesPaints>, ApiError> {
    Ok(Json(seventv::badges_and_paints(state.upstreams()).await?))
}
