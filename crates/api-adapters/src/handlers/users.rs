//! `/api/users` handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{PostView, ProfileChanges, UserProfile};
use serde::Deserialize;

use super::search::SearchQuery;
use crate::error::ApiResult;
use crate::extract::{AuthUser, JsonBody, MaybeUser, QueryParams};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateProfileBody {
    pub bio: Option<String>,
}

pub async fn search_users(
    State(state): State<AppState>,
    _caller: AuthUser,
    QueryParams(query): QueryParams<SearchQuery>,
) -> ApiResult<Json<Vec<UserProfile>>> {
    Ok(Json(state.search.search_users(&query.q).await?))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.users.get_profile(&uid).await?))
}

pub async fn user_posts(
    State(state): State<AppState>,
    caller: MaybeUser,
    Path(uid): Path<String>,
) -> ApiResult<Json<Vec<PostView>>> {
    Ok(Json(
        state.posts.list_posts_by_author(&uid, caller.identity()).await?,
    ))
}

pub async fn create_profile(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    JsonBody(body): JsonBody<CreateProfileBody>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = state.users.create_profile(&caller, body.bio).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(uid): Path<String>,
    JsonBody(changes): JsonBody<ProfileChanges>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.users.update_profile(&caller, &uid, changes).await?))
}
