//! `/api/posts` handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{LikeState, PostView};
use serde::Deserialize;

use super::{Message, ShareCount};
use crate::error::ApiResult;
use crate::extract::{AuthUser, JsonBody, MaybeUser};
use crate::state::AppState;

/// Body of create/update requests; a missing `content` is a validation error.
#[derive(Debug, Deserialize)]
pub struct ContentBody {
    pub content: Option<String>,
}

pub async fn list_posts(
    State(state): State<AppState>,
    caller: MaybeUser,
) -> ApiResult<Json<Vec<PostView>>> {
    Ok(Json(state.posts.list_posts(caller.identity()).await?))
}

pub async fn get_post(
    State(state): State<AppState>,
    caller: MaybeUser,
    Path(id): Path<String>,
) -> ApiResult<Json<PostView>> {
    Ok(Json(state.posts.get_post(&id, caller.identity()).await?))
}

pub async fn posts_by_user(
    State(state): State<AppState>,
    caller: MaybeUser,
    Path(uid): Path<String>,
) -> ApiResult<Json<Vec<PostView>>> {
    Ok(Json(
        state.posts.list_posts_by_author(&uid, caller.identity()).await?,
    ))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    JsonBody(body): JsonBody<ContentBody>,
) -> ApiResult<(StatusCode, Json<PostView>)> {
    let view = state.posts.create_post(&caller, body.content).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ContentBody>,
) -> ApiResult<Json<Message>> {
    state.posts.update_post(&caller, &id, body.content).await?;
    Ok(Json(Message::new("Post updated successfully.")))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    state.posts.delete_post(&caller, &id).await?;
    Ok(Json(Message::new("Post deleted successfully.")))
}

pub async fn like_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<LikeState>> {
    Ok(Json(state.posts.toggle_like(&caller, &id).await?))
}

/// No identity is required; a presented token must still be valid.
pub async fn share_post(
    State(state): State<AppState>,
    _caller: MaybeUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ShareCount>> {
    let share_count = state.posts.share_post(&id).await?;
    Ok(Json(ShareCount { share_count }))
}
