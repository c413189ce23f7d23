//! `/api/posts/{id}/comments` handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::Comment;

use super::posts::ContentBody;
use super::Message;
use crate::error::ApiResult;
use crate::extract::{AuthUser, JsonBody};
use crate::state::AppState;

pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(state.comments.list_comments(&post_id).await?))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> ApiResult<Json<Comment>> {
    Ok(Json(state.comments.get_comment(&post_id, &comment_id).await?))
}

pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(post_id): Path<String>,
    JsonBody(body): JsonBody<ContentBody>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = state
        .comments
        .add_comment(&caller, &post_id, body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path((post_id, comment_id)): Path<(String, String)>,
    JsonBody(body): JsonBody<ContentBody>,
) -> ApiResult<Json<Comment>> {
    let comment = state
        .comments
        .update_comment(&caller, &post_id, &comment_id, body.content)
        .await?;
    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> ApiResult<Json<Message>> {
    state
        .comments
        .delete_comment(&caller, &post_id, &comment_id)
        .await?;
    Ok(Json(Message::new("Comment deleted successfully.")))
}
