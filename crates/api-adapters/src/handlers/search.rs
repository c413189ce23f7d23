//! Hashtag search handlers.

use axum::extract::{Path, State};
use axum::Json;
use domains::{HashtagCount, PostView};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extract::{MaybeUser, QueryParams};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn hashtag_search(
    State(state): State<AppState>,
    _caller: MaybeUser,
    QueryParams(query): QueryParams<SearchQuery>,
) -> ApiResult<Json<Vec<HashtagCount>>> {
    Ok(Json(state.search.search_hashtags(&query.q).await?))
}

pub async fn posts_by_hashtag(
    State(state): State<AppState>,
    caller: MaybeUser,
    Path(tag): Path<String>,
) -> ApiResult<Json<Vec<PostView>>> {
    Ok(Json(
        state.search.posts_by_hashtag(&tag, caller.identity()).await?,
    ))
}
