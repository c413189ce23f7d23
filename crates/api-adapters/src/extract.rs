//! Request extractors: caller identity from the `Authorization` header and
//! JSON/query bodies whose rejections use the API's error shape.

use axum::extract::{FromRef, FromRequest, FromRequestParts, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use domains::{CallerIdentity, DomainError};

use crate::error::ApiError;
use crate::state::AppState;

/// A verified caller; rejects the request when no valid token is present.
#[derive(Debug, Clone)]
pub struct AuthUser(pub CallerIdentity);

/// The caller if a token was presented. A missing token yields `None`; an
/// invalid one still rejects the request.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CallerIdentity>);

impl MaybeUser {
    pub fn identity(&self) -> Option<&CallerIdentity> {
        self.0.as_ref()
    }
}

/// JSON body extractor reporting malformed input as a validation error.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Query-string extractor reporting malformed input as a validation error.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Token after `Bearer `, if the header carries one.
fn bearer_token(parts: &Parts) -> Result<Option<String>, DomainError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| DomainError::InvalidCredentials("non-ASCII authorization header".into()))?;
    Ok(value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string))
}

async fn verify(state: &AppState, parts: &Parts) -> Result<Option<CallerIdentity>, DomainError> {
    match bearer_token(parts)? {
        Some(token) => state.identity.verify_token(&token).await.map(Some),
        None => Ok(None),
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        verify(&state, parts)
            .await?
            .map(AuthUser)
            .ok_or(ApiError(DomainError::MissingCredentials))
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(MaybeUser(verify(&state, parts).await?))
    }
}
