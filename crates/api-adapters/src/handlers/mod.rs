//! # Handlers
//!
//! Each handler pulls identity and input out of the request, calls one
//! service operation and serializes the result.

pub mod comments;
pub mod posts;
pub mod search;
pub mod users;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domains::CallerIdentity;
use serde::Serialize;
use tracing::error;

use crate::extract::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareCount {
    pub share_count: u64,
}

#[derive(Debug, Serialize)]
pub struct ProtectedEcho {
    pub message: String,
    pub user: CallerIdentity,
}

pub async fn root() -> &'static str {
    "Welcome to the LinkSphere API! It is running correctly."
}

pub async fn api_test() -> Json<Message> {
    Json(Message::new("API is working!"))
}

pub async fn protected(AuthUser(user): AuthUser) -> Json<ProtectedEcho> {
    Json(ProtectedEcho {
        message: "You have access to protected data!".into(),
        user,
    })
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "application/openmetrics-text; version=1.0.0; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "metrics encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
