use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, Uri},
    routing::get,
};
use uuid::Uuid;

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

pub mod ads;
pub mod auth;
pub mod comments;
pub mod doc;
pub mod favorites;
pub mod health;
pub mod params;

const API_PREFIX: &str = "/api";

pub fn ad_list_path() -> String {
    format!("{API_PREFIX}/ads")
}

pub fn ad_detail_path(id: Uuid) -> String {
    format!("{API_PREFIX}/ads/{id}")
}

pub fn ad_picture_path(id: Uuid) -> String {
    format!("{API_PREFIX}/ads/{id}/picture")
}

pub fn ad_comments_path(id: Uuid) -> String {
    format!("{API_PREFIX}/ads/{id}/comments")
}

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/ads", ads::router())
        .nest("/comments", comments::router())
        .nest("/favorites", favorites::router())
        .nest("/auth", auth::router())
}

/// Every route, docs and the fallback, with state bound. Transport layers
/// (tracing, request ids, concurrency) are added by the binary.
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.body_limit();
    Router::new()
        .route("/health", get(health::health_check))
        .nest(API_PREFIX, create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
