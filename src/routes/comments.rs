use axum::{
    Router,
    extract::{Path, State},
    routing::delete,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Redirect, SeeOther},
    services::comment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(delete_comment))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 303, description = "Deleted, redirect to the parent ad", body = ApiResponse<Redirect<serde_json::Value>>),
        (status = 404, description = "Comment not found or not owned by the caller")
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<SeeOther<serde_json::Value>> {
    let resp = comment_service::delete_comment(&state, &user, id)
        .await
        .map_err(AppError::conceal_forbidden)?;
    Ok(SeeOther(resp))
}
