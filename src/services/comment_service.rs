use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use uuid::Uuid;

use crate::{
    audit,
    dto::comments::CommentForm,
    entity::{Comments, comments},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Comment,
    response::{ApiResponse, Meta, Redirect},
    routes::ad_detail_path,
    services::listing::find_ad,
    state::AppState,
    validation::validate_comment,
};

pub async fn create_comment(
    state: &AppState,
    user: &AuthUser,
    ad_id: Uuid,
    form: CommentForm,
) -> AppResult<ApiResponse<Redirect<Comment>>> {
    find_ad(state.db(), ad_id).await?;
    let text = validate_comment(&form.comment)?;

    let now = Utc::now().fixed_offset();
    let model = comments::ActiveModel {
        id: Set(Uuid::new_v4()),
        text: Set(text),
        ad_id: Set(ad_id),
        owner_id: Set(user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(state.db())
    .await?;

    audit::record(
        state.db(),
        user.user_id,
        "comment_create",
        "comments",
        serde_json::json!({ "comment_id": model.id, "ad_id": ad_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Comment created",
        Redirect::to(ad_detail_path(ad_id), Comment::from_entity(model, Utc::now())),
        Some(Meta::empty()),
    ))
}

/// Sends the caller back to the parent ad of the comment that was removed.
pub async fn delete_comment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Redirect<serde_json::Value>>> {
    let comment = Comments::find_by_id(id)
        .one(state.db())
        .await?
        .ok_or(AppError::NotFound)?;
    user.ensure_owner(comment.owner_id)?;

    let result = Comments::delete_by_id(id).exec(state.db()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state.db(),
        user.user_id,
        "comment_delete",
        "comments",
        serde_json::json!({ "comment_id": id, "ad_id": comment.ad_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        Redirect::to(ad_detail_path(comment.ad_id), serde_json::json!({})),
        Some(Meta::empty()),
    ))
}
