use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::favorites::FavoriteAdList,
    entity::{Ads, Favorites, ads, favorites},
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    routes::params::{MAX_ADS_PER_PAGE, Pagination},
    services::listing::{find_ad, hydrate_ads},
    state::AppState,
};

pub async fn list_favorites(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<FavoriteAdList>> {
    let (page, limit, offset) = pagination.normalize(MAX_ADS_PER_PAGE);
    let finder = Ads::find()
        .join(JoinType::InnerJoin, ads::Relation::Favorites.def())
        .filter(favorites::Column::UserId.eq(user.user_id))
        .order_by_desc(favorites::Column::CreatedAt);

    let total = finder.clone().count(state.db()).await? as i64;
    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(state.db())
        .await?;
    let items = hydrate_ads(state.db(), models, Utc::now()).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("OK", FavoriteAdList { items }, Some(meta)))
}

/// Idempotent: the unique (user_id, ad_id) constraint turns a repeated add
/// into a no-op instead of a check-then-insert race.
pub async fn add_favorite(
    state: &AppState,
    user: &AuthUser,
    ad_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    find_ad(state.db(), ad_id).await?;

    let favorite = favorites::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        ad_id: Set(ad_id),
        created_at: Set(Utc::now().fixed_offset()),
    };
    let inserted = Favorites::insert(favorite)
        .on_conflict(
            OnConflict::columns([favorites::Column::UserId, favorites::Column::AdId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(state.db())
        .await?;

    if inserted == 0 {
        tracing::debug!(ad_id = %ad_id, user_id = %user.user_id, "favorite already present");
    } else {
        audit::record(
            state.db(),
            user.user_id,
            "favorite_add",
            "favorites",
            serde_json::json!({ "ad_id": ad_id }),
        )
        .await;
    }

    Ok(ApiResponse::success(
        "Added to favorites",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Idempotent: removing a favorite that does not exist still succeeds.
pub async fn remove_favorite(
    state: &AppState,
    user: &AuthUser,
    ad_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    find_ad(state.db(), ad_id).await?;

    let result = Favorites::delete_many()
        .filter(favorites::Column::UserId.eq(user.user_id))
        .filter(favorites::Column::AdId.eq(ad_id))
        .exec(state.db())
        .await?;

    if result.rows_affected == 0 {
        tracing::debug!(ad_id = %ad_id, user_id = %user.user_id, "no favorite to remove");
    } else {
        audit::record(
            state.db(),
            user.user_id,
            "favorite_remove",
            "favorites",
            serde_json::json!({ "ad_id": ad_id }),
        )
        .await;
    }

    Ok(ApiResponse::success(
        "Removed from favorites",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
