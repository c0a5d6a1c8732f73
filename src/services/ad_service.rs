use chrono::{DateTime, Duration, FixedOffset, Utc};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        ads::{AdDetail, AdForm, AdListing, Picture},
        forms::{AdPrefill, FormDescriptor},
    },
    entity::{AdPictures, AdTags, Ads, Comments, Favorites, Tags, ad_pictures, ad_tags, ads, comments, favorites, tags},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Ad, Comment},
    response::{ApiResponse, Meta, Redirect},
    routes::{ad_list_path, params::{AdListQuery, MAX_ADS_PER_PAGE}},
    services::listing::{ad_from_entity, ads_with_picture, find_ad, hydrate_ads, tags_by_ad},
    state::AppState,
    validation::{PictureChange, validate_ad_form},
};

pub async fn list_ads(
    state: &AppState,
    viewer: Option<&AuthUser>,
    query: AdListQuery,
) -> AppResult<ApiResponse<AdListing>> {
    let (page, limit, offset) = query.pagination().normalize(MAX_ADS_PER_PAGE);
    let search = query.search_term();

    let mut finder = Ads::find();
    if let Some(term) = search.as_deref() {
        finder = finder.filter(search_condition(term));
    }
    let finder = finder
        .order_by_desc(ads::Column::UpdatedAt)
        .order_by_desc(ads::Column::Id);

    let total = finder.clone().count(state.db()).await? as i64;
    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(state.db())
        .await?;

    let items = hydrate_ads(state.db(), models, Utc::now()).await?;
    let favorites = match viewer {
        Some(user) => favorite_ad_ids(state.db(), user.user_id).await?,
        None => Vec::new(),
    };

    tracing::debug!(search = ?search, returned = items.len(), total, "listed ads");

    let meta = Meta::new(page, limit, total);
    let data = AdListing {
        items,
        favorites,
        search,
    };
    Ok(ApiResponse::success("Ads", data, Some(meta)))
}

/// Title or text contains `term` (case-insensitive), or a tag equals it.
pub fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(term));
    let tagged = Query::select()
        .column((AdTags, ad_tags::Column::AdId))
        .from(AdTags)
        .inner_join(
            Tags,
            Expr::col((Tags, tags::Column::Id)).equals((AdTags, ad_tags::Column::TagId)),
        )
        .and_where(Expr::col((Tags, tags::Column::Name)).eq(term.to_lowercase()))
        .to_owned();

    Condition::any()
        .add(Expr::col((Ads, ads::Column::Title)).ilike(pattern.clone()))
        .add(Expr::col((Ads, ads::Column::Text)).ilike(pattern))
        .add(ads::Column::Id.in_subquery(tagged))
}

/// Escape LIKE metacharacters so they match literally.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

async fn favorite_ad_ids<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<Vec<Uuid>> {
    let ids = Favorites::find()
        .select_only()
        .column(favorites::Column::AdId)
        .filter(favorites::Column::UserId.eq(user_id))
        .into_tuple()
        .all(db)
        .await?;
    Ok(ids)
}

pub async fn get_ad_detail(state: &AppState, id: Uuid) -> AppResult<ApiResponse<AdDetail>> {
    let model = find_ad(state.db(), id).await?;

    let comments = Comments::find()
        .filter(comments::Column::AdId.eq(id))
        .order_by_desc(comments::Column::UpdatedAt)
        .all(state.db())
        .await?;

    let now = Utc::now();
    let ad = hydrate_ads(state.db(), vec![model], now)
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;
    let comments = comments
        .into_iter()
        .map(|c| Comment::from_entity(c, now))
        .collect();

    let data = AdDetail {
        ad,
        comments,
        comment_form: FormDescriptor::comment_form(id),
    };
    Ok(ApiResponse::success("Ad", data, None))
}

pub fn new_ad_form() -> ApiResponse<FormDescriptor> {
    ApiResponse::success("Ad form", FormDescriptor::ad_form(AdPrefill::default()), None)
}

pub async fn edit_ad_form(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<FormDescriptor>> {
    let model = find_ad(state.db(), id).await?;
    user.ensure_owner(model.owner_id)?;

    let tags = tags_by_ad(state.db(), &[id])
        .await?
        .remove(&id)
        .unwrap_or_default();
    let prefill = AdPrefill {
        id: Some(model.id),
        title: Some(model.title),
        text: Some(model.text),
        price: model.price,
        tags,
    };
    Ok(ApiResponse::success(
        "Ad form",
        FormDescriptor::ad_form(prefill),
        None,
    ))
}

pub async fn create_ad(
    state: &AppState,
    user: &AuthUser,
    form: AdForm,
) -> AppResult<ApiResponse<Redirect<Ad>>> {
    let valid = validate_ad_form(form, state.config.max_picture_bytes)?;
    let now = Utc::now().fixed_offset();

    let txn = state.db().begin().await?;
    let model = ads::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(valid.title),
        text: Set(valid.text),
        price: Set(valid.price),
        owner_id: Set(user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let has_picture = apply_picture(&txn, model.id, &valid.picture, now).await?;
    let tags = valid.tags.unwrap_or_default();
    replace_tags(&txn, model.id, &tags).await?;
    txn.commit().await?;

    tracing::debug!(ad_id = %model.id, owner_id = %user.user_id, "ad created");
    audit::record(
        state.db(),
        user.user_id,
        "ad_create",
        "ads",
        serde_json::json!({ "ad_id": model.id }),
    )
    .await;

    let ad = ad_from_entity(model, tags, has_picture, Utc::now());
    Ok(ApiResponse::success(
        "Ad created",
        Redirect::to(ad_list_path(), ad),
        Some(Meta::empty()),
    ))
}

/// The owner check runs before validation, so a stranger is refused whatever
/// they submitted.
pub async fn update_ad(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    form: AdForm,
) -> AppResult<ApiResponse<Redirect<Ad>>> {
    let existing = find_ad(state.db(), id).await?;
    user.ensure_owner(existing.owner_id)?;

    let valid = validate_ad_form(form, state.config.max_picture_bytes)?;
    let now = next_timestamp(existing.updated_at);

    let txn = state.db().begin().await?;
    let mut active: ads::ActiveModel = existing.into();
    active.title = Set(valid.title);
    active.text = Set(valid.text);
    active.price = Set(valid.price);
    active.updated_at = Set(now);
    let model = active.update(&txn).await?;

    apply_picture(&txn, id, &valid.picture, now).await?;
    if let Some(tags) = &valid.tags {
        replace_tags(&txn, id, tags).await?;
    }
    txn.commit().await?;

    tracing::debug!(ad_id = %id, "ad updated");
    audit::record(
        state.db(),
        user.user_id,
        "ad_update",
        "ads",
        serde_json::json!({ "ad_id": id }),
    )
    .await;

    let ad = hydrate_ads(state.db(), vec![model], Utc::now())
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Updated",
        Redirect::to(ad_list_path(), ad),
        Some(Meta::empty()),
    ))
}

pub async fn delete_ad(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Redirect<serde_json::Value>>> {
    let existing = find_ad(state.db(), id).await?;
    user.ensure_owner(existing.owner_id)?;

    let result = Ads::delete_by_id(id).exec(state.db()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::debug!(ad_id = %id, "ad deleted");
    audit::record(
        state.db(),
        user.user_id,
        "ad_delete",
        "ads",
        serde_json::json!({ "ad_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        Redirect::to(ad_list_path(), serde_json::json!({})),
        Some(Meta::empty()),
    ))
}

pub async fn get_picture(state: &AppState, id: Uuid) -> AppResult<Picture> {
    let picture = AdPictures::find_by_id(id)
        .one(state.db())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Picture {
        content_type: picture.content_type,
        data: picture.data,
    })
}

/// Store, drop or keep the picture; returns whether the ad has one afterwards
/// as far as this change is concerned.
async fn apply_picture<C: ConnectionTrait>(
    db: &C,
    ad_id: Uuid,
    change: &PictureChange,
    now: DateTime<FixedOffset>,
) -> AppResult<bool> {
    match change {
        PictureChange::Keep => Ok(!ads_with_picture(db, &[ad_id]).await?.is_empty()),
        PictureChange::Clear => {
            AdPictures::delete_by_id(ad_id).exec(db).await?;
            Ok(false)
        }
        PictureChange::Replace { content_type, data } => {
            let picture = ad_pictures::ActiveModel {
                ad_id: Set(ad_id),
                content_type: Set(content_type.clone()),
                data: Set(data.clone()),
                updated_at: Set(now),
            };
            AdPictures::insert(picture)
                .on_conflict(
                    OnConflict::column(ad_pictures::Column::AdId)
                        .update_columns([
                            ad_pictures::Column::ContentType,
                            ad_pictures::Column::Data,
                            ad_pictures::Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await?;
            Ok(true)
        }
    }
}

/// Make the ad's tag set exactly `names`, creating missing tags.
async fn replace_tags<C: ConnectionTrait>(db: &C, ad_id: Uuid, names: &[String]) -> AppResult<()> {
    AdTags::delete_many()
        .filter(ad_tags::Column::AdId.eq(ad_id))
        .exec(db)
        .await?;
    if names.is_empty() {
        return Ok(());
    }

    Tags::insert_many(names.iter().map(|name| tags::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.clone()),
    }))
    .on_conflict(
        OnConflict::column(tags::Column::Name)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    let tag_ids: Vec<Uuid> = Tags::find()
        .select_only()
        .column(tags::Column::Id)
        .filter(tags::Column::Name.is_in(names.iter().cloned()))
        .into_tuple()
        .all(db)
        .await?;

    AdTags::insert_many(tag_ids.into_iter().map(|tag_id| ad_tags::ActiveModel {
        ad_id: Set(ad_id),
        tag_id: Set(tag_id),
    }))
    .on_conflict(
        OnConflict::columns([ad_tags::Column::AdId, ad_tags::Column::TagId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;
    Ok(())
}

/// The current time, nudged past `previous` so edits always move `updated_at`
/// forward.
pub fn next_timestamp(previous: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let now = Utc::now().fixed_offset();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
