//! Turning ad rows into the `Ad` resource shared by every ad listing.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use uuid::Uuid;

use crate::{
    entity::{AdPictures, AdTags, Ads, ad_pictures, ad_tags, ads, tags},
    error::{AppError, AppResult},
    humanize::natural_time,
    models::Ad,
    routes::ad_picture_path,
};

pub(crate) async fn find_ad<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<ads::Model> {
    Ads::find_by_id(id).one(db).await?.ok_or(AppError::NotFound)
}

pub(crate) async fn tags_by_ad<C: ConnectionTrait>(
    db: &C,
    ids: &[Uuid],
) -> AppResult<HashMap<Uuid, Vec<String>>> {
    let mut map: HashMap<Uuid, Vec<String>> = HashMap::new();
    if ids.is_empty() {
        return Ok(map);
    }

    let rows: Vec<(Uuid, String)> = AdTags::find()
        .select_only()
        .column(ad_tags::Column::AdId)
        .column(tags::Column::Name)
        .join(JoinType::InnerJoin, ad_tags::Relation::Tags.def())
        .filter(ad_tags::Column::AdId.is_in(ids.iter().copied()))
        .order_by_asc(tags::Column::Name)
        .into_tuple()
        .all(db)
        .await?;

    for (ad_id, name) in rows {
        map.entry(ad_id).or_default().push(name);
    }
    Ok(map)
}

pub(crate) async fn ads_with_picture<C: ConnectionTrait>(
    db: &C,
    ids: &[Uuid],
) -> AppResult<HashSet<Uuid>> {
    if ids.is_empty() {
        return Ok(HashSet::new());
    }

    let with_picture: Vec<Uuid> = AdPictures::find()
        .select_only()
        .column(ad_pictures::Column::AdId)
        .filter(ad_pictures::Column::AdId.is_in(ids.iter().copied()))
        .into_tuple()
        .all(db)
        .await?;
    Ok(with_picture.into_iter().collect())
}

/// Attach tags, picture links and relative timestamps, keeping row order.
pub(crate) async fn hydrate_ads<C: ConnectionTrait>(
    db: &C,
    models: Vec<ads::Model>,
    now: DateTime<Utc>,
) -> AppResult<Vec<Ad>> {
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut tags = tags_by_ad(db, &ids).await?;
    let pictures = ads_with_picture(db, &ids).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let ad_tags = tags.remove(&model.id).unwrap_or_default();
            let has_picture = pictures.contains(&model.id);
            ad_from_entity(model, ad_tags, has_picture, now)
        })
        .collect())
}

pub(crate) fn ad_from_entity(
    model: ads::Model,
    tags: Vec<String>,
    has_picture: bool,
    now: DateTime<Utc>,
) -> Ad {
    let updated_at = model.updated_at.with_timezone(&Utc);
    Ad {
        id: model.id,
        title: model.title,
        text: model.text,
        price: model.price,
        owner_id: model.owner_id,
        tags,
        picture_url: has_picture.then(|| ad_picture_path(model.id)),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at,
        natural_updated: natural_time(updated_at, now),
    }
}
