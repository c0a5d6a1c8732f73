use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::{comments, users},
    humanize::natural_time,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Ad {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    /// Minor currency units.
    pub price: Option<i64>,
    pub owner_id: Uuid,
    pub tags: Vec<String>,
    /// Set when the ad has a picture to stream.
    pub picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// `updated_at` relative to the time of the request, e.g. "3 minutes ago".
    pub natural_updated: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub ad_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub natural_updated: String,
}

impl Comment {
    pub fn from_entity(model: comments::Model, now: DateTime<Utc>) -> Self {
        let updated_at = model.updated_at.with_timezone(&Utc);
        Self {
            id: model.id,
            text: model.text,
            ad_id: model.ad_id,
            owner_id: model.owner_id,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at,
            natural_updated: natural_time(updated_at, now),
        }
    }
}
