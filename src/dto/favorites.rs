use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Ad;

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FavoriteAdList {
    #[schema(value_type = Vec<Ad>)]
    pub items: Vec<Ad>,
}
