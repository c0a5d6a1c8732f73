use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::forms::FormDescriptor,
    models::{Ad, Comment},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct AdListing {
    pub items: Vec<Ad>,
    /// Every ad the caller has favorited; empty for anonymous callers.
    pub favorites: Vec<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdDetail {
    pub ad: Ad,
    pub comments: Vec<Comment>,
    pub comment_form: FormDescriptor,
}

/// An ad form exactly as submitted, before validation.
#[derive(Debug, Default, Clone)]
pub struct AdForm {
    pub title: Option<String>,
    pub text: Option<String>,
    pub price: Option<String>,
    pub tags: Option<String>,
    pub picture: Option<UploadedPicture>,
    pub picture_clear: bool,
}

#[derive(Debug, Clone)]
pub struct UploadedPicture {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Raw image bytes plus the metadata needed to serve them.
#[derive(Debug, Clone)]
pub struct Picture {
    pub content_type: String,
    pub data: Vec<u8>,
}
