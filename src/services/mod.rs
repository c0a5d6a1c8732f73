pub mod ad_service;
pub mod auth_service;
pub mod comment_service;
pub mod favorite_service;
pub(crate) mod listing;
