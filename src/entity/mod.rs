pub mod ad_pictures;
pub mod ad_tags;
pub mod ads;
pub mod audit_logs;
pub mod comments;
pub mod favorites;
pub mod tags;
pub mod users;

pub use ad_pictures::Entity as AdPictures;
pub use ad_tags::Entity as AdTags;
pub use ads::Entity as Ads;
pub use audit_logs::Entity as AuditLogs;
pub use comments::Entity as Comments;
pub use favorites::Entity as Favorites;
pub use tags::Entity as Tags;
pub use users::Entity as Users;
