pub mod ads;
pub mod auth;
pub mod comments;
pub mod favorites;
pub mod forms;
