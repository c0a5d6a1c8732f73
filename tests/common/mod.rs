#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use classified_ads::{
    config::AppConfig,
    entity::{ad_pictures, ads, comments},
    state::AppState,
};
use sea_orm::{DatabaseConnection, MockExecResult};
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret";

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: TEST_SECRET.to_string(),
        max_picture_bytes: 1024,
        ..AppConfig::default()
    }
}

pub fn state_with(orm: DatabaseConnection) -> AppState {
    AppState::new(orm, test_config())
}

pub fn ad_model(owner_id: Uuid) -> ads::Model {
    let now = Utc::now().fixed_offset();
    ads::Model {
        id: Uuid::new_v4(),
        title: "Bike".into(),
        text: "Red bike".into(),
        price: Some(15000),
        owner_id,
        created_at: now,
        updated_at: now,
    }
}

pub fn comment_model(ad_id: Uuid, owner_id: Uuid) -> comments::Model {
    let now = Utc::now().fixed_offset();
    comments::Model {
        id: Uuid::new_v4(),
        text: "Is it still available?".into(),
        ad_id,
        owner_id,
        created_at: now,
        updated_at: now,
    }
}

pub fn picture_model(ad_id: Uuid) -> ad_pictures::Model {
    ad_pictures::Model {
        ad_id,
        content_type: "image/png".into(),
        data: vec![1, 2, 3],
        updated_at: Utc::now().fixed_offset(),
    }
}

pub fn rows(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

/// Every statement the mock connection saw, rendered with `Debug`. Takes the
/// state so the connection is no longer shared.
pub fn statement_log(state: AppState) -> Vec<String> {
    let Ok(orm) = Arc::try_unwrap(state.orm) else {
        panic!("connection still shared");
    };
    orm.into_transaction_log()
        .iter()
        .map(|t| format!("{t:?}"))
        .collect()
}
