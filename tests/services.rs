mod common;

use std::collections::BTreeMap;

use classified_ads::{
    dto::{ads::AdForm, comments::CommentForm},
    entity::{ad_pictures, ads, comments},
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::AdListQuery,
    services::{ad_service, comment_service, favorite_service},
};
use common::{ad_model, comment_model, picture_model, rows, state_with, statement_log};
use sea_orm::{DatabaseBackend, MockDatabase, Value};
use uuid::Uuid;

type Row = BTreeMap<&'static str, Value>;

fn count_row(total: i64) -> Row {
    BTreeMap::from([("num_items", Value::from(total))])
}

fn ad_id_row(ad_id: Uuid) -> Row {
    BTreeMap::from([("ad_id", Value::from(ad_id))])
}

fn tag_row(ad_id: Uuid, name: &str) -> Row {
    BTreeMap::from([("ad_id", Value::from(ad_id)), ("name", Value::from(name))])
}

#[tokio::test]
async fn anonymous_search_lists_newest_ten_without_favorites() -> anyhow::Result<()> {
    let owner = Uuid::new_v4();
    let newer = ad_model(owner);
    let older = ad_model(owner);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(2)]])
        .append_query_results([vec![newer.clone(), older.clone()]])
        .append_query_results([vec![tag_row(newer.id, "bike")], vec![ad_id_row(older.id)]])
        .into_connection();
    let state = state_with(db);

    let query = AdListQuery {
        search: Some(" Bike ".into()),
        per_page: Some(50),
        ..AdListQuery::default()
    };
    let resp = ad_service::list_ads(&state, None, query).await?;

    let meta = resp.meta.expect("meta");
    assert_eq!(meta.total, Some(2));
    assert_eq!(meta.per_page, Some(10));
    let listing = resp.data.expect("listing");
    assert!(listing.favorites.is_empty());
    assert_eq!(listing.search.as_deref(), Some("Bike"));
    let ids: Vec<Uuid> = listing.items.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
    assert_eq!(listing.items[0].tags, vec!["bike".to_string()]);
    assert_eq!(listing.items[0].picture_url, None);
    assert_eq!(
        listing.items[1].picture_url.as_deref(),
        Some(format!("/api/ads/{}/picture", older.id).as_str())
    );

    let log = statement_log(state);
    let page_query = log
        .iter()
        .find(|s| s.contains("LIMIT"))
        .expect("paged ads query");
    assert!(
        page_query.contains(r#"ORDER BY \"ads\".\"updated_at\" DESC"#),
        "{page_query}"
    );
    assert!(page_query.contains("BigUnsigned(Some(10))"), "{page_query}");
    assert!(page_query.contains("ILIKE"), "{page_query}");
    assert!(
        page_query.contains(r#"IN (SELECT \"ad_tags\".\"ad_id\" FROM \"ad_tags\""#),
        "{page_query}"
    );
    assert!(page_query.contains(r#"String(Some("bike"))"#), "{page_query}");
    assert!(page_query.contains(r#"String(Some("%Bike%"))"#), "{page_query}");
    assert!(
        !log.iter().any(|s| s.contains(r#"FROM \"favorites\""#)),
        "anonymous listing must not read favorites: {log:#?}"
    );
    Ok(())
}

#[tokio::test]
async fn signed_in_listing_reports_favorite_ids() -> anyhow::Result<()> {
    let ad = ad_model(Uuid::new_v4());
    let elsewhere = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(1)]])
        .append_query_results([vec![ad.clone()]])
        .append_query_results([
            Vec::<Row>::new(),
            Vec::<Row>::new(),
            vec![ad_id_row(ad.id), ad_id_row(elsewhere)],
        ])
        .into_connection();
    let state = state_with(db);
    let viewer = AuthUser {
        user_id: Uuid::new_v4(),
    };

    let resp = ad_service::list_ads(&state, Some(&viewer), AdListQuery::default()).await?;

    let listing = resp.data.expect("listing");
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.favorites, vec![ad.id, elsewhere]);
    assert_eq!(listing.search, None);

    let log = statement_log(state);
    assert!(
        log.iter().any(|s| s.contains(r#"FROM \"favorites\""#)
            && s.contains(r#"\"favorites\".\"user_id\" = $1"#)),
        "{log:#?}"
    );
    assert!(
        !log.iter().any(|s| s.contains("ILIKE")),
        "no search term means no filter: {log:#?}"
    );
    Ok(())
}

#[tokio::test]
async fn adding_a_favorite_twice_relies_on_the_unique_constraint() -> anyhow::Result<()> {
    let ad = ad_model(Uuid::new_v4());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![ad.clone()], vec![ad.clone()]])
        .append_exec_results([rows(1), rows(1), rows(0)])
        .into_connection();
    let state = state_with(db);
    let user = AuthUser {
        user_id: Uuid::new_v4(),
    };

    favorite_service::add_favorite(&state, &user, ad.id).await?;
    favorite_service::add_favorite(&state, &user, ad.id).await?;

    let log = statement_log(state);
    let guarded_inserts = log
        .iter()
        .filter(|s| s.contains("INSERT INTO") && s.contains("ON CONFLICT"))
        .count();
    assert_eq!(guarded_inserts, 2, "{log:#?}");
    assert!(
        !log.iter()
            .any(|s| s.contains("SELECT") && s.contains(r#"FROM \"favorites\""#)),
        "favorites must not be looked up before inserting: {log:#?}"
    );
    Ok(())
}

#[tokio::test]
async fn removing_a_missing_favorite_is_not_an_error() -> anyhow::Result<()> {
    let ad = ad_model(Uuid::new_v4());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![ad.clone()], vec![ad.clone()]])
        .append_exec_results([rows(0), rows(0)])
        .into_connection();
    let state = state_with(db);
    let user = AuthUser {
        user_id: Uuid::new_v4(),
    };

    let first = favorite_service::remove_favorite(&state, &user, ad.id).await?;
    let second = favorite_service::remove_favorite(&state, &user, ad.id).await?;
    assert_eq!(first.message, "Removed from favorites");
    assert_eq!(second.message, "Removed from favorites");
    Ok(())
}

#[tokio::test]
async fn favorite_on_unknown_ad_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<ads::Model>::new()])
        .into_connection();
    let state = state_with(db);
    let user = AuthUser {
        user_id: Uuid::new_v4(),
    };

    let result = favorite_service::add_favorite(&state, &user, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn update_by_stranger_is_forbidden_even_with_invalid_fields() {
    let ad = ad_model(Uuid::new_v4());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![ad.clone()]])
        .into_connection();
    let state = state_with(db);
    let stranger = AuthUser {
        user_id: Uuid::new_v4(),
    };

    let result = ad_service::update_ad(&state, &stranger, ad.id, AdForm::default()).await;
    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn delete_ad_by_stranger_is_forbidden() {
    let ad = ad_model(Uuid::new_v4());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![ad.clone()]])
        .into_connection();
    let state = state_with(db);
    let stranger = AuthUser {
        user_id: Uuid::new_v4(),
    };

    let result = ad_service::delete_ad(&state, &stranger, ad.id).await;
    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn deleting_a_comment_redirects_to_its_ad() -> anyhow::Result<()> {
    let owner = Uuid::new_v4();
    let ad_id = Uuid::new_v4();
    let comment = comment_model(ad_id, owner);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![comment.clone()]])
        .append_exec_results([rows(1), rows(1)])
        .into_connection();
    let state = state_with(db);

    let resp =
        comment_service::delete_comment(&state, &AuthUser { user_id: owner }, comment.id).await?;
    let redirect = resp.data.expect("redirect");
    assert_eq!(redirect.location, format!("/api/ads/{ad_id}"));
    Ok(())
}

#[tokio::test]
async fn deleting_someone_elses_comment_is_forbidden() {
    let comment = comment_model(Uuid::new_v4(), Uuid::new_v4());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![comment.clone()]])
        .into_connection();
    let state = state_with(db);

    let result = comment_service::delete_comment(
        &state,
        &AuthUser {
            user_id: Uuid::new_v4(),
        },
        comment.id,
    )
    .await;
    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn short_comment_is_rejected_with_field_message() {
    let ad = ad_model(Uuid::new_v4());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![ad.clone()]])
        .into_connection();
    let state = state_with(db);

    let result = comment_service::create_comment(
        &state,
        &AuthUser {
            user_id: Uuid::new_v4(),
        },
        ad.id,
        CommentForm {
            comment: "ok".into(),
        },
    )
    .await;
    match result {
        Err(AppError::Validation(errors)) => assert!(errors.get("comment").is_some()),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn comment_is_stored_with_caller_as_owner() -> anyhow::Result<()> {
    let ad = ad_model(Uuid::new_v4());
    let user_id = Uuid::new_v4();
    let stored = comment_model(ad.id, user_id);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![ad.clone()]])
        .append_query_results([vec![stored.clone()]])
        .append_exec_results([rows(1)])
        .into_connection();
    let state = state_with(db);

    let resp = comment_service::create_comment(
        &state,
        &AuthUser { user_id },
        ad.id,
        CommentForm {
            comment: "Is it still available?".into(),
        },
    )
    .await?;
    let redirect = resp.data.expect("redirect");
    assert_eq!(redirect.location, format!("/api/ads/{}", ad.id));
    assert_eq!(redirect.result.owner_id, user_id);
    Ok(())
}

#[tokio::test]
async fn detail_of_unknown_ad_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<ads::Model>::new()])
        .into_connection();
    let state = state_with(db);

    let result = ad_service::get_ad_detail(&state, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn picture_keeps_stored_bytes_and_type() -> anyhow::Result<()> {
    let ad_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![picture_model(ad_id)]])
        .into_connection();
    let state = state_with(db);

    let picture = ad_service::get_picture(&state, ad_id).await?;
    assert_eq!(picture.content_type, "image/png");
    assert_eq!(picture.data, vec![1, 2, 3]);
    Ok(())
}

#[tokio::test]
async fn missing_picture_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<ad_pictures::Model>::new()])
        .into_connection();
    let state = state_with(db);

    let result = ad_service::get_picture(&state, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn comment_on_unknown_ad_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<ads::Model>::new()])
        .append_query_results([Vec::<comments::Model>::new()])
        .into_connection();
    let state = state_with(db);

    let result = comment_service::create_comment(
        &state,
        &AuthUser {
            user_id: Uuid::new_v4(),
        },
        Uuid::new_v4(),
        CommentForm {
            comment: "Still for sale?".into(),
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::NotFound)));
}
