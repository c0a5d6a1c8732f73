use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State, multipart::MultipartError},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        ads::{AdDetail, AdForm, AdListing, UploadedPicture},
        comments::CommentForm,
        forms::FormDescriptor,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Ad, Comment},
    response::{ApiResponse, Redirect, SeeOther},
    routes::params::AdListQuery,
    services::{ad_service, comment_service, favorite_service},
    state::AppState,
    validation::picture_too_large,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ads).post(create_ad))
        .route("/new", get(new_ad_form))
        .route(
            "/{id}",
            get(get_ad).post(update_ad).put(update_ad).delete(delete_ad),
        )
        .route("/{id}/edit", get(edit_ad_form))
        .route("/{id}/picture", get(ad_picture))
        .route("/{id}/comments", post(create_comment))
        .route("/{id}/favorite", post(add_favorite))
        .route("/{id}/unfavorite", post(remove_favorite))
}

/// Collect the multipart fields of an ad form. Unknown fields are ignored.
/// A body cut off at the size limit is reported against the picture field.
pub async fn read_ad_form(
    mut multipart: Multipart,
    max_picture_bytes: usize,
) -> AppResult<AdForm> {
    let mut form = AdForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_picture_bytes))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "picture" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, max_picture_bytes))?;
                form.picture = Some(UploadedPicture {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            "title" | "text" | "price" | "tags" | "picture_clear" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, max_picture_bytes))?;
                match name.as_str() {
                    "title" => form.title = Some(value),
                    "text" => form.text = Some(value),
                    "price" => form.price = Some(value),
                    "tags" => form.tags = Some(value),
                    _ => form.picture_clear = matches!(value.trim(), "true" | "on" | "1"),
                }
            }
            _ => {}
        }
    }
    Ok(form)
}

fn multipart_error(err: MultipartError, max_picture_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return picture_too_large(max_picture_bytes);
    }
    AppError::BadRequest(format!("Multipart error: {}", err.body_text()))
}

#[utoipa::path(
    get,
    path = "/api/ads",
    params(AdListQuery),
    responses(
        (status = 200, description = "Most recently updated ads, at most 10", body = ApiResponse<AdListing>),
        (status = 401, description = "Malformed or expired token")
    ),
    security((), ("bearer_auth" = [])),
    tag = "Ads"
)]
pub async fn list_ads(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    Query(query): Query<AdListQuery>,
) -> AppResult<Json<ApiResponse<AdListing>>> {
    let resp = ad_service::list_ads(&state, viewer.as_ref(), query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/ads/new",
    responses(
        (status = 200, description = "Empty ad form", body = ApiResponse<FormDescriptor>)
    ),
    security(("bearer_auth" = [])),
    tag = "Ads"
)]
pub async fn new_ad_form(_user: AuthUser) -> Json<ApiResponse<FormDescriptor>> {
    Json(ad_service::new_ad_form())
}

#[utoipa::path(
    post,
    path = "/api/ads",
    request_body(content_type = "multipart/form-data", description = "title, text, price, tags, picture"),
    responses(
        (status = 303, description = "Created, redirect to the listing", body = ApiResponse<Redirect<Ad>>),
        (status = 422, description = "Validation failed, including an oversized picture")
    ),
    security(("bearer_auth" = [])),
    tag = "Ads"
)]
pub async fn create_ad(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<SeeOther<Ad>> {
    let form = read_ad_form(multipart, state.config.max_picture_bytes).await?;
    let resp = ad_service::create_ad(&state, &user, form).await?;
    Ok(SeeOther(resp))
}

#[utoipa::path(
    get,
    path = "/api/ads/{id}",
    params(
        ("id" = Uuid, Path, description = "Ad ID")
    ),
    responses(
        (status = 200, description = "Ad with comments and an empty comment form", body = ApiResponse<AdDetail>),
        (status = 404, description = "Ad not found")
    ),
    tag = "Ads"
)]
pub async fn get_ad(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<AdDetail>>> {
    let resp = ad_service::get_ad_detail(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/ads/{id}/edit",
    params(
        ("id" = Uuid, Path, description = "Ad ID")
    ),
    responses(
        (status = 200, description = "Prefilled ad form", body = ApiResponse<FormDescriptor>),
        (status = 404, description = "Ad not found or not owned by the caller")
    ),
    security(("bearer_auth" = [])),
    tag = "Ads"
)]
pub async fn edit_ad_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<FormDescriptor>>> {
    let resp = ad_service::edit_ad_form(&state, &user, id)
        .await
        .map_err(AppError::conceal_forbidden)?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/ads/{id}",
    params(
        ("id" = Uuid, Path, description = "Ad ID")
    ),
    request_body(content_type = "multipart/form-data", description = "title, text, price, tags, picture, picture_clear"),
    responses(
        (status = 303, description = "Updated, redirect to the listing", body = ApiResponse<Redirect<Ad>>),
        (status = 404, description = "Ad not found or not owned by the caller"),
        (status = 422, description = "Validation failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Ads"
)]
pub async fn update_ad(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<SeeOther<Ad>> {
    let form = read_ad_form(multipart, state.config.max_picture_bytes).await?;
    let resp = ad_service::update_ad(&state, &user, id, form)
        .await
        .map_err(AppError::conceal_forbidden)?;
    Ok(SeeOther(resp))
}

#[utoipa::path(
    delete,
    path = "/api/ads/{id}",
    params(
        ("id" = Uuid, Path, description = "Ad ID")
    ),
    responses(
        (status = 303, description = "Deleted, redirect to the listing", body = ApiResponse<Redirect<serde_json::Value>>),
        (status = 404, description = "Ad not found or not owned by the caller")
    ),
    security(("bearer_auth" = [])),
    tag = "Ads"
)]
pub async fn delete_ad(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<SeeOther<serde_json::Value>> {
    let resp = ad_service::delete_ad(&state, &user, id)
        .await
        .map_err(AppError::conceal_forbidden)?;
    Ok(SeeOther(resp))
}

#[utoipa::path(
    get,
    path = "/api/ads/{id}/picture",
    params(
        ("id" = Uuid, Path, description = "Ad ID")
    ),
    responses(
        (status = 200, description = "Raw picture bytes with the stored Content-Type and Content-Length"),
        (status = 404, description = "Ad or picture not found")
    ),
    tag = "Ads"
)]
pub async fn ad_picture(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let picture = ad_service::get_picture(&state, id).await?;
    let content_type = HeaderValue::from_str(&picture.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let content_length = HeaderValue::from(picture.data.len());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_LENGTH, content_length),
        ],
        picture.data,
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/ads/{id}/comments",
    params(
        ("id" = Uuid, Path, description = "Ad ID")
    ),
    request_body = CommentForm,
    responses(
        (status = 303, description = "Created, redirect to the ad", body = ApiResponse<Redirect<Comment>>),
        (status = 404, description = "Ad not found"),
        (status = 422, description = "Validation failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CommentForm>,
) -> AppResult<SeeOther<Comment>> {
    let resp = comment_service::create_comment(&state, &user, id, payload).await?;
    Ok(SeeOther(resp))
}

#[utoipa::path(
    post,
    path = "/api/ads/{id}/favorite",
    params(
        ("id" = Uuid, Path, description = "Ad ID")
    ),
    responses(
        (status = 200, description = "Favorited; repeating is a no-op", body = ApiResponse<serde_json::Value>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Ad not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = favorite_service::add_favorite(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/ads/{id}/unfavorite",
    params(
        ("id" = Uuid, Path, description = "Ad ID")
    ),
    responses(
        (status = 200, description = "Unfavorited; repeating is a no-op", body = ApiResponse<serde_json::Value>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Ad not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = favorite_service::remove_favorite(&state, &user, id).await?;
    Ok(Json(resp))
}
