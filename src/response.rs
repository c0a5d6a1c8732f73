use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

/// Where a client should go after a successful form submission, plus
/// whatever the mutation produced.
#[derive(Debug, Serialize, ToSchema)]
pub struct Redirect<T> {
    pub location: String,
    pub result: T,
}

impl<T> Redirect<T> {
    pub fn to(location: impl Into<String>, result: T) -> Self {
        Self {
            location: location.into(),
            result,
        }
    }
}

/// `303 See Other` pointing at `data.location`, with the envelope as body.
pub struct SeeOther<T>(pub ApiResponse<Redirect<T>>);

impl<T: Serialize> IntoResponse for SeeOther<T> {
    fn into_response(self) -> Response {
        let location = self
            .0
            .data
            .as_ref()
            .map(|redirect| redirect.location.clone())
            .unwrap_or_else(|| "/".to_string());
        (
            StatusCode::SEE_OTHER,
            [(header::LOCATION, location)],
            Json(self.0),
        )
            .into_response()
    }
}
