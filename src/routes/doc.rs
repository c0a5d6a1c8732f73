use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        ads::{AdDetail, AdListing},
        auth::{Credentials, LoginResponse},
        comments::CommentForm,
        favorites::FavoriteAdList,
        forms::{FieldKind, FormDescriptor, FormField},
    },
    error::FieldErrors,
    models::{Ad, Comment, User},
    response::{ApiResponse, Meta},
    routes::{ads, auth, comments, favorites, health, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        ads::list_ads,
        ads::new_ad_form,
        ads::create_ad,
        ads::get_ad,
        ads::edit_ad_form,
        ads::update_ad,
        ads::delete_ad,
        ads::ad_picture,
        ads::create_comment,
        ads::add_favorite,
        ads::remove_favorite,
        comments::delete_comment,
        favorites::list_favorites
    ),
    components(
        schemas(
            User,
            Ad,
            Comment,
            AdListing,
            AdDetail,
            FavoriteAdList,
            FormDescriptor,
            FormField,
            FieldKind,
            FieldErrors,
            CommentForm,
            Credentials,
            LoginResponse,
            params::Pagination,
            params::AdListQuery,
            Meta,
            ApiResponse<AdListing>,
            ApiResponse<AdDetail>,
            ApiResponse<FormDescriptor>,
            ApiResponse<FavoriteAdList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Ads", description = "Classified ad endpoints"),
        (name = "Comments", description = "Comment endpoints"),
        (name = "Favorites", description = "Favorite endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
