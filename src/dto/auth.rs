use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of both `/auth/register` and `/auth/login`.
#[derive(Deserialize, Debug, ToSchema)]
pub struct Credentials {
    /// Matched case-insensitively; stored lowercased.
    #[schema(example = "seller@example.com")]
    pub email: String,
    #[schema(min_length = 6)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Ready to send as the `Authorization` header value.
    pub token: String,
}
