//! Custom Axum Extractors
//!
//! The platform's authentication middleware (an external collaborator)
//! validates the session and inserts a `CurrentUser` into request
//! extensions; handlers consume it through `AuthUser`.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

/// Authenticated principal as established by the platform middleware
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
}

/// Extractor for the authenticated user
pub struct AuthUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
                    .into_response()
            })
    }
}
