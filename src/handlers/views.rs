//! Page View Ingestion Handler

use crate::models::TrackPageView;
use crate::services::ServiceError;
use crate::CoreServices;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

/// POST /page-views - Record one page view
///
/// Public, cross-origin endpoint. Every call appends a new event; callers
/// are responsible for firing it once per meaningful view.
pub async fn track_page_view(
    State(services): State<Arc<CoreServices>>,
    Json(req): Json<TrackPageView>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    services.views.track(&req).await?;

    Ok(StatusCode::CREATED)
}
