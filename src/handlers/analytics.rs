//! Analytics Handlers

use crate::extractors::AuthUser;
use crate::models::AnalyticsQuery;
use crate::services::ServiceError;
use crate::window::Period;
use crate::CoreServices;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// GET /projects/:id/analytics - Analytics overview for one project
pub async fn analytics_overview(
    State(services): State<Arc<CoreServices>>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let period = Period::coerce(query.days, services.config.default_period);

    let overview = services
        .analytics
        .overview(user.id, project_id, period)
        .await?;

    Ok(Json(overview))
}
