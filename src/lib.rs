//! Updeck Core
//!
//! The two subsystems at the heart of Updeck, a multi-tenant
//! changelog/roadmap/feedback platform: the embeddable widget runtime
//! model ([`widget`]) and the analytics aggregation engine ([`services`],
//! [`window`]), exposed over HTTP by [`router`].

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod widget;
pub mod window;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::env;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::window::Period;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    /// Fallback when the requested analytics period is absent or malformed.
    pub default_period: Period,
    /// Size of the top-content ranking.
    pub top_changelogs: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            database_url: "postgres://localhost/updeck".to_string(),
            default_period: Period::Days30,
            top_changelogs: 5,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            default_period: Period::coerce(
                env::var("ANALYTICS_DEFAULT_PERIOD")
                    .ok()
                    .and_then(|v| v.parse().ok()),
                defaults.default_period,
            ),
            top_changelogs: env::var("ANALYTICS_TOP_CHANGELOGS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.top_changelogs),
        }
    }
}

/// Aggregated services container
pub struct CoreServices {
    pub config: AppConfig,
    pub views: services::PageViewService,
    pub analytics: services::AnalyticsService,
}

impl CoreServices {
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        Self {
            views: services::PageViewService::new(db.clone()),
            analytics: services::AnalyticsService::new(db, config.top_changelogs),
            config,
        }
    }
}

/// Assemble the core's routes.
///
/// The ingestion endpoint is public and cross-origin (the widget posts
/// from arbitrary third-party pages); the analytics endpoint expects the
/// platform's auth middleware to have established the current user.
pub fn router(services: Arc<CoreServices>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers(Any);

    let public = Router::new()
        .route("/page-views", post(handlers::views::track_page_view))
        .layer(cors);

    let protected = Router::new().route(
        "/projects/:id/analytics",
        get(handlers::analytics::analytics_overview),
    );

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(services)
}
