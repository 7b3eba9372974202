//! Core Data Models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Page category enum — what kind of public page a view was recorded on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "page_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PageCategory {
    Changelog,
    Roadmap,
    Feedback,
    Widget,
}

/// Feedback category enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "feedback_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCategory {
    Feature,
    Bug,
    Improvement,
}

/// Feedback status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "feedback_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    Open,
    UnderReview,
    Planned,
    Closed,
}

/// Project record, as resolved by slug or by owner
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub slug: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// A single recorded page view. Append-only: rows are never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PageViewEvent {
    pub id: Uuid,
    pub project_id: Uuid,
    pub page: PageCategory,
    pub changelog_id: Option<Uuid>,
    pub visitor_id: String,
    pub created_at: DateTime<Utc>,
}

/// Track page view request (public ingestion endpoint)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TrackPageView {
    #[validate(length(min = 1, max = 100, message = "Project slug must be 1-100 characters"))]
    pub project_slug: String,

    pub page: PageCategory,

    pub changelog_id: Option<Uuid>,

    #[validate(length(min = 1, max = 64, message = "Visitor id must be 1-64 characters"))]
    pub visitor_id: String,
}

/// Analytics overview query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsQuery {
    pub days: Option<i64>,
}

/// The four KPI pairs, each as (current period, previous period)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_views: i64,
    pub prev_total_views: i64,
    pub changelog_views: i64,
    pub prev_changelog_views: i64,
    pub feedbacks_received: i64,
    pub prev_feedbacks_received: i64,
    pub votes_received: i64,
    pub prev_votes_received: i64,
}

/// One day of the dense daily series. Every counter is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyViews {
    pub date: NaiveDate,
    pub changelog: i64,
    pub roadmap: i64,
    pub feedback: i64,
    pub widget: i64,
}

impl DailyViews {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            changelog: 0,
            roadmap: 0,
            feedback: 0,
            widget: 0,
        }
    }

    pub fn total(&self) -> i64 {
        self.changelog + self.roadmap + self.feedback + self.widget
    }
}

/// Sparse aggregate row: views per (day, page) with at least one hit
#[derive(Debug, Clone, FromRow)]
pub struct DailyViewRow {
    pub day: NaiveDate,
    pub page: PageCategory,
    pub views: i64,
}

/// Changelog entry ranked by lifetime views
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TopChangelog {
    pub id: Uuid,
    pub title: String,
    pub views: i64,
}

/// Feedback count per category (zero-count categories omitted)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryCount {
    pub category: FeedbackCategory,
    pub count: i64,
}

/// Feedback count per status (zero-count statuses omitted)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StatusCount {
    pub status: FeedbackStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackBreakdown {
    pub by_category: Vec<CategoryCount>,
    pub by_status: Vec<StatusCount>,
}

/// Full analytics overview for the dashboard.
///
/// Consumers must not assume any ordering beyond: `daily_views` ascending by
/// date with no gaps, `top_changelogs` descending by lifetime views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    pub kpis: KpiSummary,
    pub daily_views: Vec<DailyViews>,
    pub top_changelogs: Vec<TopChangelog>,
    pub feedback_breakdown: FeedbackBreakdown,
}

/// API error response
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_category_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PageCategory::Changelog).unwrap(),
            "\"changelog\""
        );
        let parsed: PageCategory = serde_json::from_str("\"widget\"").unwrap();
        assert_eq!(parsed, PageCategory::Widget);
    }

    #[test]
    fn feedback_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&FeedbackStatus::UnderReview).unwrap(),
            "\"under_review\""
        );
    }

    #[test]
    fn track_page_view_rejects_empty_slug() {
        let req = TrackPageView {
            project_slug: String::new(),
            page: PageCategory::Widget,
            changelog_id: None,
            visitor_id: "v-1".into(),
        };
        assert!(req.validate().is_err());
    }
}
