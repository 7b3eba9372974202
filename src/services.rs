//! Core Services
//!
//! Database-backed services for page-view ingestion and the analytics
//! overview. Both operate on the append-only fact tables; neither ever
//! mutates a row after creation.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::*;
use crate::window::{dense_series, AnalyticsWindow, Period, Span};

/// Service error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ServiceError {
    /// Uniform failure for unauthorized and nonexistent projects. The two
    /// cases are deliberately indistinguishable so project ids cannot be
    /// enumerated.
    fn project_not_found() -> Self {
        ServiceError::NotFound("Project not found".to_string())
    }
}

/// Page view ingestion service
pub struct PageViewService {
    db: PgPool,
}

impl PageViewService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record one page view against a public project.
    ///
    /// Not idempotent: every call appends a new row, so callers fire it at
    /// most once per meaningful view (e.g. once per widget open).
    pub async fn track(&self, req: &TrackPageView) -> Result<(), ServiceError> {
        let project: Project = sqlx::query_as(
            "SELECT * FROM projects WHERE slug = $1 AND is_public = TRUE",
        )
        .bind(&req.project_slug)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(ServiceError::project_not_found)?;

        sqlx::query(
            "INSERT INTO page_views (project_id, page, changelog_id, visitor_id)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(project.id)
        .bind(req.page)
        .bind(req.changelog_id)
        .bind(&req.visitor_id)
        .execute(&self.db)
        .await?;

        tracing::debug!(project = %project.slug, page = ?req.page, "Recorded page view");

        Ok(())
    }
}

/// Analytics aggregation service
pub struct AnalyticsService {
    db: PgPool,
    top_changelogs: i64,
}

impl AnalyticsService {
    pub fn new(db: PgPool, top_changelogs: i64) -> Self {
        Self { db, top_changelogs }
    }

    /// Compute the full analytics overview for one project and period.
    ///
    /// The ownership precondition runs before any aggregate query; after it
    /// passes, the independent aggregates are dispatched concurrently and
    /// the first failure aborts the whole overview — there is no
    /// partial-result mode.
    pub async fn overview(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        period: Period,
    ) -> Result<AnalyticsOverview, ServiceError> {
        self.assert_project_owner(user_id, project_id).await?;

        let window = AnalyticsWindow::ending_at(Utc::now(), period);
        let current = window.current();
        let previous = window.previous();

        // The four KPI pairs are independent counts; fan them out together.
        let (
            total_views,
            prev_total_views,
            changelog_views,
            prev_changelog_views,
            feedbacks_received,
            prev_feedbacks_received,
            votes_received,
            prev_votes_received,
        ) = tokio::try_join!(
            self.count_views(project_id, None, current),
            self.count_views(project_id, None, previous),
            self.count_views(project_id, Some(PageCategory::Changelog), current),
            self.count_views(project_id, Some(PageCategory::Changelog), previous),
            self.count_feedbacks(project_id, current),
            self.count_feedbacks(project_id, previous),
            self.count_votes(project_id, current),
            self.count_votes(project_id, previous),
        )?;

        let kpis = KpiSummary {
            total_views,
            prev_total_views,
            changelog_views,
            prev_changelog_views,
            feedbacks_received,
            prev_feedbacks_received,
            votes_received,
            prev_votes_received,
        };

        let sparse = self.daily_view_rows(project_id, &window).await?;
        let daily_views = dense_series(
            &sparse,
            window.current_start.date_naive(),
            window.now.date_naive(),
        );

        let top_changelogs = self.top_changelogs(project_id).await?;

        let (by_category, by_status) = tokio::try_join!(
            self.feedback_by_category(project_id),
            self.feedback_by_status(project_id),
        )?;

        Ok(AnalyticsOverview {
            kpis,
            daily_views,
            top_changelogs,
            feedback_breakdown: FeedbackBreakdown {
                by_category,
                by_status,
            },
        })
    }

    /// Resolve the project only if it belongs to the requesting user.
    async fn assert_project_owner(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Project, ServiceError> {
        sqlx::query_as("SELECT * FROM projects WHERE id = $1 AND owner_id = $2")
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(ServiceError::project_not_found)
    }

    /// Count page views in a span, optionally scoped to one page category.
    async fn count_views(
        &self,
        project_id: Uuid,
        page: Option<PageCategory>,
        span: Span,
    ) -> Result<i64, ServiceError> {
        let count = sqlx::query_scalar(
            "SELECT count(*) FROM page_views
             WHERE project_id = $1
               AND created_at >= $2
               AND ($3::page_category IS NULL OR page = $3)
               AND ($4::timestamptz IS NULL OR created_at < $4)",
        )
        .bind(project_id)
        .bind(span.from)
        .bind(page)
        .bind(span.until)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    /// Count feedback items created in a span.
    async fn count_feedbacks(&self, project_id: Uuid, span: Span) -> Result<i64, ServiceError> {
        let count = sqlx::query_scalar(
            "SELECT count(*) FROM feedbacks
             WHERE project_id = $1
               AND created_at >= $2
               AND ($3::timestamptz IS NULL OR created_at < $3)",
        )
        .bind(project_id)
        .bind(span.from)
        .bind(span.until)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    /// Count votes cast in a span, scoped to the project through the voted
    /// feedback item.
    async fn count_votes(&self, project_id: Uuid, span: Span) -> Result<i64, ServiceError> {
        let count = sqlx::query_scalar(
            "SELECT count(*) FROM feedback_votes v
             JOIN feedbacks f ON f.id = v.feedback_id
             WHERE f.project_id = $1
               AND v.created_at >= $2
               AND ($3::timestamptz IS NULL OR v.created_at < $3)",
        )
        .bind(project_id)
        .bind(span.from)
        .bind(span.until)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    /// Sparse per-(day, page) view counts for the current window. Days are
    /// grouped on the stored timestamp, no timezone conversion.
    async fn daily_view_rows(
        &self,
        project_id: Uuid,
        window: &AnalyticsWindow,
    ) -> Result<Vec<DailyViewRow>, ServiceError> {
        let rows = sqlx::query_as(
            "SELECT date_trunc('day', created_at)::date AS day,
                    page,
                    count(*) AS views
             FROM page_views
             WHERE project_id = $1 AND created_at >= $2
             GROUP BY 1, 2
             ORDER BY 1",
        )
        .bind(project_id)
        .bind(window.current_start)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Top changelog entries by lifetime view count (not windowed),
    /// descending, stable tie-break on creation order.
    async fn top_changelogs(&self, project_id: Uuid) -> Result<Vec<TopChangelog>, ServiceError> {
        let rows = sqlx::query_as(
            "SELECT c.id, c.title, count(pv.id) AS views
             FROM changelogs c
             LEFT JOIN page_views pv ON pv.changelog_id = c.id
             WHERE c.project_id = $1
             GROUP BY c.id, c.title, c.created_at
             ORDER BY count(pv.id) DESC, c.created_at ASC
             LIMIT $2",
        )
        .bind(project_id)
        .bind(self.top_changelogs)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn feedback_by_category(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<CategoryCount>, ServiceError> {
        let rows = sqlx::query_as(
            "SELECT category, count(*) AS count
             FROM feedbacks
             WHERE project_id = $1
             GROUP BY category",
        )
        .bind(project_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn feedback_by_status(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<StatusCount>, ServiceError> {
        let rows = sqlx::query_as(
            "SELECT status, count(*) AS count
             FROM feedbacks
             WHERE project_id = $1
             GROUP BY status",
        )
        .bind(project_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
