//! Progress analytics API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::{AnalyticsService, ExportService, LogSessionInput, ProgressService};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use fitness_progress_shared::models::WeeklySummary;
use fitness_progress_shared::types::{
    DailyRangeQuery, DailySummaryResponse, LogSessionRequest, LogSessionResponse,
    PersonalBestResponse, StreakResponse, WeeklySummaryQuery, WeeklySummaryResponse,
};
use fitness_progress_shared::weekly::{week_start_for, weekly_window};
use uuid::Uuid;
use validator::Validate;

/// Create progress routes
pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/streak", get(get_streak))
        .route("/personal-bests", get(get_personal_bests))
        .route("/weekly", get(get_weekly_summary))
        .route("/weekly/export", get(export_weekly_summary))
        .route("/daily", get(get_daily_summaries))
        .route("/sessions", post(log_session))
}

/// GET /api/v1/progress/streak
async fn get_streak(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<StreakResponse>, ApiError> {
    let today = state.config().analytics.today();
    let streak = AnalyticsService::get_streak(state.store(), auth.user_id, today).await?;

    Ok(Json(StreakResponse {
        streak,
        as_of: today,
    }))
}

/// GET /api/v1/progress/personal-bests
async fn get_personal_bests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<PersonalBestResponse>>, ApiError> {
    let bests = AnalyticsService::get_personal_bests(state.store(), auth.user_id).await?;
    Ok(Json(bests.into_iter().map(Into::into).collect()))
}

/// Weekly summary, served from the cache for Sunday-aligned weeks
async fn weekly_summary(
    state: &AppState,
    user_id: Uuid,
    week_start: Option<NaiveDate>,
) -> Result<WeeklySummary, ApiError> {
    let today = state.config().analytics.today();
    let (start, _) = weekly_window(week_start, today)?;
    // Invalidation on log only knows the Sunday-based week
    let cacheable = week_start_for(start).is_ok_and(|sunday| sunday == start);

    if cacheable {
        if let Some(summary) = state.cache.get(user_id, start).await {
            return Ok(summary);
        }
    }

    let summary = AnalyticsService::get_weekly_summary(
        state.store(),
        user_id,
        Some(start),
        today,
        &state.summary_settings(),
    )
    .await?;

    if cacheable {
        state.cache.put(&summary).await;
    }
    Ok(summary)
}

/// GET /api/v1/progress/weekly?week_start=YYYY-MM-DD
async fn get_weekly_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<WeeklySummaryQuery>,
) -> Result<Json<WeeklySummaryResponse>, ApiError> {
    let summary = weekly_summary(&state, auth.user_id, query.week_start).await?;
    Ok(Json(summary.into()))
}

/// GET /api/v1/progress/weekly/export - Daily rows of the week as CSV
async fn export_weekly_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<WeeklySummaryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = weekly_summary(&state, auth.user_id, query.week_start).await?;
    let csv = ExportService::weekly_csv(&summary)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        ExportService::weekly_filename(&summary)
    );
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Invalid header value: {}", e)))?,
    );

    Ok((headers, csv))
}

/// GET /api/v1/progress/daily?start=YYYY-MM-DD&end=YYYY-MM-DD
async fn get_daily_summaries(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DailyRangeQuery>,
) -> Result<Json<Vec<DailySummaryResponse>>, ApiError> {
    let days = AnalyticsService::get_daily_summaries(
        state.store(),
        auth.user_id,
        query.start,
        query.end,
        &state.summary_settings(),
    )
    .await?;

    Ok(Json(days.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/progress/sessions
async fn log_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<LogSessionRequest>,
) -> Result<(StatusCode, Json<LogSessionResponse>), ApiError> {
    payload.validate()?;

    let logged =
        ProgressService::log_session(state.store(), auth.user_id, LogSessionInput::from(payload))
            .await?;

    if let Ok(week) = week_start_for(logged.session.date) {
        state.cache.invalidate(auth.user_id, week).await;
    }

    Ok((StatusCode::CREATED, Json(logged.into())))
}
