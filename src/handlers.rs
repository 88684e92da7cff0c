use crate::aggregate::{
    month_overview, summarize, week_overview, MonthOverview, WeekOverview, WindowSummary,
};
use crate::errors::AppError;
use crate::models::{
    ChartQuery, MoodEntry, NewEntryRequest, OverviewQuery, RecentQuery, SummaryQuery,
    SummaryWindow, DEFAULT_RECENT_LIMIT, MAX_NOTES_CHARS,
};
use crate::resample::{build_chart, chart_windows, ChartResponse};
use crate::score::default_emoji;
use crate::state::AppState;
use crate::storage::{persist_data, recent_entries};
use crate::window::{window_for, WindowKind, MAX_TRAILING_DAYS};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

const DEFAULT_TRAILING_DAYS: u32 = 7;

pub async fn recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<MoodEntry>>, AppError> {
    let user_id = require_user(&query.user_id)?;
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let data = state.data.lock().await;
    Ok(Json(recent_entries(&data, user_id, limit)))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<NewEntryRequest>,
) -> Result<(StatusCode, Json<MoodEntry>), AppError> {
    let entry = validate_entry(payload, Utc::now())?;

    let mut data = state.data.lock().await;
    data.entries.push(entry.clone());
    persist_data(&state.data_path, &data).await?;

    info!(user_id = %entry.user_id, mood = %entry.mood, "recorded mood entry {}", entry.id);
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn week(
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<WeekOverview>, AppError> {
    let user_id = require_user(&query.user_id)?;
    let reference = query.reference.unwrap_or_else(Utc::now);
    let window = window_for(WindowKind::Week, reference, &state.bucketing);
    let entries = state.entries_for(user_id, Some(window.start.with_timezone(&Utc))).await;

    debug!(user_id, entries = entries.len(), "building week overview");
    Ok(Json(week_overview(&entries, reference, &state.bucketing)))
}

pub async fn month(
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<MonthOverview>, AppError> {
    let user_id = require_user(&query.user_id)?;
    let reference = query.reference.unwrap_or_else(Utc::now);
    let window = window_for(WindowKind::Month, reference, &state.bucketing);
    let entries = state.entries_for(user_id, Some(window.start.with_timezone(&Utc))).await;

    debug!(user_id, entries = entries.len(), "building month overview");
    Ok(Json(month_overview(&entries, reference, &state.bucketing)))
}

pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<WindowSummary>, AppError> {
    let user_id = require_user(&query.user_id)?;
    let reference = query.reference.unwrap_or_else(Utc::now);
    let kind = match query.window {
        SummaryWindow::Day => WindowKind::Day,
        SummaryWindow::Week => WindowKind::Week,
        SummaryWindow::Month => WindowKind::Month,
        SummaryWindow::Year => WindowKind::Year,
        SummaryWindow::Trailing => {
            WindowKind::TrailingDays(trailing_days(query.days)?)
        }
    };
    let window = window_for(kind, reference, &state.bucketing);
    let entries = state.entries_for(user_id, Some(window.start.with_timezone(&Utc))).await;

    Ok(Json(WindowSummary::from(&summarize(&entries, &window))))
}

pub async fn chart(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartResponse>, AppError> {
    let user_id = require_user(&query.user_id)?;
    let reference = query.reference.unwrap_or_else(Utc::now);
    let (span, _) = chart_windows(query.period, reference, &state.bucketing);
    let entries = state.entries_for(user_id, Some(span.start.with_timezone(&Utc))).await;

    debug!(user_id, period = ?query.period, entries = entries.len(), "resampling chart");
    Ok(Json(build_chart(&entries, query.period, reference, &state.bucketing)))
}

fn trailing_days(days: Option<u32>) -> Result<u32, AppError> {
    match days {
        Some(days) if days > MAX_TRAILING_DAYS => Err(AppError::bad_request(format!(
            "days must be at most {MAX_TRAILING_DAYS}"
        ))),
        Some(days) => Ok(days),
        None => Ok(DEFAULT_TRAILING_DAYS),
    }
}

fn require_user(user_id: &str) -> Result<&str, AppError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::bad_request("user_id is required"));
    }
    Ok(user_id)
}

/// Checks a submission and turns it into a stored entry.
pub fn validate_entry(payload: NewEntryRequest, now: DateTime<Utc>) -> Result<MoodEntry, AppError> {
    let user_id = require_user(&payload.user_id)?.to_string();

    let mood = payload.mood.trim();
    if mood.is_empty() {
        return Err(AppError::bad_request("Please select a mood"));
    }

    let energy_level = u8::try_from(payload.energy_level)
        .ok()
        .filter(|level| *level <= 100)
        .ok_or_else(|| AppError::bad_request("energy_level must be between 0 and 100"))?;

    let mood_emoji = match payload.mood_emoji.as_deref().map(str::trim) {
        Some(emoji) if !emoji.is_empty() => emoji.to_string(),
        _ => default_emoji(mood)
            .ok_or_else(|| AppError::bad_request("mood_emoji is required for custom moods"))?
            .to_string(),
    };

    let notes = payload
        .notes
        .map(|notes| notes.trim().to_string())
        .filter(|notes| !notes.is_empty());
    if notes
        .as_ref()
        .is_some_and(|notes| notes.chars().count() > MAX_NOTES_CHARS)
    {
        return Err(AppError::bad_request(format!(
            "notes must be at most {MAX_NOTES_CHARS} characters"
        )));
    }

    Ok(MoodEntry {
        id: Uuid::new_v4().to_string(),
        mood: mood.to_string(),
        mood_emoji,
        energy_level,
        notes,
        created_at: payload.created_at.unwrap_or(now),
        user_id,
    })
}
