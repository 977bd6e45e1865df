//! Read-only history and statistics endpoints. Absence of data is an empty
//! list or null field, never an error.

use axum::extract::{Path, Query, State};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use healthsync_core::time::{day_key, parse_timestamp};
use healthsync_core::validation::parse_limit;
use healthsync_core::{DailySteps, Stats, ValidationError, Workout};
use healthsync_storage::{
    StepsQuery, WorkoutsQuery, DEFAULT_STEPS_LIMIT, DEFAULT_WORKOUTS_LIMIT,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::response::ApiSuccess;
use crate::ApiState;

const STATS_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryParams {
    start_date: Option<String>,
    end_date: Option<String>,
    /// Kept as a raw string so non-numeric input maps to our 400 envelope
    /// instead of axum's extractor rejection.
    limit: Option<String>,
    workout_type: Option<String>,
}

pub(crate) async fn steps(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<ApiSuccess<Vec<DailySteps>>, ApiError> {
    let query = StepsQuery {
        start: parse_day(params.start_date.as_deref())?,
        end: parse_day(params.end_date.as_deref())?,
        limit: parse_limit(params.limit.as_deref(), DEFAULT_STEPS_LIMIT)?,
    };
    let records = state
        .storage()
        .get_daily_steps(&user_id, &query)
        .await
        .map_err(|error| ApiError::storage("Failed to fetch steps data", error))?;
    Ok(ApiSuccess::list(records))
}

pub(crate) async fn workouts(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<ApiSuccess<Vec<Workout>>, ApiError> {
    let query = WorkoutsQuery {
        start: parse_instant(params.start_date.as_deref())?,
        end: parse_instant(params.end_date.as_deref())?,
        workout_type: params.workout_type.filter(|kind| !kind.is_empty()),
        limit: parse_limit(params.limit.as_deref(), DEFAULT_WORKOUTS_LIMIT)?,
    };
    let records = state
        .storage()
        .get_workouts(&user_id, &query)
        .await
        .map_err(|error| ApiError::storage("Failed to fetch workouts", error))?;
    Ok(ApiSuccess::list(records))
}

pub(crate) async fn stats(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<Stats>, ApiError> {
    let storage = state.storage();
    let failure = |error| ApiError::storage("Failed to fetch statistics", error);

    let totals = storage.workout_totals(&user_id).await.map_err(failure)?;
    let since = Utc::now().date_naive() - Duration::days(STATS_WINDOW_DAYS);
    let average = storage
        .average_steps_since(&user_id, since)
        .await
        .map_err(failure)?;
    let last_workout = storage.latest_workout(&user_id).await.map_err(failure)?;

    Ok(ApiSuccess::data(Stats {
        total_workouts: totals.count,
        total_calories: totals.calories.round() as i64,
        avg_steps_last_30_days: average.map_or(0, |avg| avg.round() as i64),
        last_workout,
    }))
}

fn parse_day(raw: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    raw.map(|value| parse_timestamp(value).map(day_key))
        .transpose()
}

fn parse_instant(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ValidationError> {
    raw.map(parse_timestamp).transpose()
}
