//! The data-synchronization endpoint.
//!
//! A sync carries at most one day of step totals plus a batch of workouts.
//! The step upsert is all-or-nothing for the request; workout upserts are
//! isolated from each other, so one bad workout is logged and skipped while
//! the rest of the batch still lands.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use healthsync_core::sync::{DailyStepsPayload, SyncData, SyncRequest, WorkoutPayload};
use healthsync_core::time::{day_key, parse_timestamp};
use healthsync_core::validation::require_user_id;
use healthsync_core::{DailySteps, ValidationError, Workout};
use healthsync_storage::{DailyStepsUpsert, Storage, StorageError, WorkoutUpsert};

use crate::error::ApiError;
use crate::response::ApiSuccess;
use crate::ApiState;

/// Per-workout failure. Never escalates past the workout it belongs to.
#[derive(Debug, thiserror::Error)]
enum WorkoutSyncError {
    #[error("undecodable workout: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StorageError),
}

pub(crate) async fn sync(
    State(state): State<ApiState>,
    Json(request): Json<SyncRequest>,
) -> Result<ApiSuccess<SyncData>, ApiError> {
    let data = sync_health_data(state.storage(), request).await?;
    Ok(ApiSuccess::data(data).with_message("Health data synced successfully"))
}

async fn sync_health_data(
    storage: &dyn Storage,
    request: SyncRequest,
) -> Result<SyncData, ApiError> {
    let user_id = require_user_id(request.user_id.as_deref())?;

    let daily_steps = match request.daily_steps {
        Some(payload) => Some(upsert_daily_steps(storage, user_id, payload).await?),
        None => None,
    };

    let mut workouts = Vec::new();
    for (index, raw) in request.workouts.unwrap_or_default().into_iter().enumerate() {
        match upsert_workout(storage, user_id, raw).await {
            Ok(workout) => workouts.push(workout),
            Err(error) => {
                tracing::warn!(user_id, index, %error, "skipping workout that failed to sync");
            }
        }
    }

    Ok(SyncData {
        daily_steps,
        workouts,
        timestamp: Utc::now(),
    })
}

async fn upsert_daily_steps(
    storage: &dyn Storage,
    user_id: &str,
    payload: DailyStepsPayload,
) -> Result<DailySteps, ApiError> {
    let date = parse_timestamp(&payload.date)?;
    let last_updated = parse_timestamp(&payload.last_updated)?;
    let upsert = DailyStepsUpsert {
        user_id: user_id.to_owned(),
        day: day_key(date),
        total_steps: payload.total_steps,
        last_updated,
    };
    storage
        .upsert_daily_steps(&upsert)
        .await
        .map_err(|error| ApiError::storage("Failed to sync health data", error))
}

async fn upsert_workout(
    storage: &dyn Storage,
    user_id: &str,
    raw: serde_json::Value,
) -> Result<Workout, WorkoutSyncError> {
    let payload: WorkoutPayload = serde_json::from_value(raw)?;
    let start_time = parse_timestamp(&payload.start_time)?;
    let end_time = parse_timestamp(&payload.end_time)?;
    let upsert = WorkoutUpsert {
        user_id: user_id.to_owned(),
        workout_id: payload.id,
        workout_type: payload.workout_type,
        active_calories: payload.active_calories,
        duration_minutes: payload.duration_minutes,
        start_time,
        end_time,
        steps: payload.steps,
        distance: payload.distance,
        average_heart_rate: payload.average_heart_rate,
        peak_heart_rate: payload.peak_heart_rate,
        average_pace: payload.average_pace,
    };
    Ok(storage.upsert_workout(&upsert).await?)
}
