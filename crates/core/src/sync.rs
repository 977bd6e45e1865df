//! Wire types for the `/api/health/sync` endpoint.
//!
//! Workout entries are carried as raw JSON values so that one undecodable
//! workout can be skipped without rejecting the rest of the batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::records::{DailySteps, Workout};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub user_id: Option<String>,
    pub daily_steps: Option<DailyStepsPayload>,
    pub workouts: Option<Vec<serde_json::Value>>,
    pub timestamp: Option<String>,
}

/// Daily step totals as sent by the client. Timestamps stay raw strings here;
/// parsing happens in the sync engine so the failure surfaces as a
/// `ValidationError` rather than a body-rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStepsPayload {
    pub total_steps: i64,
    pub date: String,
    pub last_updated: String,
}

/// A single workout as sent by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPayload {
    pub id: String,
    pub workout_type: String,
    pub active_calories: f64,
    pub duration_minutes: f64,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub steps: Option<i64>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub average_heart_rate: Option<f64>,
    #[serde(default)]
    pub peak_heart_rate: Option<f64>,
    #[serde(default)]
    pub average_pace: Option<f64>,
}

/// Outcome of a sync: the upserted step record (if any), the workouts that
/// were persisted in input order, and the server-side completion time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncData {
    pub daily_steps: Option<DailySteps>,
    pub workouts: Vec<Workout>,
    pub timestamp: DateTime<Utc>,
}
