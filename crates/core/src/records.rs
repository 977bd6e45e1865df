use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One day of step totals for a user. Exactly one record exists per
/// (`user_id`, `date`) pair; `date` is the truncated calendar day that also
/// serves as the upsert match key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySteps {
    pub user_id: String,
    pub total_steps: i64,
    pub date: NaiveDate,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A single workout session. `workout_id` is supplied by the client and is
/// globally unique; re-syncing a known id overwrites the stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub user_id: String,
    pub workout_id: String,
    pub workout_type: String,
    pub active_calories: f64,
    pub duration_minutes: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub steps: Option<i64>,
    pub distance: Option<f64>,
    pub average_heart_rate: Option<f64>,
    pub peak_heart_rate: Option<f64>,
    pub average_pace: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Derived statistics for one user, recomputed from the store on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_workouts: i64,
    pub total_calories: i64,
    pub avg_steps_last_30_days: i64,
    pub last_workout: Option<Workout>,
}
