#![forbid(unsafe_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use healthsync_core::{DailySteps, Workout};

pub mod postgres;

pub use postgres::PostgresStorage;

pub const DEFAULT_STEPS_LIMIT: i64 = 30;
pub const DEFAULT_WORKOUTS_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(String),
    #[error("migration error: {0}")]
    Migration(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(error: sqlx::Error) -> Self {
        StorageError::Database(error.to_string())
    }
}

// ---------------------------------------------------------------------------
// Upsert and query argument types
// ---------------------------------------------------------------------------

/// One day of step totals to upsert, keyed on (`user_id`, `day`).
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStepsUpsert {
    pub user_id: String,
    pub day: NaiveDate,
    pub total_steps: i64,
    pub last_updated: DateTime<Utc>,
}

/// A workout to upsert, keyed on `workout_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutUpsert {
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
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepsQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub limit: i64,
}

impl Default for StepsQuery {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            limit: DEFAULT_STEPS_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutsQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub workout_type: Option<String>,
    pub limit: i64,
}

impl Default for WorkoutsQuery {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            workout_type: None,
            limit: DEFAULT_WORKOUTS_LIMIT,
        }
    }
}

/// Count and calorie sum over all of a user's workouts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorkoutTotals {
    pub count: i64,
    pub calories: f64,
}

// ---------------------------------------------------------------------------
// Domain-specific storage traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait StepsStorage: Send + Sync {
    /// Upserts one day of step totals. On conflict the existing record keeps
    /// its `created_at` and takes the new `total_steps` and `last_updated`.
    async fn upsert_daily_steps(
        &self,
        upsert: &DailyStepsUpsert,
    ) -> Result<DailySteps, StorageError>;
    /// Step history sorted by date descending, capped to `query.limit`.
    async fn get_daily_steps(
        &self,
        user_id: &str,
        query: &StepsQuery,
    ) -> Result<Vec<DailySteps>, StorageError>;
    /// Mean of `total_steps` over records with `date >= since`, or `None`
    /// when the user has no records in range.
    async fn average_steps_since(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Option<f64>, StorageError>;
}

#[async_trait]
pub trait WorkoutStorage: Send + Sync {
    /// Upserts a workout; a known `workout_id` has all its fields overwritten
    /// except `created_at`.
    async fn upsert_workout(&self, upsert: &WorkoutUpsert) -> Result<Workout, StorageError>;
    /// Workout history sorted by `start_time` descending, capped to `query.limit`.
    async fn get_workouts(
        &self,
        user_id: &str,
        query: &WorkoutsQuery,
    ) -> Result<Vec<Workout>, StorageError>;
    async fn workout_totals(&self, user_id: &str) -> Result<WorkoutTotals, StorageError>;
    /// The workout with the latest `start_time`, or `None` if the user has none.
    async fn latest_workout(&self, user_id: &str) -> Result<Option<Workout>, StorageError>;
}

/// Unified supertrait for code that needs access to all storage domains.
pub trait Storage: StepsStorage + WorkoutStorage {}

impl<T> Storage for T where T: StepsStorage + WorkoutStorage {}

// ---------------------------------------------------------------------------
// Migration helpers
// ---------------------------------------------------------------------------

pub async fn migrate_with_pool(pool: &sqlx::PgPool) -> Result<(), StorageError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|error| StorageError::Migration(error.to_string()))?;
    Ok(())
}
