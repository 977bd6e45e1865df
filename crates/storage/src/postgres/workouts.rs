use async_trait::async_trait;
use chrono::{DateTime, Utc};
use healthsync_core::Workout;

use super::PostgresStorage;
use crate::{StorageError, WorkoutStorage, WorkoutTotals, WorkoutUpsert, WorkoutsQuery};

const UPSERT_QUERY: &str = r#"
    INSERT INTO workouts (
        user_id, workout_id, workout_type, active_calories, duration_minutes,
        start_time, end_time, steps, distance, average_heart_rate,
        peak_heart_rate, average_pace
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
    ON CONFLICT (workout_id)
    DO UPDATE SET
        user_id = EXCLUDED.user_id,
        workout_type = EXCLUDED.workout_type,
        active_calories = EXCLUDED.active_calories,
        duration_minutes = EXCLUDED.duration_minutes,
        start_time = EXCLUDED.start_time,
        end_time = EXCLUDED.end_time,
        steps = EXCLUDED.steps,
        distance = EXCLUDED.distance,
        average_heart_rate = EXCLUDED.average_heart_rate,
        peak_heart_rate = EXCLUDED.peak_heart_rate,
        average_pace = EXCLUDED.average_pace
    RETURNING user_id, workout_id, workout_type, active_calories, duration_minutes,
        start_time, end_time, steps, distance, average_heart_rate,
        peak_heart_rate, average_pace, created_at
"#;

const HISTORY_QUERY: &str = r#"
    SELECT user_id, workout_id, workout_type, active_calories, duration_minutes,
        start_time, end_time, steps, distance, average_heart_rate,
        peak_heart_rate, average_pace, created_at
    FROM workouts
    WHERE user_id = $1
      AND ($2::timestamptz IS NULL OR start_time >= $2)
      AND ($3::timestamptz IS NULL OR start_time <= $3)
      AND ($4::text IS NULL OR workout_type = $4)
    ORDER BY start_time DESC
    LIMIT $5
"#;

const TOTALS_QUERY: &str = r#"
    SELECT COUNT(*), COALESCE(SUM(active_calories), 0)::float8
    FROM workouts
    WHERE user_id = $1
"#;

const LATEST_QUERY: &str = r#"
    SELECT user_id, workout_id, workout_type, active_calories, duration_minutes,
        start_time, end_time, steps, distance, average_heart_rate,
        peak_heart_rate, average_pace, created_at
    FROM workouts
    WHERE user_id = $1
    ORDER BY start_time DESC
    LIMIT 1
"#;

#[derive(sqlx::FromRow)]
struct WorkoutRow {
    user_id: String,
    workout_id: String,
    workout_type: String,
    active_calories: f64,
    duration_minutes: f64,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    steps: Option<i64>,
    distance: Option<f64>,
    average_heart_rate: Option<f64>,
    peak_heart_rate: Option<f64>,
    average_pace: Option<f64>,
    created_at: DateTime<Utc>,
}

impl From<WorkoutRow> for Workout {
    fn from(row: WorkoutRow) -> Self {
        Workout {
            user_id: row.user_id,
            workout_id: row.workout_id,
            workout_type: row.workout_type,
            active_calories: row.active_calories,
            duration_minutes: row.duration_minutes,
            start_time: row.start_time,
            end_time: row.end_time,
            steps: row.steps,
            distance: row.distance,
            average_heart_rate: row.average_heart_rate,
            peak_heart_rate: row.peak_heart_rate,
            average_pace: row.average_pace,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl WorkoutStorage for PostgresStorage {
    async fn upsert_workout(&self, upsert: &WorkoutUpsert) -> Result<Workout, StorageError> {
        let row = sqlx::query_as::<_, WorkoutRow>(UPSERT_QUERY)
            .bind(&upsert.user_id)
            .bind(&upsert.workout_id)
            .bind(&upsert.workout_type)
            .bind(upsert.active_calories)
            .bind(upsert.duration_minutes)
            .bind(upsert.start_time)
            .bind(upsert.end_time)
            .bind(upsert.steps)
            .bind(upsert.distance)
            .bind(upsert.average_heart_rate)
            .bind(upsert.peak_heart_rate)
            .bind(upsert.average_pace)
            .fetch_one(self.pool())
            .await?;
        Ok(row.into())
    }

    async fn get_workouts(
        &self,
        user_id: &str,
        query: &WorkoutsQuery,
    ) -> Result<Vec<Workout>, StorageError> {
        let rows = sqlx::query_as::<_, WorkoutRow>(HISTORY_QUERY)
            .bind(user_id)
            .bind(query.start)
            .bind(query.end)
            .bind(query.workout_type.as_deref())
            .bind(query.limit)
            .fetch_all(self.pool())
            .await?;
        Ok(rows.into_iter().map(Workout::from).collect())
    }

    async fn workout_totals(&self, user_id: &str) -> Result<WorkoutTotals, StorageError> {
        let (count, calories) = sqlx::query_as::<_, (i64, f64)>(TOTALS_QUERY)
            .bind(user_id)
            .fetch_one(self.pool())
            .await?;
        Ok(WorkoutTotals { count, calories })
    }

    async fn latest_workout(&self, user_id: &str) -> Result<Option<Workout>, StorageError> {
        let row = sqlx::query_as::<_, WorkoutRow>(LATEST_QUERY)
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(Workout::from))
    }
}
