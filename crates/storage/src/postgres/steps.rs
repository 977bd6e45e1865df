use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use healthsync_core::DailySteps;

use super::PostgresStorage;
use crate::{DailyStepsUpsert, StepsQuery, StepsStorage, StorageError};

const UPSERT_QUERY: &str = r#"
    INSERT INTO daily_steps (user_id, date, total_steps, last_updated)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (user_id, date)
    DO UPDATE SET
        total_steps = EXCLUDED.total_steps,
        last_updated = EXCLUDED.last_updated
    RETURNING user_id, date, total_steps, last_updated, created_at
"#;

const HISTORY_QUERY: &str = r#"
    SELECT user_id, date, total_steps, last_updated, created_at
    FROM daily_steps
    WHERE user_id = $1
      AND ($2::date IS NULL OR date >= $2)
      AND ($3::date IS NULL OR date <= $3)
    ORDER BY date DESC
    LIMIT $4
"#;

const AVERAGE_QUERY: &str = r#"
    SELECT AVG(total_steps)::float8
    FROM daily_steps
    WHERE user_id = $1 AND date >= $2
"#;

#[derive(sqlx::FromRow)]
struct DailyStepsRow {
    user_id: String,
    date: NaiveDate,
    total_steps: i64,
    last_updated: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<DailyStepsRow> for DailySteps {
    fn from(row: DailyStepsRow) -> Self {
        DailySteps {
            user_id: row.user_id,
            total_steps: row.total_steps,
            date: row.date,
            last_updated: row.last_updated,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl StepsStorage for PostgresStorage {
    async fn upsert_daily_steps(
        &self,
        upsert: &DailyStepsUpsert,
    ) -> Result<DailySteps, StorageError> {
        let row = sqlx::query_as::<_, DailyStepsRow>(UPSERT_QUERY)
            .bind(&upsert.user_id)
            .bind(upsert.day)
            .bind(upsert.total_steps)
            .bind(upsert.last_updated)
            .fetch_one(self.pool())
            .await?;
        Ok(row.into())
    }

    async fn get_daily_steps(
        &self,
        user_id: &str,
        query: &StepsQuery,
    ) -> Result<Vec<DailySteps>, StorageError> {
        let rows = sqlx::query_as::<_, DailyStepsRow>(HISTORY_QUERY)
            .bind(user_id)
            .bind(query.start)
            .bind(query.end)
            .bind(query.limit)
            .fetch_all(self.pool())
            .await?;
        Ok(rows.into_iter().map(DailySteps::from).collect())
    }

    async fn average_steps_since(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Option<f64>, StorageError> {
        let average = sqlx::query_scalar::<_, Option<f64>>(AVERAGE_QUERY)
            .bind(user_id)
            .bind(since)
            .fetch_one(self.pool())
            .await?;
        Ok(average)
    }
}
