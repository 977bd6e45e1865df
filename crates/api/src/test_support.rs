//! In-memory storage stub backing the API tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, NaiveDate, Utc};
use healthsync_core::{DailySteps, Workout};
use healthsync_storage::{
    DailyStepsUpsert, StepsQuery, StepsStorage, StorageError, WorkoutStorage, WorkoutTotals,
    WorkoutUpsert, WorkoutsQuery,
};

#[derive(Default)]
pub(crate) struct MemoryStorage {
    pub steps: Mutex<HashMap<(String, NaiveDate), DailySteps>>,
    pub workouts: Mutex<HashMap<String, Workout>>,
    /// Workout ids whose upsert fails with a database error.
    pub fail_workout_ids: HashSet<String>,
    /// When set, every daily-steps upsert fails.
    pub fail_steps: bool,
}

impl MemoryStorage {
    pub(crate) fn failing_workouts(ids: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            fail_workout_ids: ids.into_iter().map(ToOwned::to_owned).collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl StepsStorage for MemoryStorage {
    async fn upsert_daily_steps(
        &self,
        upsert: &DailyStepsUpsert,
    ) -> Result<DailySteps, StorageError> {
        if self.fail_steps {
            return Err(StorageError::Database("injected steps failure".to_owned()));
        }
        let mut steps = self.steps.lock().expect("steps lock");
        let key = (upsert.user_id.clone(), upsert.day);
        let created_at = steps
            .get(&key)
            .map_or_else(Utc::now, |existing| existing.created_at);
        let record = DailySteps {
            user_id: upsert.user_id.clone(),
            total_steps: upsert.total_steps,
            date: upsert.day,
            last_updated: upsert.last_updated,
            created_at,
        };
        steps.insert(key, record.clone());
        Ok(record)
    }

    async fn get_daily_steps(
        &self,
        user_id: &str,
        query: &StepsQuery,
    ) -> Result<Vec<DailySteps>, StorageError> {
        let steps = self.steps.lock().expect("steps lock");
        let mut records: Vec<DailySteps> = steps
            .values()
            .filter(|record| record.user_id == user_id)
            .filter(|record| query.start.is_none_or(|start| record.date >= start))
            .filter(|record| query.end.is_none_or(|end| record.date <= end))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records.truncate(usize::try_from(query.limit).unwrap_or(usize::MAX));
        Ok(records)
    }

    async fn average_steps_since(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Option<f64>, StorageError> {
        let steps = self.steps.lock().expect("steps lock");
        let totals: Vec<i64> = steps
            .values()
            .filter(|record| record.user_id == user_id && record.date >= since)
            .map(|record| record.total_steps)
            .collect();
        if totals.is_empty() {
            return Ok(None);
        }
        let sum: i64 = totals.iter().sum();
        Ok(Some(sum as f64 / totals.len() as f64))
    }
}

#[async_trait]
impl WorkoutStorage for MemoryStorage {
    async fn upsert_workout(&self, upsert: &WorkoutUpsert) -> Result<Workout, StorageError> {
        if self.fail_workout_ids.contains(&upsert.workout_id) {
            return Err(StorageError::Database(
                "injected workout failure".to_owned(),
            ));
        }
        let mut workouts = self.workouts.lock().expect("workouts lock");
        let created_at = workouts
            .get(&upsert.workout_id)
            .map_or_else(Utc::now, |existing| existing.created_at);
        let record = Workout {
            user_id: upsert.user_id.clone(),
            workout_id: upsert.workout_id.clone(),
            workout_type: upsert.workout_type.clone(),
            active_calories: upsert.active_calories,
            duration_minutes: upsert.duration_minutes,
            start_time: upsert.start_time,
            end_time: upsert.end_time,
            steps: upsert.steps,
            distance: upsert.distance,
            average_heart_rate: upsert.average_heart_rate,
            peak_heart_rate: upsert.peak_heart_rate,
            average_pace: upsert.average_pace,
            created_at,
        };
        workouts.insert(upsert.workout_id.clone(), record.clone());
        Ok(record)
    }

    async fn get_workouts(
        &self,
        user_id: &str,
        query: &WorkoutsQuery,
    ) -> Result<Vec<Workout>, StorageError> {
        let workouts = self.workouts.lock().expect("workouts lock");
        let mut records: Vec<Workout> = workouts
            .values()
            .filter(|record| record.user_id == user_id)
            .filter(|record| query.start.is_none_or(|start| record.start_time >= start))
            .filter(|record| query.end.is_none_or(|end| record.start_time <= end))
            .filter(|record| {
                query
                    .workout_type
                    .as_deref()
                    .is_none_or(|kind| record.workout_type == kind)
            })
            .cloned()
            .collect();
        records.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        records.truncate(usize::try_from(query.limit).unwrap_or(usize::MAX));
        Ok(records)
    }

    async fn workout_totals(&self, user_id: &str) -> Result<WorkoutTotals, StorageError> {
        let workouts = self.workouts.lock().expect("workouts lock");
        let mut totals = WorkoutTotals::default();
        for record in workouts.values().filter(|r| r.user_id == user_id) {
            totals.count += 1;
            totals.calories += record.active_calories;
        }
        Ok(totals)
    }

    async fn latest_workout(&self, user_id: &str) -> Result<Option<Workout>, StorageError> {
        let workouts = self.workouts.lock().expect("workouts lock");
        Ok(workouts
            .values()
            .filter(|record| record.user_id == user_id)
            .max_by_key(|record| record.start_time)
            .cloned())
    }
}

pub(crate) async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(crate) fn workout_upsert(user_id: &str, workout_id: &str, start: DateTime<Utc>) -> WorkoutUpsert {
    WorkoutUpsert {
        user_id: user_id.to_owned(),
        workout_id: workout_id.to_owned(),
        workout_type: "running".to_owned(),
        active_calories: 300.0,
        duration_minutes: 30.0,
        start_time: start,
        end_time: start + chrono::Duration::minutes(30),
        steps: None,
        distance: None,
        average_heart_rate: None,
        peak_heart_rate: None,
        average_pace: None,
    }
}
