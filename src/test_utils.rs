//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Log store setup/teardown and seeding
//! - Mock data factories
//! - A scripted text generator

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db::AppState;
use crate::llm::{GenerationError, GeneratorSlot, TextGenerator};
use crate::models::{OnboardingProfile, PhysicalStats, PreviousRoutineReference, Timestamp};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Insert one session log with a JSON array of logged exercises
pub async fn seed_workout_log(
  pool: &SqlitePool,
  user_id: &str,
  routine_id: &str,
  logged_at: DateTime<Utc>,
  exercises: Value,
) -> i64 {
  seed_raw_workout_log(pool, user_id, routine_id, logged_at, &exercises.to_string()).await
}

/// Insert one session log with arbitrary exercise text, valid JSON or not
pub async fn seed_raw_workout_log(
  pool: &SqlitePool,
  user_id: &str,
  routine_id: &str,
  logged_at: DateTime<Utc>,
  exercises_json: &str,
) -> i64 {
  let result = sqlx::query(
    r#"
    INSERT INTO workout_logs (user_id, routine_id, day_key, logged_at, exercises_json)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
  )
  .bind(user_id)
  .bind(routine_id)
  .bind(logged_at.format("%A").to_string().to_lowercase())
  .bind(logged_at)
  .bind(exercises_json)
  .execute(pool)
  .await
  .expect("Failed to insert test workout log");

  result.last_insert_rowid()
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Previous routine reference with an id and optional expiry
pub fn mock_previous_routine(id: &str, expiry: Option<DateTime<Utc>>) -> PreviousRoutineReference {
  PreviousRoutineReference {
    id: Some(id.to_string()),
    name: Some("Previous Plan".to_string()),
    duration_in_weeks: Some(4.0),
    generated_at: None,
    expires_at: expiry.map(|e| Timestamp::Text(e.to_rfc3339())),
  }
}

/// Intermediate lifter training three fixed days
pub fn mock_onboarding_profile() -> OnboardingProfile {
  OnboardingProfile {
    goal: Some("Build muscle".to_string()),
    gender: Some("female".to_string()),
    experience: Some("intermediate".to_string()),
    frequency: Some("3-4".to_string()),
    workout_days: Some(vec![
      "monday".to_string(),
      "wednesday".to_string(),
      "friday".to_string(),
    ]),
    equipment: Some(vec!["dumbbells".to_string(), "bench".to_string()]),
    focus_areas: Some(vec!["glutes".to_string()]),
    physical_stats: Some(PhysicalStats {
      age: Some(29.0),
      weight_kg: Some(64.0),
      height_m: Some(1.68),
      target_weight_kg: None,
    }),
    session_duration: Some("45-60".to_string()),
  }
}

/// Request payload as a caller would send it
pub fn mock_request_payload() -> Value {
  json!({
    "onboardingData": mock_onboarding_profile(),
  })
}

/// Well-formed provider reply covering the three mock profile days
pub fn mock_routine_json() -> Value {
  let exercise = |name: &str| {
    json!({
      "name": name,
      "sets": 3,
      "reps": "8-12",
      "weightSuggestionKg": "Moderate",
      "restBetweenSetsSeconds": 90,
      "description": "1. Set up.\n2. Move with control.\n3. Return.",
      "usesWeight": true,
      "isTimed": false
    })
  };

  json!({
    "name": "Three Day Builder",
    "durationInWeeks": 6,
    "dailyWorkouts": {
      "monday": [exercise("Dumbbell Bench Press"), exercise("Goblet Squat")],
      "tuesday": [],
      "wednesday": [exercise("One-Arm Row"), exercise("Hip Thrust")],
      "thursday": [],
      "friday": [exercise("Romanian Deadlift")],
      "saturday": [],
      "sunday": []
    }
  })
}

/// ---------------------------------------------------------------------------
/// Stub Generator
/// ---------------------------------------------------------------------------

/// Text generator returning a scripted result and recording prompts
pub struct StubGenerator {
  response: Result<String, GenerationError>,
  prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
  pub fn replying(text: impl Into<String>) -> Arc<Self> {
    Arc::new(Self {
      response: Ok(text.into()),
      prompts: Mutex::new(Vec::new()),
    })
  }

  pub fn failing(error: GenerationError) -> Arc<Self> {
    Arc::new(Self {
      response: Err(error),
      prompts: Mutex::new(Vec::new()),
    })
  }

  pub fn prompts(&self) -> Vec<String> {
    self.prompts.lock().expect("prompt log poisoned").clone()
  }
}

#[async_trait]
impl TextGenerator for StubGenerator {
  async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
    self
      .prompts
      .lock()
      .expect("prompt log poisoned")
      .push(prompt.to_string());
    self.response.clone()
  }
}

/// App state over a fresh log store with a pre-installed generator
pub async fn test_state(generator: Arc<dyn TextGenerator>) -> AppState {
  crate::logging::init_test();
  AppState {
    db: setup_test_db().await,
    config: Config {
      api_key: Some("test-key".to_string()),
      ..Config::default()
    },
    generator: GeneratorSlot::with_generator(generator),
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Create a DateTime N days ago from now
pub fn datetime_days_ago(days: i64) -> DateTime<Utc> {
  Utc::now() - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> =
      sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = 'workout_logs'")
        .fetch_all(&pool)
        .await
        .expect("Failed to query tables");

    assert_eq!(tables.len(), 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_workout_log_round_trips() {
    let pool = setup_test_db().await;

    let id = seed_workout_log(
      &pool,
      "user-1",
      "routine-a",
      datetime_days_ago(1),
      json!([{ "name": "Squat", "repsPerformed": 5, "completed": true }]),
    )
    .await;
    assert!(id > 0);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workout_logs WHERE user_id = 'user-1'")
      .fetch_one(&pool)
      .await
      .expect("Failed to count logs");
    assert_eq!(count, 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_stub_generator_records_prompts() {
    let stub = StubGenerator::replying("{}");
    assert_eq!(stub.generate("first").await.unwrap(), "{}");
    assert_eq!(stub.prompts(), vec!["first".to_string()]);

    let failing = StubGenerator::failing(GenerationError::Empty);
    assert_eq!(failing.generate("x").await.unwrap_err(), GenerationError::Empty);
  }

  #[test]
  fn test_datetime_helpers_produce_correct_dates() {
    let diff = Utc::now() - datetime_days_ago(7);
    assert!(
      diff.num_days() >= 6 && diff.num_days() <= 8,
      "Expected ~7 days difference, got {}",
      diff.num_days()
    );
  }

  #[test]
  fn test_mock_profile_serializes_with_wire_names() {
    let payload = mock_request_payload();
    assert_eq!(payload["onboardingData"]["workout_days"][0], "monday");
    assert_eq!(payload["onboardingData"]["physical_stats"]["weight_kg"], 64.0);
  }
}
