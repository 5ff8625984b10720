//! Performance aggregation over historical workout logs
//!
//! Given the user's previous routine, pulls the most recent logged sessions
//! and reduces them into per-exercise statistics the prompt can use for
//! progression. Read-only and recomputed per request; a failing log query
//! degrades to an empty summary rather than failing the request.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::models::{LoggedExercise, PreviousRoutineReference, WorkoutLog};

/// Window of logs considered, ending at the previous routine's expiry
pub const LOOKBACK_DAYS: i64 = 14;
/// Maximum number of session logs read per request
pub const MAX_LOG_RECORDS: i64 = 30;

/// ---------------------------------------------------------------------------
/// Summary Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceSummary {
  /// Keyed by exercise id, or exercise name when no id was logged
  pub exercises: BTreeMap<String, ExercisePerformance>,
}

impl PerformanceSummary {
  pub fn is_empty(&self) -> bool {
    self.exercises.is_empty()
  }

  pub fn len(&self) -> usize {
    self.exercises.len()
  }

  pub fn get(&self, key: &str) -> Option<&ExercisePerformance> {
    self.exercises.get(key)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePerformance {
  pub exercise_name: String,
  /// Mean of performed reps, one decimal place
  pub average_reps: Option<f64>,
  pub max_weight_lifted_kg: Option<f64>,
  /// completed / sessions * 100, whole percent
  pub completion_rate_pct: Option<u32>,
  pub target_reps: Option<String>,
  pub target_weight: Option<String>,
  pub performed_reps: Vec<i64>,
  pub performed_weights_kg: Vec<f64>,
  pub sessions: u32,
  pub completed: u32,
}

#[derive(Debug, Default)]
struct Accumulator {
  name: String,
  reps: Vec<i64>,
  weights: Vec<f64>,
  sessions: u32,
  completed: u32,
  target_reps: Option<String>,
  target_weight: Option<String>,
}

impl Accumulator {
  fn push(&mut self, logged: &LoggedExercise) {
    if self.name.is_empty() {
      self.name = logged.name.trim().to_string();
    }
    // Logs arrive newest first, so the first target seen is the latest one
    if self.target_reps.is_none() {
      self.target_reps = non_blank(logged.target_reps.as_deref());
    }
    if self.target_weight.is_none() {
      self.target_weight = non_blank(logged.target_weight.as_deref());
    }

    if let Some(reps) = logged.reps_performed.as_ref().and_then(parse_reps) {
      self.reps.push(reps);
    }
    if let Some(weight) = logged.weight_used.as_ref().and_then(parse_weight) {
      self.weights.push(weight);
    }

    self.sessions += 1;
    if logged.completed {
      self.completed += 1;
    }
  }

  fn finish(self, key: &str) -> ExercisePerformance {
    let average_reps = if self.reps.is_empty() {
      None
    } else {
      let mean = self.reps.iter().sum::<i64>() as f64 / self.reps.len() as f64;
      Some((mean * 10.0).round() / 10.0)
    };

    let max_weight_lifted_kg = self.weights.iter().copied().reduce(f64::max);

    let completion_rate_pct = (self.sessions > 0)
      .then(|| ((self.completed as f64 / self.sessions as f64) * 100.0).round() as u32);

    ExercisePerformance {
      exercise_name: if self.name.is_empty() {
        key.to_string()
      } else {
        self.name
      },
      average_reps,
      max_weight_lifted_kg,
      completion_rate_pct,
      target_reps: self.target_reps,
      target_weight: self.target_weight,
      performed_reps: self.reps,
      performed_weights_kg: self.weights,
      sessions: self.sessions,
      completed: self.completed,
    }
  }
}

fn non_blank(value: Option<&str>) -> Option<String> {
  value
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(str::to_string)
}

/// ---------------------------------------------------------------------------
/// Loose Value Parsing
/// ---------------------------------------------------------------------------

/// Leading numeric prefix of a string ("10 reps" -> "10", "42.5kg" -> "42.5")
fn numeric_prefix(text: &str, allow_fraction: bool) -> &str {
  let text = text.trim();
  let mut end = 0;
  let mut seen_dot = false;
  for (i, c) in text.char_indices() {
    let ok = c.is_ascii_digit()
      || (i == 0 && (c == '-' || c == '+'))
      || (allow_fraction && c == '.' && !seen_dot);
    if !ok {
      break;
    }
    if c == '.' {
      seen_dot = true;
    }
    end = i + c.len_utf8();
  }
  &text[..end]
}

/// Performed reps as an integer; non-numeric entries are discarded
pub fn parse_reps(value: &Value) -> Option<i64> {
  let reps = match value {
    Value::Number(n) => n
      .as_i64()
      .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
    Value::String(s) => numeric_prefix(s, false).parse::<i64>().ok(),
    _ => None,
  }?;
  (reps >= 0).then_some(reps)
}

/// Performed weight in kg; non-positive, "N/A" and "bodyweight" are discarded
pub fn parse_weight(value: &Value) -> Option<f64> {
  let weight = match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => {
      let lowered = s.trim().to_lowercase();
      if lowered == "n/a" || lowered == "bodyweight" {
        return None;
      }
      numeric_prefix(&lowered, true).parse::<f64>().ok()
    }
    _ => None,
  }?;
  (weight.is_finite() && weight > 0.0).then_some(weight)
}

/// ---------------------------------------------------------------------------
/// Reduction
/// ---------------------------------------------------------------------------

/// Reduce logged exercise occurrences (newest first) into a summary
pub fn summarize_exercises<'a, I>(occurrences: I) -> PerformanceSummary
where
  I: IntoIterator<Item = &'a LoggedExercise>,
{
  let mut accumulators: BTreeMap<String, Accumulator> = BTreeMap::new();

  for logged in occurrences {
    let Some(key) = logged.key() else {
      continue;
    };
    accumulators.entry(key).or_default().push(logged);
  }

  PerformanceSummary {
    exercises: accumulators
      .into_iter()
      .map(|(key, acc)| {
        let perf = acc.finish(&key);
        (key, perf)
      })
      .collect(),
  }
}

/// Reduce session logs; sessions with unreadable exercise payloads are skipped
pub fn summarize_logs(logs: &[WorkoutLog]) -> PerformanceSummary {
  let mut occurrences = Vec::new();
  for log in logs {
    match log.exercises() {
      Ok(exercises) => occurrences.extend(exercises),
      Err(e) => warn!(log_id = log.id, error = %e, "Skipping workout log with unreadable exercises"),
    }
  }
  summarize_exercises(&occurrences)
}

/// ---------------------------------------------------------------------------
/// Log Store Access
/// ---------------------------------------------------------------------------

/// Fetch the newest session logs for a routine, optionally within the
/// lookback window ending at the routine's expiry
pub async fn fetch_logs(
  pool: &SqlitePool,
  user_id: &str,
  routine_id: &str,
  expiry: Option<DateTime<Utc>>,
) -> Result<Vec<WorkoutLog>, sqlx::Error> {
  match expiry {
    Some(end) => {
      let start = end - Duration::days(LOOKBACK_DAYS);
      sqlx::query_as::<_, WorkoutLog>(
        r#"
        SELECT id, user_id, routine_id, day_key, logged_at, exercises_json, created_at
        FROM workout_logs
        WHERE user_id = ?1 AND routine_id = ?2
          AND logged_at >= ?3 AND logged_at <= ?4
        ORDER BY logged_at DESC
        LIMIT ?5
        "#,
      )
      .bind(user_id)
      .bind(routine_id)
      .bind(start)
      .bind(end)
      .bind(MAX_LOG_RECORDS)
      .fetch_all(pool)
      .await
    }
    None => {
      sqlx::query_as::<_, WorkoutLog>(
        r#"
        SELECT id, user_id, routine_id, day_key, logged_at, exercises_json, created_at
        FROM workout_logs
        WHERE user_id = ?1 AND routine_id = ?2
        ORDER BY logged_at DESC
        LIMIT ?3
        "#,
      )
      .bind(user_id)
      .bind(routine_id)
      .bind(MAX_LOG_RECORDS)
      .fetch_all(pool)
      .await
    }
  }
}

/// Build the performance summary for the user's previous routine
///
/// Never fails: no previous routine id means no query, and a query error is
/// logged and treated as "no history".
pub async fn aggregate(
  pool: &SqlitePool,
  user_id: &str,
  previous: Option<&PreviousRoutineReference>,
) -> PerformanceSummary {
  let Some(previous) = previous else {
    return PerformanceSummary::default();
  };
  let Some(routine_id) = previous.routine_id() else {
    debug!(user_id, "Previous routine has no id; skipping performance lookup");
    return PerformanceSummary::default();
  };

  match fetch_logs(pool, user_id, routine_id, previous.expiry()).await {
    Ok(logs) => {
      let summary = summarize_logs(&logs);
      info!(
        user_id,
        routine_id,
        sessions = logs.len(),
        exercises = summary.len(),
        "Aggregated previous performance"
      );
      summary
    }
    Err(e) => {
      warn!(user_id, routine_id, error = %e, "Failed to fetch workout logs; continuing without performance data");
      PerformanceSummary::default()
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
