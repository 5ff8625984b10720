use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One logged training session as stored in the log store
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutLog {
  pub id: i64,
  pub user_id: String,
  pub routine_id: String,
  pub day_key: Option<String>,
  pub logged_at: DateTime<Utc>,
  pub exercises_json: String,
  pub created_at: Option<DateTime<Utc>>,
}

impl WorkoutLog {
  pub fn exercises(&self) -> Result<Vec<LoggedExercise>, serde_json::Error> {
    serde_json::from_str(&self.exercises_json)
  }
}

/// A single exercise occurrence inside a logged session
///
/// Performed values come from client input and may be numbers or strings
/// ("10", "bodyweight", "N/A"), so they stay loosely typed until aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedExercise {
  pub exercise_id: Option<String>,
  #[serde(default)]
  pub name: String,
  pub target_reps: Option<String>,
  pub target_weight: Option<String>,
  pub reps_performed: Option<Value>,
  pub weight_used: Option<Value>,
  #[serde(default)]
  pub completed: bool,
}

impl LoggedExercise {
  /// Aggregation key: the exercise id when present, else the trimmed name
  pub fn key(&self) -> Option<String> {
    self
      .exercise_id
      .as_deref()
      .map(str::trim)
      .filter(|id| !id.is_empty())
      .or_else(|| Some(self.name.trim()).filter(|n| !n.is_empty()))
      .map(str::to_string)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_key_prefers_exercise_id() {
    let logged = LoggedExercise {
      exercise_id: Some("ex-42".into()),
      name: "Bench Press".into(),
      ..Default::default()
    };
    assert_eq!(logged.key().as_deref(), Some("ex-42"));

    let by_name = LoggedExercise {
      exercise_id: Some(" ".into()),
      name: " Bench Press ".into(),
      ..Default::default()
    };
    assert_eq!(by_name.key().as_deref(), Some("Bench Press"));

    assert_eq!(LoggedExercise::default().key(), None);
  }

  #[test]
  fn test_loose_values_deserialize() {
    let parsed: Vec<LoggedExercise> = serde_json::from_str(
      r#"[{"name":"Squat","repsPerformed":"8","weightUsed":60,"completed":true},
          {"name":"Plank","weightUsed":"bodyweight"}]"#,
    )
    .unwrap();
    assert_eq!(parsed.len(), 2);
    assert!(parsed[0].completed);
    assert!(!parsed[1].completed);
    assert_eq!(parsed[1].weight_used.as_ref().and_then(Value::as_str), Some("bodyweight"));
  }
}
