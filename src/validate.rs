//! Response validation and normalization
//!
//! The provider reply is untrusted text. It is parsed, checked at the top
//! level, and then repaired field by field into a [`GeneratedRoutine`] that
//! always carries all seven weekdays. Only an unsalvageable top-level shape
//! fails the request, unless [`ValidationMode::Strict`] is selected, in which
//! case the first invalid exercise aborts.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::error::{Result, RoutineError};
use crate::models::{DailyWorkouts, Exercise, GeneratedRoutine, Weekday};
use crate::schedule::ScheduleParameters;

/// ---------------------------------------------------------------------------
/// Fallbacks
/// ---------------------------------------------------------------------------

pub const FALLBACK_NAME: &str = "Unnamed Exercise";
pub const FALLBACK_SETS: u32 = 3;
pub const FALLBACK_REPS: &str = "8-12";
pub const FALLBACK_WEIGHT: &str = "N/A";
pub const FALLBACK_REST_SECONDS: u32 = 60;
/// Used when the provider sent a description of the wrong type
pub const INVALID_DESCRIPTION_FALLBACK: &str =
  "Instructions for this exercise are currently unavailable.";
/// Used when the description is blank after trimming
pub const EMPTY_DESCRIPTION_FALLBACK: &str =
  "How to perform: Detailed instructions will be available soon.";

const RAW_LOG_LIMIT: usize = 1000;

/// ---------------------------------------------------------------------------
/// Validation Mode
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
  /// Repair defective exercises in place
  #[default]
  Lenient,
  /// Abort on the first defective exercise
  Strict,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown validation mode: {0}")]
pub struct UnknownValidationMode(String);

impl FromStr for ValidationMode {
  type Err = UnknownValidationMode;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "lenient" => Ok(Self::Lenient),
      "strict" => Ok(Self::Strict),
      other => Err(UnknownValidationMode(other.to_string())),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Parsing
/// ---------------------------------------------------------------------------

/// Trim the reply and unwrap it when the whole reply is one fenced code
/// block; prose around the document is left in place and fails to parse
pub fn extract_json(text: &str) -> &str {
  let trimmed = text.trim();
  let Some(body) = trimmed
    .strip_prefix("```")
    .and_then(|rest| rest.strip_suffix("```"))
  else {
    return trimmed;
  };

  // Skip a language tag on the opening fence line
  match body.find('\n') {
    Some(i) if !body[..i].contains('{') => body[i + 1..].trim(),
    _ => body.trim(),
  }
}

fn truncate_for_log(text: &str) -> String {
  text.chars().take(RAW_LOG_LIMIT).collect()
}

/// Parse raw provider text into a JSON value
pub fn parse_payload(raw: &str) -> Result<Value> {
  let candidate = extract_json(raw);
  if candidate.is_empty() {
    error!("AI response was empty after trimming");
    return Err(RoutineError::internal(
      "AI service returned an empty response. Please try again later.",
    ));
  }

  serde_json::from_str(candidate).map_err(|e| {
    error!(error = %e, raw = %truncate_for_log(raw), "Failed to parse AI response as JSON");
    RoutineError::internal_with_details(
      "AI response was not in the expected format. Please try again.",
      e.to_string(),
    )
  })
}

/// ---------------------------------------------------------------------------
/// Normalization
/// ---------------------------------------------------------------------------

fn structure_error(problem: &str) -> RoutineError {
  error!(problem, "AI response failed top-level structure validation");
  RoutineError::internal_with_details(
    "AI response did not match the expected routine structure. Please try again.",
    problem,
  )
}

/// Parse and normalize raw provider text
pub fn normalize(raw: &str, mode: ValidationMode) -> Result<GeneratedRoutine> {
  let value = parse_payload(raw)?;
  normalize_value(&value, mode)
}

/// Normalize an already-parsed provider payload
pub fn normalize_value(value: &Value, mode: ValidationMode) -> Result<GeneratedRoutine> {
  let root = value
    .as_object()
    .ok_or_else(|| structure_error("top-level value must be an object"))?;

  let name = root
    .get("name")
    .and_then(Value::as_str)
    .map(str::trim)
    .filter(|n| !n.is_empty())
    .ok_or_else(|| structure_error("name must be a non-empty string"))?
    .to_string();

  let duration_in_weeks = root
    .get("durationInWeeks")
    .and_then(Value::as_f64)
    .filter(|w| w.is_finite() && *w > 0.0)
    .map(|w| w.ceil() as u32)
    .ok_or_else(|| structure_error("durationInWeeks must be a positive number"))?;

  let days = root
    .get("dailyWorkouts")
    .and_then(Value::as_object)
    .ok_or_else(|| structure_error("dailyWorkouts must be an object"))?;

  let mut daily_workouts = DailyWorkouts::default();
  let mut repaired = 0usize;

  for day in Weekday::ALL {
    let entries = day_entries(days, day);
    let slot = daily_workouts.get_mut(day);
    for (index, entry) in entries.iter().enumerate() {
      let outcome = repair_exercise(entry);
      if !outcome.defects.is_empty() {
        if mode == ValidationMode::Strict {
          let details = format!("{} exercise {}: {}", day, index + 1, outcome.defects.join(", "));
          error!(day = %day, index, defects = ?outcome.defects, "Invalid exercise in strict mode");
          return Err(RoutineError::internal_with_details(
            "AI response contained an invalid exercise. Please try again.",
            details,
          ));
        }
        warn!(day = %day, index, defects = ?outcome.defects, "Repaired invalid exercise fields");
        repaired += 1;
      }
      slot.push(outcome.exercise);
    }
  }

  info!(
    name = %name,
    duration_in_weeks,
    workout_days = daily_workouts.workout_days().len(),
    exercises = daily_workouts.total_exercises(),
    repaired,
    "Normalized generated routine"
  );

  Ok(GeneratedRoutine {
    name,
    duration_in_weeks,
    daily_workouts,
  })
}

/// Exercises for a weekday; exact lowercase key wins over other casings
fn day_entries<'a>(days: &'a Map<String, Value>, day: Weekday) -> &'a [Value] {
  let value = days.get(day.as_str()).or_else(|| {
    days
      .iter()
      .find(|(key, _)| key.trim().eq_ignore_ascii_case(day.as_str()))
      .map(|(_, v)| v)
  });

  match value {
    Some(Value::Array(entries)) => entries,
    Some(other) => {
      debug!(day = %day, kind = %value_kind(other), "Weekday value is not an array; treating as rest day");
      &[]
    }
    None => &[],
  }
}

fn value_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

struct Repaired {
  exercise: Exercise,
  defects: Vec<&'static str>,
}

/// Coerce one exercise entry, recording which core fields were defective
fn repair_exercise(entry: &Value) -> Repaired {
  let empty = Map::new();
  let mut defects = Vec::new();
  let fields = match entry.as_object() {
    Some(map) => map,
    None => {
      defects.push("entry");
      &empty
    }
  };

  let name = match fields.get("name").and_then(Value::as_str).map(str::trim) {
    Some(name) if !name.is_empty() => name.to_string(),
    _ => {
      defects.push("name");
      FALLBACK_NAME.to_string()
    }
  };

  // Numeric strings and fractional counts are coerced but still count as defects
  let whole_sets = fields
    .get("sets")
    .and_then(Value::as_u64)
    .filter(|v| *v >= 1)
    .and_then(|v| u32::try_from(v).ok());
  let sets = match whole_sets {
    Some(sets) => sets,
    None => {
      defects.push("sets");
      fields
        .get("sets")
        .and_then(positive_integer)
        .unwrap_or(FALLBACK_SETS)
    }
  };

  let reps = match fields.get("reps") {
    Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
    Some(Value::Number(n)) => {
      defects.push("reps");
      n.to_string()
    }
    _ => {
      defects.push("reps");
      FALLBACK_REPS.to_string()
    }
  };

  let description = match fields.get("description") {
    Some(Value::String(s)) => {
      let trimmed = s.trim();
      if trimmed.is_empty() {
        EMPTY_DESCRIPTION_FALLBACK.to_string()
      } else {
        trimmed.to_string()
      }
    }
    _ => {
      defects.push("description");
      INVALID_DESCRIPTION_FALLBACK.to_string()
    }
  };

  let weight_suggestion_kg = match fields.get("weightSuggestionKg") {
    Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
    Some(Value::Number(n)) => n.to_string(),
    _ => FALLBACK_WEIGHT.to_string(),
  };

  let rest_between_sets_seconds = fields
    .get("restBetweenSetsSeconds")
    .and_then(Value::as_f64)
    .filter(|r| r.is_finite() && *r >= 0.0)
    .map(|r| r.round() as u32)
    .unwrap_or(FALLBACK_REST_SECONDS);

  let uses_weight = fields
    .get("usesWeight")
    .and_then(Value::as_bool)
    .unwrap_or(true);
  let is_timed = fields
    .get("isTimed")
    .and_then(Value::as_bool)
    .unwrap_or(false);

  let target_duration_seconds = if is_timed {
    fields
      .get("targetDurationSeconds")
      .and_then(Value::as_f64)
      .filter(|d| d.is_finite() && *d > 0.0)
      .map(|d| d.round().max(1.0) as u32)
  } else {
    None
  };

  Repaired {
    exercise: Exercise {
      name,
      sets,
      reps,
      weight_suggestion_kg,
      rest_between_sets_seconds,
      description,
      uses_weight,
      is_timed,
      target_duration_seconds,
    },
    defects,
  }
}

/// Positive whole count from a number or numeric string
fn positive_integer(value: &Value) -> Option<u32> {
  let n = match value {
    Value::Number(n) => n.as_f64()?,
    Value::String(s) => s.trim().parse::<f64>().ok()?,
    _ => return None,
  };
  (n.is_finite() && n >= 1.0).then(|| n.round() as u32)
}

/// ---------------------------------------------------------------------------
/// Reconciliation
/// ---------------------------------------------------------------------------

/// How the generated schedule compares with the requested one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
  Agreement,
  NoWorkoutDays {
    requested: u32,
  },
  CountMismatch {
    requested: u32,
    actual: u32,
  },
  ExactDayMismatch {
    missing: Vec<Weekday>,
    unexpected: Vec<Weekday>,
  },
}

impl Reconciliation {
  pub fn is_agreement(&self) -> bool {
    matches!(self, Self::Agreement)
  }
}

impl fmt::Display for Reconciliation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let join = |days: &[Weekday]| {
      days
        .iter()
        .map(|d| d.as_str())
        .collect::<Vec<_>>()
        .join(", ")
    };
    match self {
      Self::Agreement => write!(f, "schedule matches"),
      Self::NoWorkoutDays { requested } => {
        write!(f, "no workout days, {} requested", requested)
      }
      Self::CountMismatch { requested, actual } => {
        write!(f, "{} workout days, {} requested", actual, requested)
      }
      Self::ExactDayMismatch {
        missing,
        unexpected,
      } => write!(
        f,
        "missing days [{}], unexpected days [{}]",
        join(missing),
        join(unexpected)
      ),
    }
  }
}

/// Compare scheduled workout days against the resolved parameters and log the
/// outcome; never alters the routine
pub fn reconcile(routine: &GeneratedRoutine, schedule: &ScheduleParameters) -> Reconciliation {
  let actual: BTreeSet<Weekday> = routine.daily_workouts.workout_days().into_iter().collect();

  let outcome = if actual.is_empty() {
    Reconciliation::NoWorkoutDays {
      requested: schedule.day_count,
    }
  } else if schedule.exact_days_mandated {
    let expected: BTreeSet<Weekday> = schedule
      .mandated_days
      .iter()
      .filter_map(|d| Weekday::parse(d))
      .collect();
    if expected == actual {
      Reconciliation::Agreement
    } else {
      Reconciliation::ExactDayMismatch {
        missing: expected.difference(&actual).copied().collect(),
        unexpected: actual.difference(&expected).copied().collect(),
      }
    }
  } else if actual.len() as u32 == schedule.day_count {
    Reconciliation::Agreement
  } else {
    Reconciliation::CountMismatch {
      requested: schedule.day_count,
      actual: actual.len() as u32,
    }
  };

  match &outcome {
    Reconciliation::Agreement => info!(
      days = actual.len(),
      exact = schedule.exact_days_mandated,
      "Generated schedule matches requested days"
    ),
    Reconciliation::NoWorkoutDays { requested } => warn!(
      requested,
      "Generated routine has no workout days"
    ),
    Reconciliation::CountMismatch { requested, actual } => warn!(
      requested,
      actual,
      "Generated routine has a different number of workout days than requested"
    ),
    Reconciliation::ExactDayMismatch {
      missing,
      unexpected,
    } => warn!(
      missing = ?missing,
      unexpected = ?unexpected,
      "Generated routine does not use the mandated days"
    ),
  }

  outcome
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::schedule;
  use serde_json::json;

  fn squat() -> Value {
    json!({
      "name": "Squat",
      "sets": 3,
      "reps": "10",
      "weightSuggestionKg": "60",
      "restBetweenSetsSeconds": 90,
      "description": "1. Brace.\n2. Sit back.\n3. Stand up.",
      "usesWeight": true,
      "isTimed": false
    })
  }

  fn payload(days: Value) -> Value {
    json!({ "name": "Test Plan", "durationInWeeks": 4, "dailyWorkouts": days })
  }

  #[test]
  fn test_missing_sunday_filled_with_empty_array() {
    let days = json!({
      "monday": [squat()], "tuesday": [], "wednesday": [squat()],
      "thursday": [], "friday": [squat()], "saturday": []
    });
    let routine = normalize_value(&payload(days), ValidationMode::Lenient).unwrap();
    assert!(routine.daily_workouts.sunday.is_empty());
    assert_eq!(routine.daily_workouts.monday.len(), 1);
    assert_eq!(routine.daily_workouts.friday[0].name, "Squat");

    let json = serde_json::to_value(&routine).unwrap();
    assert_eq!(json["dailyWorkouts"]["sunday"], json!([]));
  }

  #[test]
  fn test_wrong_type_description_gets_fallback() {
    let days = json!({ "monday": [{ "name": "Squat", "sets": 3, "reps": "10", "description": 123 }] });
    let routine = normalize_value(&payload(days), ValidationMode::Lenient).unwrap();
    let exercise = &routine.daily_workouts.monday[0];
    assert_eq!(exercise.name, "Squat");
    assert_eq!(exercise.sets, 3);
    assert_eq!(exercise.reps, "10");
    assert_eq!(exercise.description, INVALID_DESCRIPTION_FALLBACK);
    assert_eq!(exercise.weight_suggestion_kg, FALLBACK_WEIGHT);
    assert_eq!(exercise.rest_between_sets_seconds, FALLBACK_REST_SECONDS);
    assert!(exercise.uses_weight);
    assert!(!exercise.is_timed);
  }

  #[test]
  fn test_negative_duration_is_internal_error() {
    let value = json!({ "name": "Plan", "durationInWeeks": -1, "dailyWorkouts": {} });
    let err = normalize_value(&value, ValidationMode::Lenient).unwrap_err();
    assert_eq!(err.code(), "internal");
  }

  #[test]
  fn test_top_level_shape_errors() {
    let no_name = json!({ "name": "  ", "durationInWeeks": 4, "dailyWorkouts": {} });
    assert_eq!(normalize_value(&no_name, ValidationMode::Lenient).unwrap_err().code(), "internal");

    let null_days = json!({ "name": "Plan", "durationInWeeks": 4, "dailyWorkouts": null });
    assert_eq!(normalize_value(&null_days, ValidationMode::Lenient).unwrap_err().code(), "internal");

    let string_weeks = json!({ "name": "Plan", "durationInWeeks": "4", "dailyWorkouts": {} });
    assert_eq!(normalize_value(&string_weeks, ValidationMode::Lenient).unwrap_err().code(), "internal");

    assert_eq!(normalize_value(&json!([]), ValidationMode::Lenient).unwrap_err().code(), "internal");
  }

  #[test]
  fn test_unparseable_and_empty_text() {
    let err = normalize("definitely not json", ValidationMode::Lenient).unwrap_err();
    assert_eq!(err.code(), "internal");
    assert!(err.details().is_some());

    let err = normalize("   ", ValidationMode::Lenient).unwrap_err();
    assert_eq!(err.code(), "internal");
  }

  #[test]
  fn test_fenced_reply_is_parsed() {
    let raw = format!("```json\n{}\n```", payload(json!({ "monday": [squat()] })));
    let routine = normalize(&raw, ValidationMode::Lenient).unwrap();
    assert_eq!(routine.name, "Test Plan");
    assert_eq!(routine.daily_workouts.total_exercises(), 1);
  }

  #[test]
  fn test_prose_around_reply_is_internal_error() {
    let body = payload(json!({ "monday": [squat()] }));
    for raw in [
      format!("Here is your plan: {} Enjoy!", body),
      format!("Here you go:\n```json\n{}\n```\nEnjoy!", body),
    ] {
      let err = normalize(&raw, ValidationMode::Lenient).unwrap_err();
      assert_eq!(err.code(), "internal");
    }
  }

  #[test]
  fn test_extract_json_variants() {
    assert_eq!(extract_json("  {\"a\":1} "), "{\"a\":1}");
    assert_eq!(extract_json("```\n{\"a\":1}\n```"), "{\"a\":1}");
    assert_eq!(extract_json("```json\n{\"a\":1}\n```\n"), "{\"a\":1}");
    assert_eq!(extract_json("```{\"a\":1}```"), "{\"a\":1}");
    assert_eq!(extract_json("result: {\"a\":1} done"), "result: {\"a\":1} done");
    assert_eq!(extract_json("nothing here"), "nothing here");
  }

  #[test]
  fn test_day_keys_matched_case_insensitively() {
    let days = json!({ "Monday": [squat()], "TUESDAY": "rest", "wednesday": null });
    let routine = normalize_value(&payload(days), ValidationMode::Lenient).unwrap();
    assert_eq!(routine.daily_workouts.monday.len(), 1);
    assert!(routine.daily_workouts.tuesday.is_empty());
    assert!(routine.daily_workouts.wednesday.is_empty());
  }

  #[test]
  fn test_exact_lowercase_key_preferred() {
    let days = json!({ "Monday": [squat(), squat()], "monday": [squat()] });
    let routine = normalize_value(&payload(days), ValidationMode::Lenient).unwrap();
    assert_eq!(routine.daily_workouts.monday.len(), 1);
  }

  #[test]
  fn test_field_coercions() {
    let days = json!({
      "monday": [
        { "name": "", "sets": "4", "reps": 12, "description": "   ",
          "weightSuggestionKg": " Moderate ", "restBetweenSetsSeconds": -5 },
        { "name": "Plank", "sets": 0, "description": "Hold.", "isTimed": true,
          "targetDurationSeconds": 45, "usesWeight": "no", "weightSuggestionKg": 20 },
        { "name": "Sprint", "sets": 6, "reps": "1", "description": "Go.", "isTimed": true,
          "targetDurationSeconds": 0 },
        { "name": "Curl", "sets": 2.6, "reps": "12", "description": "Curl.", "isTimed": false,
          "targetDurationSeconds": 30 },
        "not an object"
      ]
    });
    let routine = normalize_value(&payload(days), ValidationMode::Lenient).unwrap();
    let monday = &routine.daily_workouts.monday;
    assert_eq!(monday.len(), 5);

    assert_eq!(monday[0].name, FALLBACK_NAME);
    assert_eq!(monday[0].sets, 4);
    assert_eq!(monday[0].reps, "12");
    assert_eq!(monday[0].description, EMPTY_DESCRIPTION_FALLBACK);
    assert_eq!(monday[0].weight_suggestion_kg, "Moderate");
    assert_eq!(monday[0].rest_between_sets_seconds, FALLBACK_REST_SECONDS);

    assert_eq!(monday[1].sets, FALLBACK_SETS);
    assert_eq!(monday[1].reps, FALLBACK_REPS);
    assert_eq!(monday[1].target_duration_seconds, Some(45));
    assert!(monday[1].uses_weight);
    assert_eq!(monday[1].weight_suggestion_kg, "20");

    assert!(monday[2].is_timed);
    assert_eq!(monday[2].target_duration_seconds, None);

    assert_eq!(monday[3].sets, 3);
    assert_eq!(monday[3].target_duration_seconds, None);

    assert_eq!(monday[4].name, FALLBACK_NAME);
    assert_eq!(monday[4].description, INVALID_DESCRIPTION_FALLBACK);
  }

  #[test]
  fn test_fractional_duration_rounds_up() {
    let value = json!({ "name": "Plan", "durationInWeeks": 4.2, "dailyWorkouts": {} });
    let routine = normalize_value(&value, ValidationMode::Lenient).unwrap();
    assert_eq!(routine.duration_in_weeks, 5);
  }

  #[test]
  fn test_strict_mode_aborts_on_invalid_exercise() {
    let days = json!({ "monday": [squat(), { "name": "Squat", "sets": 3, "reps": "10", "description": 123 }] });
    let err = normalize_value(&payload(days.clone()), ValidationMode::Strict).unwrap_err();
    assert_eq!(err.code(), "internal");
    assert!(err.details().unwrap().contains("monday exercise 2"));

    let valid = json!({ "monday": [squat()] });
    assert!(normalize_value(&payload(valid), ValidationMode::Strict).is_ok());
  }

  #[test]
  fn test_strict_mode_rejects_coerced_sets_and_reps() {
    let coerced = json!({ "name": "Squat", "sets": "3", "reps": 12, "description": "d" });
    let err = normalize_value(&payload(json!({ "monday": [coerced.clone()] })), ValidationMode::Strict)
      .unwrap_err();
    assert_eq!(err.code(), "internal");
    let details = err.details().unwrap();
    assert!(details.contains("sets"));
    assert!(details.contains("reps"));

    let fractional = json!({ "name": "Squat", "sets": 2.5, "reps": "10", "description": "d" });
    assert!(normalize_value(&payload(json!({ "tuesday": [fractional] })), ValidationMode::Strict).is_err());

    let routine = normalize_value(&payload(json!({ "monday": [coerced] })), ValidationMode::Lenient).unwrap();
    assert_eq!(routine.daily_workouts.monday[0].sets, 3);
    assert_eq!(routine.daily_workouts.monday[0].reps, "12");
  }

  #[test]
  fn test_normalization_is_idempotent() {
    let days = json!({
      "monday": [squat(), { "name": "Plank", "sets": 3, "reps": "Hold", "description": " Hold it. ",
                            "isTimed": true, "targetDurationSeconds": 60, "usesWeight": false }],
      "thursday": [{ "name": "Row", "sets": 4, "reps": 8, "description": 7 }]
    });
    let first = normalize_value(&payload(days), ValidationMode::Lenient).unwrap();
    let text = serde_json::to_string(&first).unwrap();
    let second = normalize(&text, ValidationMode::Strict).unwrap();
    assert_eq!(first, second);
    assert_eq!(text, serde_json::to_string(&second).unwrap());
  }

  #[test]
  fn test_validation_mode_parse() {
    assert_eq!("strict".parse::<ValidationMode>(), Ok(ValidationMode::Strict));
    assert_eq!(" Lenient ".parse::<ValidationMode>(), Ok(ValidationMode::Lenient));
    assert!("loose".parse::<ValidationMode>().is_err());
    assert_eq!(ValidationMode::default(), ValidationMode::Lenient);
  }

  fn routine_with(days: &[Weekday]) -> GeneratedRoutine {
    let mut map = Map::new();
    for day in days {
      map.insert(day.as_str().to_string(), json!([squat()]));
    }
    normalize_value(&payload(Value::Object(map)), ValidationMode::Lenient).unwrap()
  }

  #[test]
  fn test_reconcile_outcomes() {
    let mandated = schedule::resolve(
      Some("3-5"),
      &["monday".to_string(), "wednesday".to_string(), "friday".to_string()],
    );
    let exact = routine_with(&[Weekday::Monday, Weekday::Wednesday, Weekday::Friday]);
    assert!(reconcile(&exact, &mandated).is_agreement());

    let shifted = routine_with(&[Weekday::Monday, Weekday::Wednesday, Weekday::Saturday]);
    assert_eq!(
      reconcile(&shifted, &mandated),
      Reconciliation::ExactDayMismatch {
        missing: vec![Weekday::Friday],
        unexpected: vec![Weekday::Saturday],
      }
    );

    let soft = schedule::resolve(Some("4"), &[]);
    assert_eq!(
      reconcile(&exact, &soft),
      Reconciliation::CountMismatch { requested: 4, actual: 3 }
    );

    let empty = routine_with(&[]);
    assert_eq!(
      reconcile(&empty, &soft),
      Reconciliation::NoWorkoutDays { requested: 4 }
    );
  }

  #[test]
  fn test_reconciliation_describes_mismatch() {
    let outcome = Reconciliation::ExactDayMismatch {
      missing: vec![Weekday::Friday],
      unexpected: vec![Weekday::Saturday, Weekday::Sunday],
    };
    assert_eq!(
      outcome.to_string(),
      "missing days [friday], unexpected days [saturday, sunday]"
    );
    assert_eq!(
      Reconciliation::CountMismatch { requested: 4, actual: 3 }.to_string(),
      "3 workout days, 4 requested"
    );
  }

  #[test]
  fn test_reconcile_never_changes_routine() {
    let mandated = schedule::resolve(Some("2"), &["tuesday".to_string(), "thursday".to_string()]);
    let routine = routine_with(&[Weekday::Monday]);
    let before = routine.clone();
    let outcome = reconcile(&routine, &mandated);
    assert!(!outcome.is_agreement());
    assert_eq!(routine, before);
  }
}
