use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request payload accepted by the routine endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineRequest {
  pub onboarding_data: OnboardingProfile,
  #[serde(default)]
  pub previous_routine_data: Option<PreviousRoutineReference>,
}

/// User-supplied fitness preferences, immutable for the duration of a call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnboardingProfile {
  pub goal: Option<String>,
  pub gender: Option<String>,
  pub experience: Option<String>,
  /// "N" or "N-M" sessions per week
  pub frequency: Option<String>,
  pub workout_days: Option<Vec<String>>,
  pub equipment: Option<Vec<String>>,
  pub focus_areas: Option<Vec<String>>,
  pub physical_stats: Option<PhysicalStats>,
  /// Session length category, e.g. "30-45" (minutes)
  pub session_duration: Option<String>,
}

impl OnboardingProfile {
  pub fn experience_level(&self) -> ExperienceLevel {
    self
      .experience
      .as_deref()
      .and_then(ExperienceLevel::parse)
      .unwrap_or_default()
  }

  pub fn workout_days(&self) -> &[String] {
    self.workout_days.as_deref().unwrap_or(&[])
  }

  pub fn equipment(&self) -> &[String] {
    self.equipment.as_deref().unwrap_or(&[])
  }

  pub fn focus_areas(&self) -> &[String] {
    self.focus_areas.as_deref().unwrap_or(&[])
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhysicalStats {
  pub age: Option<f64>,
  pub weight_kg: Option<f64>,
  pub height_m: Option<f64>,
  pub target_weight_kg: Option<f64>,
}

impl PhysicalStats {
  pub fn is_empty(&self) -> bool {
    self.age.is_none()
      && self.weight_kg.is_none()
      && self.height_m.is_none()
      && self.target_weight_kg.is_none()
  }
}

/// ---------------------------------------------------------------------------
/// Experience Level
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
  #[default]
  Beginner,
  Intermediate,
  Advanced,
  Expert,
}

impl ExperienceLevel {
  /// Case-insensitive parse; unknown tiers yield None
  pub fn parse(raw: &str) -> Option<Self> {
    match raw.trim().to_ascii_lowercase().as_str() {
      "beginner" => Some(Self::Beginner),
      "intermediate" => Some(Self::Intermediate),
      "advanced" => Some(Self::Advanced),
      "expert" => Some(Self::Expert),
      _ => None,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Beginner => "Beginner",
      Self::Intermediate => "Intermediate",
      Self::Advanced => "Advanced",
      Self::Expert => "Expert",
    }
  }

  /// Whether a five-way body-part split is appropriate
  pub fn handles_high_volume_split(&self) -> bool {
    !matches!(self, Self::Beginner)
  }
}

/// ---------------------------------------------------------------------------
/// Previous Routine
/// ---------------------------------------------------------------------------

/// Cached metadata about the user's previous plan; never mutated here
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousRoutineReference {
  pub id: Option<String>,
  pub name: Option<String>,
  pub duration_in_weeks: Option<f64>,
  pub generated_at: Option<Timestamp>,
  pub expires_at: Option<Timestamp>,
}

impl PreviousRoutineReference {
  pub fn routine_id(&self) -> Option<&str> {
    self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
  }

  pub fn expiry(&self) -> Option<DateTime<Utc>> {
    self.expires_at.as_ref().and_then(Timestamp::to_datetime)
  }
}

/// Client timestamps arrive either as epoch milliseconds or as RFC 3339 text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
  Millis(f64),
  Text(String),
}

impl Timestamp {
  pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
    match self {
      Timestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms as i64),
      Timestamp::Text(text) => {
        let text = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
          return Some(dt.with_timezone(&Utc));
        }
        text
          .parse::<i64>()
          .ok()
          .and_then(DateTime::from_timestamp_millis)
      }
    }
  }
}
