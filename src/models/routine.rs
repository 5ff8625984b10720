use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Weekdays
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
  Monday,
  Tuesday,
  Wednesday,
  Thursday,
  Friday,
  Saturday,
  Sunday,
}

impl Weekday {
  pub const ALL: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Monday => "monday",
      Self::Tuesday => "tuesday",
      Self::Wednesday => "wednesday",
      Self::Thursday => "thursday",
      Self::Friday => "friday",
      Self::Saturday => "saturday",
      Self::Sunday => "sunday",
    }
  }

  /// Case-insensitive match against the canonical lowercase name
  pub fn parse(raw: &str) -> Option<Self> {
    let lowered = raw.trim().to_lowercase();
    Self::ALL.into_iter().find(|d| d.as_str() == lowered)
  }
}

impl std::fmt::Display for Weekday {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// ---------------------------------------------------------------------------
/// Generated Routine
/// ---------------------------------------------------------------------------

/// A validated routine; every weekday key is always present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedRoutine {
  pub name: String,
  pub duration_in_weeks: u32,
  pub daily_workouts: DailyWorkouts,
}

/// Fixed seven-day schedule; rest days are empty vectors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyWorkouts {
  pub monday: Vec<Exercise>,
  pub tuesday: Vec<Exercise>,
  pub wednesday: Vec<Exercise>,
  pub thursday: Vec<Exercise>,
  pub friday: Vec<Exercise>,
  pub saturday: Vec<Exercise>,
  pub sunday: Vec<Exercise>,
}

impl DailyWorkouts {
  pub fn get(&self, day: Weekday) -> &[Exercise] {
    match day {
      Weekday::Monday => &self.monday,
      Weekday::Tuesday => &self.tuesday,
      Weekday::Wednesday => &self.wednesday,
      Weekday::Thursday => &self.thursday,
      Weekday::Friday => &self.friday,
      Weekday::Saturday => &self.saturday,
      Weekday::Sunday => &self.sunday,
    }
  }

  pub fn get_mut(&mut self, day: Weekday) -> &mut Vec<Exercise> {
    match day {
      Weekday::Monday => &mut self.monday,
      Weekday::Tuesday => &mut self.tuesday,
      Weekday::Wednesday => &mut self.wednesday,
      Weekday::Thursday => &mut self.thursday,
      Weekday::Friday => &mut self.friday,
      Weekday::Saturday => &mut self.saturday,
      Weekday::Sunday => &mut self.sunday,
    }
  }

  /// Days carrying at least one exercise, in week order
  pub fn workout_days(&self) -> Vec<Weekday> {
    Weekday::ALL
      .into_iter()
      .filter(|d| !self.get(*d).is_empty())
      .collect()
  }

  pub fn total_exercises(&self) -> usize {
    Weekday::ALL.iter().map(|d| self.get(*d).len()).sum()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
  pub name: String,
  pub sets: u32,
  /// Free-form: "8-12", "AMRAP", "30s", "5km"
  pub reps: String,
  pub weight_suggestion_kg: String,
  pub rest_between_sets_seconds: u32,
  pub description: String,
  pub uses_weight: bool,
  pub is_timed: bool,
  /// Only meaningful when `is_timed`
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target_duration_seconds: Option<u32>,
}
