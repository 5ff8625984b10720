//! Fixed weekly muscle-split templates keyed by day count and experience

use serde::Serialize;

use crate::models::ExperienceLevel;

/// One training-day theme within a split
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTheme {
  pub name: &'static str,
  pub target_muscles: &'static [&'static str],
  pub theme: &'static str,
}

/// An ordered weekly split template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MuscleSplitPlan {
  pub name: &'static str,
  pub days: &'static [DayTheme],
}

impl MuscleSplitPlan {
  pub fn len(&self) -> usize {
    self.days.len()
  }

  pub fn is_empty(&self) -> bool {
    self.days.is_empty()
  }

  /// Theme for the n-th training day (0-based), cycling when there are more
  /// training days than themes
  pub fn theme_for(&self, training_day: usize) -> &DayTheme {
    &self.days[training_day % self.days.len()]
  }
}

/// ---------------------------------------------------------------------------
/// Templates
/// ---------------------------------------------------------------------------

pub static UPPER_LOWER: MuscleSplitPlan = MuscleSplitPlan {
  name: "Upper / Lower",
  days: &[
    DayTheme {
      name: "Upper Body",
      target_muscles: &["chest", "back", "shoulders", "biceps", "triceps"],
      theme: "Compound pressing and pulling for the whole upper body",
    },
    DayTheme {
      name: "Lower Body & Core",
      target_muscles: &["quadriceps", "hamstrings", "glutes", "calves", "core"],
      theme: "Squat and hinge patterns with core stability work",
    },
  ],
};

pub static PUSH_PULL_LEGS: MuscleSplitPlan = MuscleSplitPlan {
  name: "Push / Pull / Legs",
  days: &[
    DayTheme {
      name: "Push",
      target_muscles: &["chest", "shoulders", "triceps"],
      theme: "Horizontal and vertical pressing",
    },
    DayTheme {
      name: "Pull",
      target_muscles: &["back", "rear delts", "biceps"],
      theme: "Rows, pulldowns and curls",
    },
    DayTheme {
      name: "Legs",
      target_muscles: &["quadriceps", "hamstrings", "glutes", "calves"],
      theme: "Squats, hinges and lunges",
    },
  ],
};

pub static UPPER_LOWER_TWICE: MuscleSplitPlan = MuscleSplitPlan {
  name: "Upper / Lower x2",
  days: &[
    DayTheme {
      name: "Upper Strength",
      target_muscles: &["chest", "back", "shoulders"],
      theme: "Heavier compound upper-body lifts, lower reps",
    },
    DayTheme {
      name: "Lower Strength",
      target_muscles: &["quadriceps", "hamstrings", "glutes"],
      theme: "Heavier squat and hinge work, lower reps",
    },
    DayTheme {
      name: "Upper Hypertrophy",
      target_muscles: &["chest", "back", "biceps", "triceps"],
      theme: "Moderate loads, higher reps, arm accessories",
    },
    DayTheme {
      name: "Lower Hypertrophy & Core",
      target_muscles: &["quadriceps", "hamstrings", "calves", "core"],
      theme: "Unilateral leg work, higher reps, core",
    },
  ],
};

pub static BODY_PART_FIVE: MuscleSplitPlan = MuscleSplitPlan {
  name: "Five-Day Body Part",
  days: &[
    DayTheme {
      name: "Chest",
      target_muscles: &["chest", "front delts", "triceps"],
      theme: "Pressing volume from multiple angles",
    },
    DayTheme {
      name: "Back",
      target_muscles: &["lats", "upper back", "rear delts"],
      theme: "Vertical and horizontal pulling volume",
    },
    DayTheme {
      name: "Legs",
      target_muscles: &["quadriceps", "hamstrings", "glutes", "calves"],
      theme: "Full lower-body session",
    },
    DayTheme {
      name: "Shoulders & Core",
      target_muscles: &["shoulders", "traps", "core"],
      theme: "Overhead pressing, lateral work and trunk stability",
    },
    DayTheme {
      name: "Arms & Conditioning",
      target_muscles: &["biceps", "triceps", "forearms"],
      theme: "Arm isolation finished with a short conditioning block",
    },
  ],
};

/// Select the split template for a resolved day count and experience tier
pub fn select(day_count: u32, experience: ExperienceLevel) -> &'static MuscleSplitPlan {
  match day_count {
    0..=2 => &UPPER_LOWER,
    3 => &PUSH_PULL_LEGS,
    4 => &UPPER_LOWER_TWICE,
    _ if experience.handles_high_volume_split() => &BODY_PART_FIVE,
    _ => &UPPER_LOWER_TWICE,
  }
}
