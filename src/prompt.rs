//! Prompt composition for routine generation
//!
//! Builds the instruction text sent to the generation provider from the
//! resolved schedule, the onboarding profile and optional history. Pure: no
//! I/O, so every section can be tested without the network.

use crate::models::{OnboardingProfile, PhysicalStats, PreviousRoutineReference, Weekday};
use crate::performance::{ExercisePerformance, PerformanceSummary};
use crate::schedule::ScheduleParameters;
use crate::split::MuscleSplitPlan;

/// ---------------------------------------------------------------------------
/// Options
/// ---------------------------------------------------------------------------

/// Maps a session-length category to an exercise-count instruction
#[derive(Debug, Clone, PartialEq)]
pub struct SessionBucket {
  pub label: &'static str,
  pub min_minutes: u32,
  /// Exclusive upper bound; None for open-ended
  pub max_minutes: Option<u32>,
  pub exercise_count: &'static str,
}

pub const DEFAULT_EXERCISE_COUNT: &str = "4-6 exercises";

pub fn default_session_buckets() -> Vec<SessionBucket> {
  vec![
    SessionBucket {
      label: "15-30",
      min_minutes: 0,
      max_minutes: Some(30),
      exercise_count: "3-4 exercises",
    },
    SessionBucket {
      label: "30-45",
      min_minutes: 30,
      max_minutes: Some(45),
      exercise_count: "4-5 exercises",
    },
    SessionBucket {
      label: "45-60",
      min_minutes: 45,
      max_minutes: Some(60),
      exercise_count: "5-6 exercises",
    },
    SessionBucket {
      label: "60-90",
      min_minutes: 60,
      max_minutes: Some(90),
      exercise_count: "6-8 exercises",
    },
    SessionBucket {
      label: "90+",
      min_minutes: 90,
      max_minutes: None,
      exercise_count: "7-9 exercises",
    },
  ]
}

/// Feature switches for the composed prompt
#[derive(Debug, Clone, PartialEq)]
pub struct PromptOptions {
  /// Assign a fixed muscle-split theme to each training day
  pub muscle_split: bool,
  /// Include per-exercise history and progression rules when available
  pub performance_progression: bool,
  pub session_buckets: Vec<SessionBucket>,
}

impl Default for PromptOptions {
  fn default() -> Self {
    Self {
      muscle_split: true,
      performance_progression: true,
      session_buckets: default_session_buckets(),
    }
  }
}

impl PromptOptions {
  /// Exercise-count instruction for a session-duration category
  ///
  /// Matches a bucket label first ("30-45"), then falls back to the leading
  /// minute value ("40 min" -> 30-45 bucket).
  pub fn exercise_count_for(&self, session_duration: Option<&str>) -> &'static str {
    let Some(raw) = session_duration.map(str::trim).filter(|s| !s.is_empty()) else {
      return DEFAULT_EXERCISE_COUNT;
    };

    if let Some(bucket) = self
      .session_buckets
      .iter()
      .find(|b| b.label.eq_ignore_ascii_case(raw))
    {
      return bucket.exercise_count;
    }

    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    let Ok(minutes) = digits.parse::<u32>() else {
      return DEFAULT_EXERCISE_COUNT;
    };

    self
      .session_buckets
      .iter()
      .find(|b| minutes >= b.min_minutes && b.max_minutes.map_or(true, |max| minutes < max))
      .map(|b| b.exercise_count)
      .unwrap_or(DEFAULT_EXERCISE_COUNT)
  }
}

/// ---------------------------------------------------------------------------
/// Composition
/// ---------------------------------------------------------------------------

/// Everything the composer reads for one request
pub struct PromptContext<'a> {
  pub profile: &'a OnboardingProfile,
  pub schedule: &'a ScheduleParameters,
  pub split: Option<&'a MuscleSplitPlan>,
  pub previous: Option<&'a PreviousRoutineReference>,
  pub performance: &'a PerformanceSummary,
}

/// Compose the full prompt; sections are joined with newlines
pub fn compose(ctx: &PromptContext<'_>, options: &PromptOptions) -> String {
  let mut sections: Vec<String> = Vec::new();

  sections.push(ROLE_FRAMING.to_string());

  push_profile(&mut sections, ctx.profile);
  push_schedule_constraints(&mut sections, ctx.profile, ctx.schedule, options);
  push_equipment_and_focus(&mut sections, ctx.profile);
  if let Some(stats) = ctx.profile.physical_stats.as_ref().filter(|s| !s.is_empty()) {
    push_physical_stats(&mut sections, stats);
  }
  push_progression(&mut sections, ctx.previous, ctx.performance, options);
  if options.muscle_split {
    if let Some(split) = ctx.split {
      push_split(&mut sections, split, ctx.schedule);
    }
  }

  sections.push(OUTPUT_INSTRUCTIONS.to_string());
  sections.push("\n--- JSON Structure Example (your output MUST follow this format precisely) ---".to_string());
  sections.push(WORKED_EXAMPLE.to_string());
  sections.push(CLOSING_REMINDER.to_string());

  sections.join("\n")
}

fn push_profile(sections: &mut Vec<String>, profile: &OnboardingProfile) {
  sections.push("\n--- User Profile & Preferences ---".to_string());
  sections.push(format!(
    "- Primary Fitness Goal: {}",
    text_or(profile.goal.as_deref(), "Not specified")
  ));
  sections.push(format!(
    "- Gender: {}",
    text_or(profile.gender.as_deref(), "Not specified")
  ));
  sections.push(format!("- Experience Level: {}", profile.experience_level().label()));
}

fn push_schedule_constraints(
  sections: &mut Vec<String>,
  profile: &OnboardingProfile,
  schedule: &ScheduleParameters,
  options: &PromptOptions,
) {
  sections.push("\n--- Hard Constraints ---".to_string());

  if schedule.exact_days_mandated {
    sections.push(format!(
      "- CRITICAL: The user trains on THESE EXACT {} DAYS: {}. You MUST schedule a workout on every one of these days. All other days MUST be rest days.",
      schedule.day_count,
      schedule.mandated_days.join(", ")
    ));
  } else {
    sections.push(format!(
      "- Training days per week: exactly {} days.",
      schedule.day_count
    ));
    if !schedule.preferred_days.is_empty() {
      sections.push(format!(
        "- Preferred workout days (pick {} from this list where possible, otherwise choose suitable days): {}",
        schedule.day_count,
        schedule.preferred_days.join(", ")
      ));
    }
  }

  let count = options.exercise_count_for(profile.session_duration.as_deref());
  match profile.session_duration.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    Some(duration) => sections.push(format!(
      "- Session length: {} minutes. Each workout day MUST contain {}.",
      duration, count
    )),
    None => sections.push(format!("- Each workout day MUST contain {}.", count)),
  }
}

fn push_equipment_and_focus(sections: &mut Vec<String>, profile: &OnboardingProfile) {
  let equipment = profile.equipment();
  if equipment.is_empty() {
    sections.push("- Available Equipment: Bodyweight only".to_string());
  } else {
    sections.push(format!(
      "- Available Equipment: {}. Only prescribe exercises that can be done with this equipment.",
      equipment.join(", ")
    ));
  }

  let focus = profile.focus_areas();
  if !focus.is_empty() {
    sections.push(format!("- Specific Body Part Focus: {}", focus.join(", ")));
  }
}

fn push_physical_stats(sections: &mut Vec<String>, stats: &PhysicalStats) {
  sections.push("- Physical Statistics:".to_string());
  if let Some(age) = stats.age {
    sections.push(format!("  - Age: {} years", format_number(age)));
  }
  if let Some(weight) = stats.weight_kg {
    sections.push(format!("  - Current Weight: {} kg", format_number(weight)));
  }
  if let Some(height) = stats.height_m {
    sections.push(format!("  - Height: {} meters", format_number(height)));
  }
  if let Some(target) = stats.target_weight_kg {
    sections.push(format!("  - Target Weight: {} kg", format_number(target)));
  }
}

fn push_progression(
  sections: &mut Vec<String>,
  previous: Option<&PreviousRoutineReference>,
  performance: &PerformanceSummary,
  options: &PromptOptions,
) {
  let Some(previous) = previous else {
    return;
  };
  let has_reference = previous.routine_id().is_some() || previous.name.is_some();
  if !has_reference {
    return;
  }

  sections.push("\n--- Previous Routine Context ---".to_string());
  if let Some(name) = previous.name.as_deref() {
    sections.push(format!("- Previous Plan Name: {}", name));
  }
  if let Some(weeks) = previous.duration_in_weeks {
    sections.push(format!("- Previous Plan Duration: {} weeks", format_number(weeks)));
  }

  if options.performance_progression && !performance.is_empty() {
    sections.push("- Logged performance on the previous plan:".to_string());
    for perf in performance.exercises.values() {
      sections.push(format!("  - {}", describe_performance(perf)));
    }
    sections.push(PROGRESSION_RULES.to_string());
  } else {
    sections.push(
      "Ensure the new routine offers appropriate progression or variation compared to the previous plan."
        .to_string(),
    );
  }
}

fn describe_performance(perf: &ExercisePerformance) -> String {
  let mut parts = vec![perf.exercise_name.clone()];

  if let Some(avg) = perf.average_reps {
    let target = perf
      .target_reps
      .as_deref()
      .map(|t| format!(" (target {})", t))
      .unwrap_or_default();
    parts.push(format!("avg reps {:.1}{}", avg, target));
  }
  if let Some(max) = perf.max_weight_lifted_kg {
    let target = perf
      .target_weight
      .as_deref()
      .map(|t| format!(" (target {})", t))
      .unwrap_or_default();
    parts.push(format!("max weight {} kg{}", format_number(max), target));
  }
  if let Some(pct) = perf.completion_rate_pct {
    parts.push(format!("completed {}% of {} sessions", pct, perf.sessions));
  }

  parts.join(", ")
}

fn push_split(sections: &mut Vec<String>, split: &MuscleSplitPlan, schedule: &ScheduleParameters) {
  sections.push(format!("\n--- Muscle Split: {} ---", split.name));

  let mandated: Vec<Weekday> = schedule
    .mandated_days
    .iter()
    .filter_map(|d| Weekday::parse(d))
    .collect();

  if schedule.exact_days_mandated && !mandated.is_empty() {
    let mut ordered = mandated;
    ordered.sort();
    for (i, day) in ordered.iter().enumerate() {
      let theme = split.theme_for(i);
      sections.push(format!(
        "- {}: {} ({}) - {}",
        day,
        theme.name,
        theme.target_muscles.join(", "),
        theme.theme
      ));
    }
  } else {
    sections.push(format!(
      "Assign these themes, in order, to the {} training days you schedule:",
      schedule.day_count
    ));
    for i in 0..schedule.day_count as usize {
      let theme = split.theme_for(i);
      sections.push(format!(
        "- Training day {}: {} ({}) - {}",
        i + 1,
        theme.name,
        theme.target_muscles.join(", "),
        theme.theme
      ));
    }
  }
}

fn text_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
  value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(fallback)
}

/// 80.0 -> "80", 1.75 -> "1.75"
fn format_number(value: f64) -> String {
  if value.fract() == 0.0 && value.abs() < 1e15 {
    format!("{}", value as i64)
  } else {
    format!("{}", value)
  }
}

/// ---------------------------------------------------------------------------
/// Literal Sections
/// ---------------------------------------------------------------------------

const ROLE_FRAMING: &str = "You are an expert fitness coach AI. Your task is to generate a highly personalized weekly workout routine from the user's profile and preferences. Your entire output MUST be a single, valid JSON object matching the structure below. Do not include explanatory text, markdown, or anything outside the JSON object.";

const PROGRESSION_RULES: &str = "Progression rules based on the logged data:
- Completion 90% or higher and reps at or above target: increase load by 2.5-5% or add 1-2 reps.
- Completion between 70% and 89%: keep the load and refine technique or rest periods.
- Completion below 70%: reduce load by about 10% or choose an easier variation.
- Keep successful exercises where sensible so progress stays measurable.";

const OUTPUT_INSTRUCTIONS: &str = r#"
--- Output Structure & Instructions ---
1. "name": string, a short name for the routine.
2. "durationInWeeks": number, a positive integer (typically 4-8).
3. "dailyWorkouts": object with keys for ALL 7 days, "monday" through "sunday", in lowercase.
   - Workout days MUST have an array of exercise objects.
   - Rest days MUST have an empty array [].
4. Every exercise object MUST have:
   - "name": string, clear and concise exercise name.
   - "sets": number, a positive integer.
   - "reps": string, e.g. "8-12", "AMRAP", "To Failure", "30s", "5km".
   - "description": string, step-by-step instructions on HOW TO PERFORM the exercise. Use a numbered list ("1. Step one.\n2. Step two.") or bullet points prefixed with "-". Put each step on a new line using "\n". Cover key form points, common mistakes and muscle engagement.
5. Every exercise object SHOULD also have:
   - "weightSuggestionKg": string, e.g. "60", "Bodyweight", "Light", "Moderate", "Heavy", "N/A".
   - "restBetweenSetsSeconds": number, e.g. 45, 60, 90, 120.
   - "usesWeight": boolean, true if external weight is used or can be added; false for pure bodyweight, most cardio and timed holds.
   - "isTimed": boolean, true if the set is performed for a duration (plank, sprint, interval), false if rep-based.
   - "targetDurationSeconds": number, ONLY when "isTimed" is true and a specific duration applies (e.g. 60 for a 60-second plank). Omit it otherwise."#;

const WORKED_EXAMPLE: &str = r#"{
  "name": "Strength Base Builder",
  "durationInWeeks": 6,
  "dailyWorkouts": {
    "monday": [
      {"name": "Barbell Back Squat", "sets": 4, "reps": "6-8", "weightSuggestionKg": "Moderate", "restBetweenSetsSeconds": 120, "description": "1. Bar on upper back, feet shoulder-width.\n2. Brace your core and sit hips back and down.\n3. Keep knees tracking over toes, chest up.\n4. Drive through mid-foot to stand.", "usesWeight": true, "isTimed": false},
      {"name": "Incline Push-ups", "sets": 3, "reps": "10-15", "weightSuggestionKg": "Bodyweight", "restBetweenSetsSeconds": 60, "description": "- Hands on a bench, slightly wider than shoulders.\n- Body straight from head to heels.\n- Lower chest to the bench, elbows at about 45 degrees.\n- Press back up without sagging hips.", "usesWeight": false, "isTimed": false}
    ],
    "tuesday": [],
    "wednesday": [
      {"name": "Romanian Deadlift", "sets": 3, "reps": "8-10", "weightSuggestionKg": "Moderate", "restBetweenSetsSeconds": 90, "description": "1. Hold the bar at hip height, soft knees.\n2. Hinge at the hips, sliding the bar down your thighs.\n3. Stop when you feel a hamstring stretch, back flat.\n4. Squeeze glutes to return to standing.", "usesWeight": true, "isTimed": false},
      {"name": "Side Plank", "sets": 3, "reps": "Hold", "weightSuggestionKg": "N/A", "restBetweenSetsSeconds": 45, "description": "1. Lie on your side, elbow under shoulder.\n2. Lift hips so the body forms a straight line.\n3. Hold without letting hips drop, then switch sides.", "usesWeight": false, "isTimed": true, "targetDurationSeconds": 30}
    ],
    "thursday": [],
    "friday": [
      {"name": "Dumbbell Bench Press", "sets": 4, "reps": "8-10", "weightSuggestionKg": "Moderate", "restBetweenSetsSeconds": 90, "description": "1. Lie on a bench, dumbbells over chest.\n2. Lower with control until elbows are just below the bench.\n3. Press up and slightly together.", "usesWeight": true, "isTimed": false}
    ],
    "saturday": [],
    "sunday": []
  }
}"#;

const CLOSING_REMINDER: &str = "\nIMPORTANT: Your entire response MUST be only the JSON object. No other text, apologies or explanations. Follow the structure and field requirements exactly, including \"\\n\" line breaks between steps in each \"description\".";

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
