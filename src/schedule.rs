//! Scheduling-parameter resolution
//!
//! Turns the onboarding frequency range and optional explicit weekday list
//! into a definitive number of training days, and decides whether those exact
//! weekdays are mandatory. The result drives both the prompt and the post-hoc
//! reconciliation of the generated schedule.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::Weekday;

pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 7;
pub const DEFAULT_DAYS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleParameters {
  /// Resolved training days per week, always within [1, 7]
  pub day_count: u32,
  /// True when the user's explicit weekdays must be used exactly
  pub exact_days_mandated: bool,
  /// Lowercased explicit weekdays; populated only when mandated
  pub mandated_days: Vec<String>,
  /// Lowercased explicit weekdays kept as a soft preference when not mandated
  pub preferred_days: Vec<String>,
}

/// Inclusive (min, max) parsed from "N" or "N-M"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyRange {
  pub min: u32,
  pub max: u32,
}

impl FrequencyRange {
  /// Parse a frequency string
  ///
  /// Non-numeric or zero parts fall back to 1 so a malformed range can never
  /// produce a zero-day schedule. Returns None for blank input.
  pub fn parse(raw: &str) -> Option<Self> {
    let raw = raw.trim();
    if raw.is_empty() {
      return None;
    }

    let mut parts = raw.splitn(2, '-').map(parse_part);
    let min = parts.next().flatten().unwrap_or(1);
    let max = parts.next().flatten().unwrap_or(min);

    Some(Self {
      min,
      max: max.max(min),
    })
  }

  pub fn contains(&self, count: u32) -> bool {
    count >= self.min && count <= self.max
  }
}

fn parse_part(part: &str) -> Option<u32> {
  part.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

/// Canonical lowercase weekday names in first-seen order; duplicates and
/// names that are not weekdays are dropped
pub fn normalize_day_list(days: &[String]) -> Vec<String> {
  let mut seen: Vec<String> = Vec::with_capacity(days.len());
  for raw in days {
    match Weekday::parse(raw) {
      Some(day) if !seen.iter().any(|d| d == day.as_str()) => seen.push(day.as_str().to_string()),
      Some(_) => {}
      None if raw.trim().is_empty() => {}
      None => warn!(day = %raw, "Ignoring unrecognized weekday"),
    }
  }
  seen
}

/// Resolve scheduling parameters from the onboarding frequency and weekdays
pub fn resolve(frequency: Option<&str>, explicit_days: &[String]) -> ScheduleParameters {
  let days = normalize_day_list(explicit_days);
  let selected = days.len() as u32;

  let (day_count, mandated) = match frequency.and_then(FrequencyRange::parse) {
    Some(range) if selected > 0 && range.contains(selected) => {
      info!(
        selected,
        frequency = ?frequency,
        days = %days.join(", "),
        "Selected days fit the frequency range; requiring exactly these days"
      );
      (selected, true)
    }
    Some(range) if selected > 0 => {
      info!(
        selected,
        frequency = ?frequency,
        days = %days.join(", "),
        "Selected days fall outside the frequency range; using max of range with days as preference"
      );
      (range.max.min(MAX_DAYS), false)
    }
    Some(range) => {
      info!(frequency = ?frequency, "No specific days selected; using max of frequency range");
      (range.max.min(MAX_DAYS), false)
    }
    None if selected > 0 => {
      warn!(selected, "Frequency not specified; adopting the selected days");
      (selected, true)
    }
    None => {
      warn!("Frequency not specified; defaulting to {} workout days", DEFAULT_DAYS);
      (DEFAULT_DAYS, false)
    }
  };

  let day_count = day_count.clamp(MIN_DAYS, MAX_DAYS);

  let (mandated_days, preferred_days) = if mandated {
    (days, Vec::new())
  } else {
    (Vec::new(), days)
  };

  ScheduleParameters {
    day_count,
    exact_days_mandated: mandated,
    mandated_days,
    preferred_days,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
