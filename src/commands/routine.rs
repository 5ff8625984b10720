//! Routine generation request handler

use serde_json::Value;
use tracing::{error, info, warn};

use crate::db::AppState;
use crate::error::{Result, RoutineError};
use crate::models::{GeneratedRoutine, RoutineRequest};
use crate::performance::{self, PerformanceSummary};
use crate::prompt::{self, PromptContext};
use crate::validate::ValidationMode;
use crate::{schedule, split, validate};

/// Identity of the caller as established by the hosting platform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
  pub uid: Option<String>,
}

impl CallerContext {
  pub fn authenticated(uid: impl Into<String>) -> Self {
    Self {
      uid: Some(uid.into()),
    }
  }

  pub fn anonymous() -> Self {
    Self::default()
  }

  fn user_id(&self) -> Option<&str> {
    self.uid.as_deref().map(str::trim).filter(|u| !u.is_empty())
  }
}

/// Generate a weekly routine for an authenticated caller
///
/// Checks run in order: generator configuration, caller identity, payload.
/// Every failure is returned as one classified [`RoutineError`].
pub async fn generate_ai_routine(
  state: &AppState,
  caller: &CallerContext,
  payload: Value,
) -> Result<GeneratedRoutine> {
  let generator = state.generator.get_or_init(&state.config).await.map_err(|e| {
    error!(error = %e, "Generation client unavailable");
    RoutineError::from(e)
  })?;

  let user_id = caller.user_id().ok_or_else(|| {
    warn!("Rejected unauthenticated routine request");
    RoutineError::Unauthenticated("The function must be called while authenticated.".to_string())
  })?;

  let request = parse_request(payload)?;
  let profile = &request.onboarding_data;
  let previous = request.previous_routine_data.as_ref();

  info!(
    user_id,
    has_previous = previous.is_some(),
    "Generating AI routine"
  );

  let schedule = schedule::resolve(profile.frequency.as_deref(), profile.workout_days());

  let options = &state.config.prompt;
  let split = options
    .muscle_split
    .then(|| split::select(schedule.day_count, profile.experience_level()));

  let performance = if options.performance_progression {
    performance::aggregate(&state.db, user_id, previous).await
  } else {
    PerformanceSummary::default()
  };

  let prompt = prompt::compose(
    &PromptContext {
      profile,
      schedule: &schedule,
      split,
      previous,
      performance: &performance,
    },
    options,
  );
  info!(user_id, prompt_len = prompt.len(), day_count = schedule.day_count, "Prompt composed");

  let raw = generator.generate(&prompt).await.map_err(|e| {
    error!(user_id, error = %e, "Routine generation failed");
    RoutineError::from(e)
  })?;

  let mode = state.config.validation_mode;
  let routine = validate::normalize(&raw, mode)?;
  let outcome = validate::reconcile(&routine, &schedule);
  if mode == ValidationMode::Strict && !outcome.is_agreement() {
    error!(user_id, outcome = %outcome, "Generated schedule rejected in strict mode");
    return Err(RoutineError::internal_with_details(
      "AI response did not follow the requested schedule. Please try again.",
      outcome.to_string(),
    ));
  }

  info!(user_id, routine = %routine.name, "Routine generated");
  Ok(routine)
}

/// Require a non-empty `onboardingData` object and decode the payload
fn parse_request(payload: Value) -> Result<RoutineRequest> {
  let has_onboarding = payload
    .get("onboardingData")
    .and_then(Value::as_object)
    .is_some_and(|o| !o.is_empty());

  if !has_onboarding {
    warn!("Routine request missing onboarding data");
    return Err(RoutineError::InvalidArgument(
      "Onboarding data is required.".to_string(),
    ));
  }

  serde_json::from_value(payload).map_err(|e| {
    warn!(error = %e, "Routine request payload is malformed");
    RoutineError::InvalidArgument(format!("Invalid routine request: {}", e))
  })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
