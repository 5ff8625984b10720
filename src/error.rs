//! Error taxonomy surfaced to callers of the routine endpoint.
//!
//! Every failure the handler returns is one of four classified codes. Provider
//! specific failures are first captured as [`GenerationError`] at the client
//! boundary and converted here, so nothing downstream inspects provider shapes.

use serde::ser::SerializeStruct;
use serde::Serialize;
use thiserror::Error;

use crate::llm::GenerationError;

pub type Result<T> = std::result::Result<T, RoutineError>;

/// ---------------------------------------------------------------------------
/// Routine Errors
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutineError {
  /// Missing caller identity, or the provider rejected our credential
  #[error("{0}")]
  Unauthenticated(String),

  /// Malformed or missing request payload
  #[error("{0}")]
  InvalidArgument(String),

  /// Generation was blocked by the provider's safety filter
  #[error("{0}")]
  Aborted(String),

  /// Provider unreachable, unusable response, or configuration problem
  #[error("{message}")]
  Internal {
    message: String,
    details: Option<String>,
  },
}

impl RoutineError {
  pub fn internal(message: impl Into<String>) -> Self {
    Self::Internal {
      message: message.into(),
      details: None,
    }
  }

  pub fn internal_with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
    Self::Internal {
      message: message.into(),
      details: Some(details.into()),
    }
  }

  /// Wire code for this error class
  pub fn code(&self) -> &'static str {
    match self {
      Self::Unauthenticated(_) => "unauthenticated",
      Self::InvalidArgument(_) => "invalid-argument",
      Self::Aborted(_) => "aborted",
      Self::Internal { .. } => "internal",
    }
  }

  pub fn details(&self) -> Option<&str> {
    match self {
      Self::Internal { details, .. } => details.as_deref(),
      _ => None,
    }
  }
}

impl Serialize for RoutineError {
  fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    let details = self.details();
    let len = if details.is_some() { 3 } else { 2 };
    let mut state = serializer.serialize_struct("RoutineError", len)?;
    state.serialize_field("code", self.code())?;
    state.serialize_field("message", &self.to_string())?;
    if let Some(details) = details {
      state.serialize_field("details", details)?;
    }
    state.end()
  }
}

impl From<GenerationError> for RoutineError {
  fn from(err: GenerationError) -> Self {
    match err {
      GenerationError::MissingApiKey => {
        Self::internal("AI Service API Key configuration error (secret missing).")
      }
      GenerationError::Blocked(reason) => Self::Aborted(format!(
        "AI content generation was blocked: {}. Please try rephrasing your request or check content policies.",
        reason
      )),
      GenerationError::Empty => Self::internal(
        "AI service returned an unexpected or empty response. Please try again later.",
      ),
      GenerationError::InvalidCredential(_) => Self::Unauthenticated(
        "AI service authentication failed. Please check API key configuration.".to_string(),
      ),
      GenerationError::Transport(message)
      | GenerationError::Api(message)
      | GenerationError::Parse(message) => Self::internal_with_details(
        "Failed to communicate with the AI service. Please try again later.",
        message,
      ),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
