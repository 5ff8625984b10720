//! AI workout routine generation
//!
//! Onboarding profile in, validated seven-day routine out. The pipeline is
//! schedule resolution, muscle-split selection, performance aggregation over
//! the workout log store, prompt composition, one generation call, and
//! response normalization.

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod logging;
pub mod models;
pub mod performance;
pub mod prompt;
pub mod schedule;
pub mod split;
pub mod validate;

#[cfg(test)]
mod test_utils;

pub use commands::{generate_ai_routine, CallerContext};
pub use config::{Config, ConfigError};
pub use db::{initialize_db, AppState, DbPool};
pub use error::{Result, RoutineError};
pub use llm::{GeminiClient, GenerationError, GeneratorSlot, TextGenerator};
pub use models::{GeneratedRoutine, OnboardingProfile, RoutineRequest};
pub use validate::ValidationMode;
