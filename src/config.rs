//! Runtime configuration
//!
//! Everything comes from the process environment. Local runs (emulator, CLI,
//! tests) also read a `.env` file; deployed runs get the provider credential
//! from a mounted secret file or a plain environment variable.

use std::env;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::prompt::PromptOptions;
use crate::validate::ValidationMode;

/// ---------------------------------------------------------------------------
/// Environment Keys & Defaults
/// ---------------------------------------------------------------------------

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEMINI_API_KEY_FILE_ENV: &str = "GEMINI_API_KEY_FILE";
const EMULATOR_ENV: &str = "FUNCTIONS_EMULATOR";
const RUNTIME_ENV: &str = "ROUTINE_RUNTIME";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://routine-logs.db?mode=rwc";

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to read secret file {path}: {source}")]
  SecretFile {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Invalid value for {key}: {value}")]
  InvalidValue { key: String, value: String },
}

/// ---------------------------------------------------------------------------
/// Config
/// ---------------------------------------------------------------------------

/// Where the process is running, which decides how the credential is found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
  /// Emulator, CLI or test run: `.env` file plus environment
  Local,
  /// Deployed function: secret file or environment
  Deployed,
}

#[derive(Debug, Clone)]
pub struct Config {
  pub runtime: RuntimeMode,
  pub api_key: Option<String>,
  pub model: String,
  pub api_base_url: String,
  pub temperature: f32,
  pub database_url: String,
  pub validation_mode: ValidationMode,
  pub prompt: PromptOptions,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      runtime: RuntimeMode::Local,
      api_key: None,
      model: DEFAULT_MODEL.to_string(),
      api_base_url: DEFAULT_API_BASE_URL.to_string(),
      temperature: DEFAULT_TEMPERATURE,
      database_url: DEFAULT_DATABASE_URL.to_string(),
      validation_mode: ValidationMode::default(),
      prompt: PromptOptions::default(),
    }
  }
}

impl Config {
  /// Load configuration from the environment
  ///
  /// A missing credential is not an error here; it is reported when the
  /// generation client is first needed.
  pub fn from_env() -> Result<Self, ConfigError> {
    let runtime = detect_runtime();

    let api_key = match runtime {
      RuntimeMode::Local => {
        dotenvy::dotenv().ok();
        info!("Running locally, reading {} from environment/.env", GEMINI_API_KEY_ENV);
        let key = non_empty_var(GEMINI_API_KEY_ENV);
        if key.is_none() {
          warn!(
            "{} not found for local run; routine generation will fail until it is set in .env",
            GEMINI_API_KEY_ENV
          );
        }
        key
      }
      RuntimeMode::Deployed => {
        info!("Running deployed, reading provider credential from secret");
        match non_empty_var(GEMINI_API_KEY_FILE_ENV) {
          Some(path) => read_secret_file(PathBuf::from(path))?,
          None => non_empty_var(GEMINI_API_KEY_ENV),
        }
      }
    };

    let temperature = match non_empty_var("GEMINI_TEMPERATURE") {
      Some(raw) => raw
        .parse::<f32>()
        .ok()
        .filter(|t| (0.0..=2.0).contains(t))
        .ok_or_else(|| ConfigError::InvalidValue {
          key: "GEMINI_TEMPERATURE".into(),
          value: raw.clone(),
        })?,
      None => DEFAULT_TEMPERATURE,
    };

    let validation_mode = match non_empty_var("ROUTINE_VALIDATION_MODE") {
      Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
        key: "ROUTINE_VALIDATION_MODE".into(),
        value: raw.clone(),
      })?,
      None => ValidationMode::default(),
    };

    let prompt = PromptOptions {
      muscle_split: bool_var("ROUTINE_MUSCLE_SPLIT", true)?,
      performance_progression: bool_var("ROUTINE_PERFORMANCE_PROGRESSION", true)?,
      ..PromptOptions::default()
    };

    Ok(Self {
      runtime,
      api_key,
      model: non_empty_var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
      api_base_url: non_empty_var("GEMINI_API_BASE_URL")
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
      temperature,
      database_url: non_empty_var("DATABASE_URL")
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
      validation_mode,
      prompt,
    })
  }
}

fn detect_runtime() -> RuntimeMode {
  let emulator = env::var(EMULATOR_ENV).map(|v| v == "true").unwrap_or(false);
  let local = env::var(RUNTIME_ENV)
    .map(|v| v.eq_ignore_ascii_case("local"))
    .unwrap_or(false);

  if emulator || local {
    RuntimeMode::Local
  } else {
    RuntimeMode::Deployed
  }
}

fn non_empty_var(key: &str) -> Option<String> {
  env::var(key)
    .ok()
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

fn bool_var(key: &str, default: bool) -> Result<bool, ConfigError> {
  let Some(raw) = non_empty_var(key) else {
    return Ok(default);
  };
  match raw.to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Ok(true),
    "0" | "false" | "no" | "off" => Ok(false),
    _ => Err(ConfigError::InvalidValue {
      key: key.to_string(),
      value: raw,
    }),
  }
}

fn read_secret_file(path: PathBuf) -> Result<Option<String>, ConfigError> {
  let contents = fs::read_to_string(&path).map_err(|source| ConfigError::SecretFile {
    path: path.clone(),
    source,
  })?;
  let key = contents.trim();
  Ok((!key.is_empty()).then(|| key.to_string()))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
