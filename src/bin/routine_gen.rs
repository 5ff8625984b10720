use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use routine_coach::{
  generate_ai_routine, initialize_db, logging, AppState, CallerContext, Config, RoutineError,
  ValidationMode,
};
use tracing::error;

#[derive(Parser)]
#[command(name = "routine-gen")]
#[command(about = "Generate a weekly workout routine from an onboarding request", long_about = None)]
struct Cli {
  /// JSON request file with onboardingData and optional previousRoutineData
  #[arg(long)]
  request: PathBuf,

  /// Caller identity used for authentication and log lookups
  #[arg(long)]
  user_id: String,

  /// Abort on the first invalid exercise instead of repairing it
  #[arg(long)]
  strict: bool,

  /// Override the workout log database
  #[arg(long)]
  database_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
  logging::init();

  let cli = Cli::parse();

  match run(cli).await {
    Ok(json) => {
      println!("{}", json);
      ExitCode::SUCCESS
    }
    Err(err) => {
      let body = serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string());
      eprintln!("{}", body);
      ExitCode::FAILURE
    }
  }
}

async fn run(cli: Cli) -> Result<String, RoutineError> {
  let mut config = Config::from_env().map_err(|e| {
    error!(error = %e, "Failed to load configuration");
    RoutineError::internal_with_details("Configuration error.", e.to_string())
  })?;
  if cli.strict {
    config.validation_mode = ValidationMode::Strict;
  }
  if let Some(url) = cli.database_url {
    config.database_url = url;
  }

  let raw = std::fs::read_to_string(&cli.request).map_err(|e| {
    RoutineError::InvalidArgument(format!("Cannot read {}: {}", cli.request.display(), e))
  })?;
  let payload: serde_json::Value = serde_json::from_str(&raw)
    .map_err(|e| RoutineError::InvalidArgument(format!("Request is not valid JSON: {}", e)))?;

  let db = initialize_db(&config.database_url).await.map_err(|e| {
    error!(error = %e, "Failed to open workout log store");
    RoutineError::internal_with_details("Failed to open workout log store.", e.to_string())
  })?;

  let state = AppState::new(db, config);
  let routine = generate_ai_routine(&state, &CallerContext::authenticated(cli.user_id), payload).await?;

  serde_json::to_string_pretty(&routine)
    .map_err(|e| RoutineError::internal_with_details("Failed to encode routine.", e.to_string()))
}
