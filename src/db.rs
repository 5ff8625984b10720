use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::Config;
use crate::llm::GeneratorSlot;

pub type DbPool = SqlitePool;

/// Shared state handed to every request
pub struct AppState {
  pub db: DbPool,
  pub config: Config,
  pub generator: GeneratorSlot,
}

impl AppState {
  /// State with a lazily initialized generation client
  pub fn new(db: DbPool, config: Config) -> Self {
    Self {
      db,
      config,
      generator: GeneratorSlot::new(),
    }
  }
}

/// Connect to the workout log store and run migrations
pub async fn initialize_db(database_url: &str) -> Result<DbPool, sqlx::Error> {
  info!(database_url, "Initializing workout log store");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  info!("Workout log store ready");

  Ok(pool)
}
