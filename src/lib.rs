pub mod config;
pub mod db;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod nutrition;
pub mod plates;
pub mod progress;
pub mod training_log;

#[cfg(test)]
mod test_utils;

pub use config::{AppConfig, ConfigError};
pub use db::{KeyValueStore, MemoryStore, SqliteStore, StoreError};
pub use metrics::{
  build_progress_entry, compute_max_weight, compute_total_volume, evaluate_personal_record,
  RecordBook, RecordDecision,
};
pub use models::WorkoutTemplate;
pub use plates::{parse_weight, resolve_denominations, solve_plate_load, PlateError, PlateLoad, Unit};
pub use progress::{filter_and_sort_by_exercise, summarize_progress, windowed_series, ProgressSummary};
pub use training_log::{CompletionReport, LogError, TrainingLog, UserSettings};

use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Store(#[from] StoreError),
}

/// Read configuration from the environment, install logging and open the
/// SQLite-backed training log.
pub async fn start() -> Result<TrainingLog<SqliteStore>, StartupError> {
  let config = AppConfig::from_env()?;
  logging::init_logging(&config.log_level);

  let store = db::initialize_store(&config.database_url).await?;
  info!(unit = %config.unit, "training log ready");

  Ok(TrainingLog::new(store, config))
}
