use std::env;

use crate::plates::Unit;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_DATABASE_URL: &str = "sqlite://strength-log.db?mode=rwc";
const DEFAULT_CHART_WINDOW: usize = 10;
const DEFAULT_LOG_LEVEL: &str = "info";

const DATABASE_URL_VAR: &str = "STRENGTH_LOG_DATABASE_URL";
const UNIT_VAR: &str = "STRENGTH_LOG_UNIT";
const BAR_WEIGHT_VAR: &str = "STRENGTH_LOG_BAR_WEIGHT";
const CHART_WINDOW_VAR: &str = "STRENGTH_LOG_CHART_WINDOW";
const LOG_LEVEL_VAR: &str = "STRENGTH_LOG_LOG_LEVEL";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
  #[error("Invalid value for {var}: {value}")]
  InvalidValue { var: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub database_url: String,
  pub unit: Unit,
  pub bar_weight: f64,
  /// Entries shown on progress charts
  pub chart_window: usize,
  pub log_level: String,
}

impl Default for AppConfig {
  fn default() -> Self {
    let unit = Unit::default();
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      unit,
      bar_weight: unit.default_bar_weight(),
      chart_window: DEFAULT_CHART_WINDOW,
      log_level: DEFAULT_LOG_LEVEL.to_string(),
    }
  }
}

impl AppConfig {
  /// Load `.env` if present, then read overrides from the environment
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();

    let unit = match env::var(UNIT_VAR) {
      Ok(value) => value.parse::<Unit>().map_err(|_| invalid(UNIT_VAR, &value))?,
      Err(_) => Unit::default(),
    };

    let bar_weight = match env::var(BAR_WEIGHT_VAR) {
      Ok(value) => match value.trim().parse::<f64>() {
        Ok(w) if w.is_finite() && w >= 0.0 => w,
        _ => return Err(invalid(BAR_WEIGHT_VAR, &value)),
      },
      Err(_) => unit.default_bar_weight(),
    };

    let chart_window = match env::var(CHART_WINDOW_VAR) {
      Ok(value) => match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => return Err(invalid(CHART_WINDOW_VAR, &value)),
      },
      Err(_) => DEFAULT_CHART_WINDOW,
    };

    Ok(Self {
      database_url: env::var(DATABASE_URL_VAR).unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
      unit,
      bar_weight,
      chart_window,
      log_level: env::var(LOG_LEVEL_VAR).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
    })
  }
}

fn invalid(var: &str, value: &str) -> ConfigError {
  ConfigError::InvalidValue {
    var: var.to_string(),
    value: value.to_string(),
  }
}
