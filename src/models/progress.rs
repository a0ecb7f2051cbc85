use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-exercise aggregate for one completed workout. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
  pub date: DateTime<Utc>,
  pub exercise_id: String,
  pub max_weight: f64,
  pub total_volume: f64,
  /// Workout the entry was derived from
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub workout_id: Option<String>,
}

/// The set that holds a record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordLift {
  pub weight: f64,
  pub reps: u32,
}

/// Current best for one exercise. Overwritten in place, no history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRecord {
  pub max_weight: RecordLift,
  pub date: DateTime<Utc>,
}
