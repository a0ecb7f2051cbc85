//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Factories for sets, workouts, progress entries and meals

use crate::models::{ExerciseEntry, FoodItem, Meal, ProgressEntry, Workout, WorkoutSet};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Data Factories
/// ---------------------------------------------------------------------------

pub fn make_set(reps: u32, weight: f64, completed: bool) -> WorkoutSet {
  WorkoutSet {
    completed,
    ..WorkoutSet::new(reps, weight)
  }
}

/// In-progress workout with the given exercises and sets
pub fn make_workout(date: DateTime<Utc>, exercises: &[(&str, Vec<WorkoutSet>)]) -> Workout {
  Workout {
    id: Uuid::new_v4().to_string(),
    name: "Test Workout".to_string(),
    date,
    exercises: exercises
      .iter()
      .map(|(id, sets)| ExerciseEntry::new(*id, sets.clone()))
      .collect(),
    duration: None,
    completed: false,
  }
}

pub fn make_completed_workout(date: DateTime<Utc>, exercises: &[(&str, Vec<WorkoutSet>)]) -> Workout {
  Workout {
    completed: true,
    ..make_workout(date, exercises)
  }
}

pub fn make_entry(exercise_id: &str, date: DateTime<Utc>, max_weight: f64, total_volume: f64) -> ProgressEntry {
  ProgressEntry {
    date,
    exercise_id: exercise_id.to_string(),
    max_weight,
    total_volume,
    workout_id: None,
  }
}

pub fn make_food(calories: f64, protein: f64, carbs: f64, fats: f64) -> FoodItem {
  FoodItem {
    id: Uuid::new_v4().to_string(),
    name: "Test Food".to_string(),
    serving: 100.0,
    serving_unit: "g".to_string(),
    calories,
    protein,
    carbs,
    fats,
  }
}

pub fn make_meal(name: &str, foods: Vec<FoodItem>) -> Meal {
  Meal {
    id: Uuid::new_v4().to_string(),
    name: name.to_string(),
    time: "12:00".to_string(),
    foods,
  }
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name = 'kv_store'"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 1);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_factories_create_valid_data() {
    let set = make_set(5, 225.0, true);
    assert!(set.completed);
    assert_eq!(set.volume(), 1125.0);

    let workout = make_completed_workout(Utc::now(), &[("squat", vec![set])]);
    assert!(workout.completed);
    assert_eq!(workout.exercises[0].exercise_id, "squat");

    let a = make_meal("lunch", vec![]);
    let b = make_meal("lunch", vec![]);
    assert_ne!(a.id, b.id);
  }
}
