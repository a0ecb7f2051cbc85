//! Deterministic aggregation layer for logged sets
//!
//! Turns the sets of a finished workout into progress entries and decides
//! whether a completed set beats the stored personal record. Everything here
//! is a pure function over its inputs; persistence lives in `training_log`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{PersonalRecord, ProgressEntry, RecordLift, Workout, WorkoutSet};

/// Personal records keyed by exercise id
pub type RecordBook = BTreeMap<String, PersonalRecord>;

/// ---------------------------------------------------------------------------
/// Set Aggregates
/// ---------------------------------------------------------------------------

/// Heaviest completed set, or 0 when nothing was completed
pub fn compute_max_weight(sets: &[WorkoutSet]) -> f64 {
  sets
    .iter()
    .filter(|s| s.completed)
    .fold(0.0, |max, s| if s.weight > max { s.weight } else { max })
}

/// Sum of weight x reps over completed sets
pub fn compute_total_volume(sets: &[WorkoutSet]) -> f64 {
  sets.iter().map(WorkoutSet::volume).sum()
}

/// Total volume across every exercise in the workout
pub fn workout_volume(workout: &Workout) -> f64 {
  workout
    .exercises
    .iter()
    .map(|e| compute_total_volume(&e.sets))
    .sum()
}

/// ---------------------------------------------------------------------------
/// Progress Entries
/// ---------------------------------------------------------------------------

/// Build the progress entry for one exercise of a workout.
///
/// Uses the first entry matching `exercise_id`. Returns None when the
/// exercise was not performed, in which case nothing should be persisted.
pub fn build_progress_entry(workout: &Workout, exercise_id: &str) -> Option<ProgressEntry> {
  let entry = workout.entry_for(exercise_id)?;

  Some(ProgressEntry {
    date: workout.date,
    exercise_id: exercise_id.to_string(),
    max_weight: compute_max_weight(&entry.sets),
    total_volume: compute_total_volume(&entry.sets),
    workout_id: Some(workout.id.clone()),
  })
}

/// One progress entry per distinct exercise, in the order exercises first appear
pub fn progress_entries_for_workout(workout: &Workout) -> Vec<ProgressEntry> {
  let mut seen: Vec<&str> = Vec::new();
  let mut entries = Vec::new();

  for exercise in &workout.exercises {
    let id = exercise.exercise_id.as_str();
    if seen.contains(&id) {
      continue;
    }
    seen.push(id);

    if let Some(entry) = build_progress_entry(workout, id) {
      entries.push(entry);
    }
  }

  entries
}

/// ---------------------------------------------------------------------------
/// Personal Records
/// ---------------------------------------------------------------------------

/// Outcome of checking a completed set against the current record.
///
/// `updated_record` always carries the triggering set; callers persist it
/// only when `is_new_record` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDecision {
  pub exercise_id: String,
  pub is_new_record: bool,
  pub updated_record: PersonalRecord,
}

/// A set is a new record when there is no record yet or its weight is
/// strictly heavier. Equal weight keeps the existing record.
pub fn evaluate_personal_record(
  current: Option<&PersonalRecord>,
  exercise_id: &str,
  weight: f64,
  reps: u32,
  date: DateTime<Utc>,
) -> RecordDecision {
  let is_new_record = match current {
    None => true,
    Some(record) => weight > record.max_weight.weight,
  };

  RecordDecision {
    exercise_id: exercise_id.to_string(),
    is_new_record,
    updated_record: PersonalRecord {
      max_weight: RecordLift { weight, reps },
      date,
    },
  }
}

/// Result of folding a whole workout into the record book
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutRecords {
  pub records: RecordBook,
  /// Exercises that set a new record, in first-hit order
  pub new_records: Vec<String>,
}

/// Run every completed set of the workout, in order, through
/// [`evaluate_personal_record`]. The input book is not modified.
pub fn evaluate_workout_records(records: &RecordBook, workout: &Workout) -> WorkoutRecords {
  let mut book = records.clone();
  let mut new_records: Vec<String> = Vec::new();

  for entry in &workout.exercises {
    for set in entry.sets.iter().filter(|s| s.completed) {
      let decision = evaluate_personal_record(
        book.get(&entry.exercise_id),
        &entry.exercise_id,
        set.weight,
        set.reps,
        workout.date,
      );

      if decision.is_new_record {
        if !new_records.contains(&decision.exercise_id) {
          new_records.push(decision.exercise_id.clone());
        }
        book.insert(decision.exercise_id, decision.updated_record);
      }
    }
  }

  WorkoutRecords {
    records: book,
    new_records,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
