use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::template::WorkoutTemplate;

/// Sets pre-filled when an exercise is added to a workout
const DEFAULT_SET_COUNT: usize = 3;
const DEFAULT_REPS: u32 = 10;

pub(crate) fn new_id() -> String {
  Uuid::new_v4().to_string()
}

/// Weights must be finite and non-negative to be stored
pub fn is_valid_weight(weight: f64) -> bool {
  weight.is_finite() && weight >= 0.0
}

/// One lift attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
  pub id: String,
  pub reps: u32,
  pub weight: f64,
  pub completed: bool,
}

impl WorkoutSet {
  pub fn new(reps: u32, weight: f64) -> Self {
    Self {
      id: new_id(),
      reps,
      weight,
      completed: false,
    }
  }

  /// Volume contributed by this set (zero unless completed)
  pub fn volume(&self) -> f64 {
    if self.completed {
      self.weight * self.reps as f64
    } else {
      0.0
    }
  }
}

/// One exercise performed within a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
  pub id: String,
  pub exercise_id: String,
  pub sets: Vec<WorkoutSet>,
  #[serde(default)]
  pub notes: Option<String>,
}

impl ExerciseEntry {
  pub fn new(exercise_id: impl Into<String>, sets: Vec<WorkoutSet>) -> Self {
    Self {
      id: new_id(),
      exercise_id: exercise_id.into(),
      sets,
      notes: None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
  pub id: String,
  pub name: String,
  pub date: DateTime<Utc>,
  pub exercises: Vec<ExerciseEntry>,
  /// Session length in seconds, when tracked
  #[serde(default)]
  pub duration: Option<i64>,
  pub completed: bool,
}

impl Workout {
  /// Start a new session. Returns None for a blank name.
  pub fn start(name: &str, date: DateTime<Utc>) -> Option<Self> {
    let name = name.trim();
    if name.is_empty() {
      return None;
    }

    Some(Self {
      id: new_id(),
      name: name.to_string(),
      date,
      exercises: Vec::new(),
      duration: None,
      completed: false,
    })
  }

  /// Start a session from a template: one entry per template exercise with
  /// the target sets and reps at weight 0
  pub fn from_template(template: &WorkoutTemplate, date: DateTime<Utc>) -> Self {
    let exercises = template
      .exercises
      .iter()
      .map(|t| {
        let sets = (0..t.sets).map(|_| WorkoutSet::new(t.reps, 0.0)).collect();
        ExerciseEntry::new(t.exercise_id.as_str(), sets)
      })
      .collect();

    Self {
      id: new_id(),
      name: template.name.clone(),
      date,
      exercises,
      duration: None,
      completed: false,
    }
  }

  /// Snapshot with the exercise appended, pre-filled with 3 x 10 at weight 0
  pub fn with_exercise(&self, exercise_id: &str) -> Self {
    self.edited(|w| {
      let sets = (0..DEFAULT_SET_COUNT)
        .map(|_| WorkoutSet::new(DEFAULT_REPS, 0.0))
        .collect();
      w.exercises.push(ExerciseEntry::new(exercise_id, sets));
    })
  }

  pub fn without_exercise(&self, index: usize) -> Self {
    self.edited(|w| {
      if index < w.exercises.len() {
        w.exercises.remove(index);
      }
    })
  }

  /// Snapshot with one more set, copying reps/weight from the last set
  pub fn with_added_set(&self, exercise_index: usize) -> Self {
    self.edited(|w| {
      if let Some(entry) = w.exercises.get_mut(exercise_index) {
        let (reps, weight) = entry
          .sets
          .last()
          .map(|s| (s.reps, s.weight))
          .unwrap_or((DEFAULT_REPS, 0.0));
        entry.sets.push(WorkoutSet::new(reps, weight));
      }
    })
  }

  /// Non-finite or negative weights are ignored
  pub fn with_updated_set(
    &self,
    exercise_index: usize,
    set_index: usize,
    reps: u32,
    weight: f64,
  ) -> Self {
    if !is_valid_weight(weight) {
      return self.clone();
    }
    self.edited(|w| {
      if let Some(set) = w.set_mut(exercise_index, set_index) {
        set.reps = reps;
        set.weight = weight;
      }
    })
  }

  pub fn with_toggled_set(&self, exercise_index: usize, set_index: usize) -> Self {
    self.edited(|w| {
      if let Some(set) = w.set_mut(exercise_index, set_index) {
        set.completed = !set.completed;
      }
    })
  }

  /// Mark the workout completed. A workout with no exercises cannot be finished.
  pub fn finish(&self) -> Option<Self> {
    if self.exercises.is_empty() {
      return None;
    }
    let mut finished = self.clone();
    finished.completed = true;
    Some(finished)
  }

  pub fn has_valid_weights(&self) -> bool {
    self
      .exercises
      .iter()
      .flat_map(|e| e.sets.iter())
      .all(|s| is_valid_weight(s.weight))
  }

  /// First entry for the given exercise, if it was performed
  pub fn entry_for(&self, exercise_id: &str) -> Option<&ExerciseEntry> {
    self.exercises.iter().find(|e| e.exercise_id == exercise_id)
  }

  fn set_mut(&mut self, exercise_index: usize, set_index: usize) -> Option<&mut WorkoutSet> {
    self
      .exercises
      .get_mut(exercise_index)
      .and_then(|e| e.sets.get_mut(set_index))
  }

  // Completed workouts are historical records; edits leave them untouched.
  fn edited(&self, edit: impl FnOnce(&mut Workout)) -> Self {
    let mut next = self.clone();
    if !next.completed {
      edit(&mut next);
    }
    next
  }
}
