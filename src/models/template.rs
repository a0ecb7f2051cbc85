use serde::{Deserialize, Serialize};

use super::workout::new_id;

/// Targets used when an exercise is added without explicit sets or reps
const DEFAULT_TARGET_SETS: u32 = 3;
const DEFAULT_TARGET_REPS: u32 = 10;

/// Target sets and reps for one exercise in a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateExercise {
  pub exercise_id: String,
  pub sets: u32,
  pub reps: u32,
}

/// Reusable workout plan saved by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTemplate {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub exercises: Vec<TemplateExercise>,
}

impl WorkoutTemplate {
  /// Empty template; `None` when the name is blank
  pub fn new(name: &str, description: &str) -> Option<Self> {
    let name = name.trim();
    if name.is_empty() {
      return None;
    }

    Some(Self {
      id: new_id(),
      name: name.to_string(),
      description: description.trim().to_string(),
      exercises: Vec::new(),
    })
  }

  /// Missing or zero targets fall back to 3 sets of 10
  pub fn with_exercise(&self, exercise_id: &str, sets: Option<u32>, reps: Option<u32>) -> Self {
    let mut next = self.clone();
    next.exercises.push(TemplateExercise {
      exercise_id: exercise_id.to_string(),
      sets: sets.filter(|s| *s > 0).unwrap_or(DEFAULT_TARGET_SETS),
      reps: reps.filter(|r| *r > 0).unwrap_or(DEFAULT_TARGET_REPS),
    });
    next
  }

  pub fn without_exercise(&self, index: usize) -> Self {
    let mut next = self.clone();
    if index < next.exercises.len() {
      next.exercises.remove(index);
    }
    next
  }

  pub fn has_name(&self) -> bool {
    !self.name.trim().is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_rejects_blank_name() {
    assert!(WorkoutTemplate::new("   ", "desc").is_none());

    let t = WorkoutTemplate::new("  Push Day ", " chest and triceps ").unwrap();
    assert_eq!(t.name, "Push Day");
    assert_eq!(t.description, "chest and triceps");
    assert!(t.exercises.is_empty());
  }

  #[test]
  fn test_exercise_targets_default_to_three_by_ten() {
    let t = WorkoutTemplate::new("Legs", "")
      .unwrap()
      .with_exercise("squat", Some(5), Some(5))
      .with_exercise("leg-press", None, Some(0))
      .with_exercise("lunge", Some(0), None);

    assert_eq!((t.exercises[0].sets, t.exercises[0].reps), (5, 5));
    assert_eq!((t.exercises[1].sets, t.exercises[1].reps), (3, 10));
    assert_eq!((t.exercises[2].sets, t.exercises[2].reps), (3, 10));

    let trimmed = t.without_exercise(1).without_exercise(9);
    let ids: Vec<&str> = trimmed.exercises.iter().map(|e| e.exercise_id.as_str()).collect();
    assert_eq!(ids, vec!["squat", "lunge"]);
  }

  #[test]
  fn test_serializes_camel_case() {
    let t = WorkoutTemplate::new("Pull", "").unwrap().with_exercise("deadlift", None, None);
    let json = serde_json::to_value(&t).unwrap();

    assert_eq!(json["exercises"][0]["exerciseId"], "deadlift");
    assert_eq!(json["exercises"][0]["sets"], 3);

    let stored = r#"{"id":"t1","name":"Old"}"#;
    let parsed: WorkoutTemplate = serde_json::from_str(stored).unwrap();
    assert!(parsed.exercises.is_empty());
    assert_eq!(parsed.description, "");
  }
}
