pub mod nutrition;
pub mod progress;
pub mod template;
pub mod workout;

pub use nutrition::{DailyNutrition, FoodItem, MacroTotals, Meal};
pub use progress::{PersonalRecord, ProgressEntry, RecordLift};
pub use template::{TemplateExercise, WorkoutTemplate};
pub use workout::{ExerciseEntry, Workout, WorkoutSet};
