//! Training log service
//!
//! Wires the pure metrics, progress and plate modules to a key-value store.
//! Each collection lives under one key as a JSON document:
//! - `@workouts`: every saved workout
//! - `@progress_data`: append-only progress entries
//! - `@personal_records`: current record per exercise
//! - `@nutrition_data`: day logs keyed by date
//! - `@settings`: unit and bar weight
//! - `@workout_templates`: saved workout templates
//!
//! Every load-modify-save sequence runs under one write lock, so concurrent
//! callers on a shared log never drop each other's writes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::db::{KeyValueStore, StoreError};
use crate::metrics::{
    evaluate_personal_record, evaluate_workout_records, progress_entries_for_workout,
    RecordBook, RecordDecision,
};
use crate::models::workout::is_valid_weight;
use crate::models::{DailyNutrition, Meal, ProgressEntry, Workout, WorkoutTemplate};
use crate::plates::{parse_weight, solve_plate_load, PlateLoad, Unit};
use crate::progress::{
    chart_points, filter_and_sort_by_exercise, summarize_progress, ChartPoint, ProgressMetric,
    ProgressSummary,
};

const WORKOUTS_KEY: &str = "@workouts";
const PROGRESS_KEY: &str = "@progress_data";
const RECORDS_KEY: &str = "@personal_records";
const NUTRITION_KEY: &str = "@nutrition_data";
const SETTINGS_KEY: &str = "@settings";
const TEMPLATES_KEY: &str = "@workout_templates";

type NutritionLog = BTreeMap<NaiveDate, DailyNutrition>;

// ---------------------------------------------------------------------------
/// Errors and Settings
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Add at least one exercise to save the workout")]
    EmptyWorkout,

    #[error("This workout has already been completed")]
    AlreadyCompleted,

    #[error("Set weights must be non-negative numbers")]
    InvalidWeight,

    #[error("Bar weight must be a non-negative number, got {0}")]
    InvalidBarWeight(f64),

    #[error("Please enter a template name")]
    BlankTemplateName,

    #[error("Add at least one exercise to save the template")]
    EmptyTemplate,
}

impl Serialize for LogError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub unit: Unit,
    pub bar_weight: f64,
}

impl UserSettings {
    fn from_config(config: &AppConfig) -> Self {
        Self {
            unit: config.unit,
            bar_weight: config.bar_weight,
        }
    }
}

/// What finishing a workout produced
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReport {
    pub workout: Workout,
    pub entries: Vec<ProgressEntry>,
    /// Exercises that set a new personal record
    pub new_records: Vec<String>,
}

// ---------------------------------------------------------------------------
/// Training Log
// ---------------------------------------------------------------------------

pub struct TrainingLog<S: KeyValueStore> {
    store: S,
    config: AppConfig,
    write_lock: Mutex<()>,
}

/// Insert or replace by id
fn upsert_workout(workouts: &mut Vec<Workout>, workout: &Workout) {
    match workouts.iter_mut().find(|w| w.id == workout.id) {
        Some(existing) => *existing = workout.clone(),
        None => workouts.push(workout.clone()),
    }
}

impl<S: KeyValueStore> TrainingLog<S> {
    pub fn new(store: S, config: AppConfig) -> Self {
        Self {
            store,
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    async fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, LogError> {
        match self.store.get(key).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                StoreError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                }
                .into()
            }),
            None => Ok(T::default()),
        }
    }

    async fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), LogError> {
        let raw = serde_json::to_string(value).map_err(StoreError::from)?;
        self.store.set(key, &raw).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Workouts
    // -----------------------------------------------------------------------

    /// All saved workouts, newest first
    pub async fn workouts(&self) -> Result<Vec<Workout>, LogError> {
        let mut workouts: Vec<Workout> = self.load(WORKOUTS_KEY).await?;
        workouts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(workouts)
    }

    /// Insert or replace by id. A completed workout can't be replaced by an
    /// open copy of itself.
    pub async fn save_workout(&self, workout: &Workout) -> Result<(), LogError> {
        if !workout.has_valid_weights() {
            return Err(LogError::InvalidWeight);
        }

        let _guard = self.write_lock.lock().await;
        let mut workouts: Vec<Workout> = self.load(WORKOUTS_KEY).await?;
        let reopens = workouts
            .iter()
            .any(|w| w.id == workout.id && w.completed && !workout.completed);
        if reopens {
            return Err(LogError::AlreadyCompleted);
        }

        upsert_workout(&mut workouts, workout);
        self.save(WORKOUTS_KEY, &workouts).await?;

        debug!(workout_id = %workout.id, "saved workout");
        Ok(())
    }

    pub async fn delete_workout(&self, workout_id: &str) -> Result<(), LogError> {
        let _guard = self.write_lock.lock().await;
        let mut workouts: Vec<Workout> = self.load(WORKOUTS_KEY).await?;
        workouts.retain(|w| w.id != workout_id);
        self.save(WORKOUTS_KEY, &workouts).await
    }

    /// Finish a workout: mark it completed, persist it, append one progress
    /// entry per exercise and fold its sets into the personal records.
    ///
    /// Progress and records are written before the workout itself. If a write
    /// fails the workout stays open, and completing it again replaces any
    /// progress entries the failed attempt left behind.
    pub async fn complete_workout(&self, workout: &Workout) -> Result<CompletionReport, LogError> {
        if workout.completed {
            return Err(LogError::AlreadyCompleted);
        }
        if !workout.has_valid_weights() {
            return Err(LogError::InvalidWeight);
        }
        let finished = workout.finish().ok_or(LogError::EmptyWorkout)?;

        let _guard = self.write_lock.lock().await;
        let mut workouts: Vec<Workout> = self.load(WORKOUTS_KEY).await?;
        if workouts.iter().any(|w| w.id == finished.id && w.completed) {
            return Err(LogError::AlreadyCompleted);
        }

        let entries = progress_entries_for_workout(&finished);
        let mut progress: Vec<ProgressEntry> = self.load(PROGRESS_KEY).await?;
        let before = progress.len();
        progress.retain(|e| e.workout_id.as_deref() != Some(finished.id.as_str()));
        if progress.len() != before {
            warn!(workout_id = %finished.id, "replacing progress from an unfinished completion");
        }
        progress.extend(entries.iter().cloned());

        let book: RecordBook = self.load(RECORDS_KEY).await?;
        let outcome = evaluate_workout_records(&book, &finished);
        upsert_workout(&mut workouts, &finished);

        self.save(PROGRESS_KEY, &progress).await?;
        if !outcome.new_records.is_empty() {
            self.save(RECORDS_KEY, &outcome.records).await?;
        }
        self.save(WORKOUTS_KEY, &workouts).await?;

        info!(
            workout_id = %finished.id,
            entries = entries.len(),
            new_records = outcome.new_records.len(),
            "completed workout"
        );

        Ok(CompletionReport {
            workout: finished,
            entries,
            new_records: outcome.new_records,
        })
    }

    // -----------------------------------------------------------------------
    // Progress
    // -----------------------------------------------------------------------

    /// Full history in insertion order
    pub async fn progress_entries(&self) -> Result<Vec<ProgressEntry>, LogError> {
        self.load(PROGRESS_KEY).await
    }

    pub async fn append_progress_entry(&self, entry: ProgressEntry) -> Result<(), LogError> {
        if !is_valid_weight(entry.max_weight) || !is_valid_weight(entry.total_volume) {
            return Err(LogError::InvalidWeight);
        }

        let _guard = self.write_lock.lock().await;
        let mut progress: Vec<ProgressEntry> = self.load(PROGRESS_KEY).await?;
        progress.push(entry);
        self.save(PROGRESS_KEY, &progress).await
    }

    /// One exercise's history, oldest first
    pub async fn progress_for_exercise(
        &self,
        exercise_id: &str,
    ) -> Result<Vec<ProgressEntry>, LogError> {
        let all = self.progress_entries().await?;
        Ok(filter_and_sort_by_exercise(&all, exercise_id))
    }

    pub async fn progress_summary(
        &self,
        exercise_id: &str,
    ) -> Result<Option<ProgressSummary>, LogError> {
        let series = self.progress_for_exercise(exercise_id).await?;
        Ok(summarize_progress(&series))
    }

    /// Chart points over the configured window
    pub async fn chart_series(
        &self,
        exercise_id: &str,
        metric: ProgressMetric,
    ) -> Result<Vec<ChartPoint>, LogError> {
        let series = self.progress_for_exercise(exercise_id).await?;
        Ok(chart_points(&series, self.config.chart_window, metric))
    }

    // -----------------------------------------------------------------------
    // Personal Records
    // -----------------------------------------------------------------------

    pub async fn personal_records(&self) -> Result<RecordBook, LogError> {
        self.load(RECORDS_KEY).await
    }

    /// Check a just-completed set and persist it when it is a new record
    pub async fn record_completed_set(
        &self,
        exercise_id: &str,
        weight: f64,
        reps: u32,
        date: DateTime<Utc>,
    ) -> Result<RecordDecision, LogError> {
        if !is_valid_weight(weight) {
            return Err(LogError::InvalidWeight);
        }

        let _guard = self.write_lock.lock().await;
        let mut book = self.personal_records().await?;
        let decision = evaluate_personal_record(book.get(exercise_id), exercise_id, weight, reps, date);

        if decision.is_new_record {
            book.insert(exercise_id.to_string(), decision.updated_record.clone());
            self.save(RECORDS_KEY, &book).await?;
            info!(exercise_id, weight, reps, "new personal record");
        }

        Ok(decision)
    }

    // -----------------------------------------------------------------------
    // Nutrition
    // -----------------------------------------------------------------------

    /// Day log, empty when nothing was logged
    pub async fn nutrition_for(&self, date: NaiveDate) -> Result<DailyNutrition, LogError> {
        let log: NutritionLog = self.load(NUTRITION_KEY).await?;
        Ok(log
            .get(&date)
            .cloned()
            .unwrap_or_else(|| DailyNutrition::empty(date)))
    }

    pub async fn save_meal(&self, date: NaiveDate, meal: Meal) -> Result<DailyNutrition, LogError> {
        self.update_day(date, |day| day.with_meal(meal)).await
    }

    pub async fn delete_meal(
        &self,
        date: NaiveDate,
        meal_id: &str,
    ) -> Result<DailyNutrition, LogError> {
        self.update_day(date, |day| day.without_meal(meal_id)).await
    }

    async fn update_day(
        &self,
        date: NaiveDate,
        edit: impl FnOnce(&DailyNutrition) -> DailyNutrition,
    ) -> Result<DailyNutrition, LogError> {
        let _guard = self.write_lock.lock().await;
        let mut log: NutritionLog = self.load(NUTRITION_KEY).await?;
        let current = log
            .get(&date)
            .cloned()
            .unwrap_or_else(|| DailyNutrition::empty(date));

        let updated = edit(&current);
        log.insert(date, updated.clone());
        self.save(NUTRITION_KEY, &log).await?;
        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Settings and Plate Math
    // -----------------------------------------------------------------------

    /// Stored settings, falling back to the configured defaults
    pub async fn settings(&self) -> Result<UserSettings, LogError> {
        let stored: Option<UserSettings> = self.load(SETTINGS_KEY).await?;
        Ok(stored.unwrap_or_else(|| UserSettings::from_config(&self.config)))
    }

    pub async fn save_settings(&self, settings: &UserSettings) -> Result<(), LogError> {
        if !is_valid_weight(settings.bar_weight) {
            return Err(LogError::InvalidBarWeight(settings.bar_weight));
        }
        self.save(SETTINGS_KEY, settings).await
    }

    /// Plate breakdown for a target typed into the set-weight form, using the
    /// stored unit and bar. Unparsable text is "no plan".
    pub async fn plate_load(&self, target: &str) -> Result<Option<PlateLoad>, LogError> {
        let settings = self.settings().await?;
        let load = parse_weight(target)
            .and_then(|t| solve_plate_load(t, settings.bar_weight, settings.unit.denominations()));
        Ok(load)
    }

    // -----------------------------------------------------------------------
    // Templates
    // -----------------------------------------------------------------------

    /// Saved templates in the order they were first saved
    pub async fn templates(&self) -> Result<Vec<WorkoutTemplate>, LogError> {
        self.load(TEMPLATES_KEY).await
    }

    /// Insert or replace by id
    pub async fn save_template(&self, template: &WorkoutTemplate) -> Result<(), LogError> {
        if !template.has_name() {
            return Err(LogError::BlankTemplateName);
        }
        if template.exercises.is_empty() {
            return Err(LogError::EmptyTemplate);
        }

        let _guard = self.write_lock.lock().await;
        let mut templates: Vec<WorkoutTemplate> = self.load(TEMPLATES_KEY).await?;
        match templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template.clone(),
            None => templates.push(template.clone()),
        }
        self.save(TEMPLATES_KEY, &templates).await?;

        debug!(template_id = %template.id, "saved template");
        Ok(())
    }

    pub async fn delete_template(&self, template_id: &str) -> Result<(), LogError> {
        let _guard = self.write_lock.lock().await;
        let mut templates: Vec<WorkoutTemplate> = self.load(TEMPLATES_KEY).await?;
        templates.retain(|t| t.id != template_id);
        self.save(TEMPLATES_KEY, &templates).await
    }

    /// New open workout built from a saved template. Nothing is persisted
    /// until the workout is saved or completed.
    pub async fn start_from_template(
        &self,
        template_id: &str,
        date: DateTime<Utc>,
    ) -> Result<Option<Workout>, LogError> {
        let templates = self.templates().await?;
        Ok(templates
            .iter()
            .find(|t| t.id == template_id)
            .map(|t| Workout::from_template(t, date)))
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
