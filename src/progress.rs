//! Per-exercise progress series and trend summaries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ProgressEntry;

/// Entries for one exercise, oldest first. Entries sharing a date keep
/// their insertion order.
pub fn filter_and_sort_by_exercise(entries: &[ProgressEntry], exercise_id: &str) -> Vec<ProgressEntry> {
  let mut series: Vec<ProgressEntry> = entries
    .iter()
    .filter(|e| e.exercise_id == exercise_id)
    .cloned()
    .collect();

  // sort_by_key is stable
  series.sort_by_key(|e| e.date);
  series
}

/// Distinct exercise ids in the order they were first logged
pub fn tracked_exercises(entries: &[ProgressEntry]) -> Vec<String> {
  let mut ids: Vec<String> = Vec::new();
  for entry in entries {
    if !ids.contains(&entry.exercise_id) {
      ids.push(entry.exercise_id.clone());
    }
  }
  ids
}

/// First-to-last change over a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
  pub weight_change: f64,
  pub weight_percent: f64,
  pub volume_change: f64,
  pub volume_percent: f64,
  pub workout_count: usize,
}

/// Summarize a chronologically sorted series.
///
/// Returns None with fewer than two entries, since there is no trend yet.
/// Percentages are 0 when the baseline is 0.
pub fn summarize_progress(series: &[ProgressEntry]) -> Option<ProgressSummary> {
  if series.len() < 2 {
    return None;
  }
  let first = series.first()?;
  let last = series.last()?;

  let weight_change = last.max_weight - first.max_weight;
  let volume_change = last.total_volume - first.total_volume;

  Some(ProgressSummary {
    weight_change,
    weight_percent: percent_of(weight_change, first.max_weight),
    volume_change,
    volume_percent: percent_of(volume_change, first.total_volume),
    workout_count: series.len(),
  })
}

fn percent_of(change: f64, baseline: f64) -> f64 {
  if baseline > 0.0 {
    change / baseline * 100.0
  } else {
    0.0
  }
}

/// Last `n` entries of the series, or all of it when shorter
pub fn windowed_series(series: &[ProgressEntry], n: usize) -> &[ProgressEntry] {
  &series[series.len().saturating_sub(n)..]
}

/// Which aggregate a chart plots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgressMetric {
  MaxWeight,
  TotalVolume,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
  pub date: DateTime<Utc>,
  pub value: f64,
}

/// Project the last `window` entries onto one metric
pub fn chart_points(series: &[ProgressEntry], window: usize, metric: ProgressMetric) -> Vec<ChartPoint> {
  windowed_series(series, window)
    .iter()
    .map(|e| ChartPoint {
      date: e.date,
      value: match metric {
        ProgressMetric::MaxWeight => e.max_weight,
        ProgressMetric::TotalVolume => e.total_volume,
      },
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::make_entry;
  use chrono::Duration;

  #[test]
  fn test_filter_and_sort_orders_by_date() {
    let now = Utc::now();
    let entries = vec![
      make_entry("squat", now, 120.0, 1500.0),
      make_entry("bench-press", now - Duration::days(5), 95.0, 800.0),
      make_entry("squat", now - Duration::days(10), 100.0, 1000.0),
    ];

    let series = filter_and_sort_by_exercise(&entries, "squat");
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].max_weight, 100.0);
    assert_eq!(series[1].max_weight, 120.0);

    assert!(filter_and_sort_by_exercise(&entries, "deadlift").is_empty());
    assert!(filter_and_sort_by_exercise(&[], "squat").is_empty());
  }

  #[test]
  fn test_same_date_keeps_insertion_order() {
    let day = Utc::now();
    let entries = vec![
      make_entry("squat", day, 1.0, 10.0),
      make_entry("squat", day - Duration::days(1), 0.5, 5.0),
      make_entry("squat", day, 2.0, 20.0),
    ];

    let series = filter_and_sort_by_exercise(&entries, "squat");
    let weights: Vec<f64> = series.iter().map(|e| e.max_weight).collect();
    assert_eq!(weights, vec![0.5, 1.0, 2.0]);
  }

  #[test]
  fn test_filter_and_sort_is_idempotent() {
    let now = Utc::now();
    let entries = vec![
      make_entry("squat", now, 120.0, 1500.0),
      make_entry("squat", now - Duration::days(10), 100.0, 1000.0),
      make_entry("squat", now, 125.0, 900.0),
    ];

    let once = filter_and_sort_by_exercise(&entries, "squat");
    let twice = filter_and_sort_by_exercise(&once, "squat");
    assert_eq!(once, twice);
  }

  #[test]
  fn test_summary_needs_two_entries() {
    assert!(summarize_progress(&[]).is_none());
    let single = vec![make_entry("squat", Utc::now(), 100.0, 1000.0)];
    assert!(summarize_progress(&single).is_none());
  }

  #[test]
  fn test_summary_changes_and_percentages() {
    let now = Utc::now();
    let series = vec![
      make_entry("squat", now - Duration::days(14), 100.0, 1000.0),
      make_entry("squat", now - Duration::days(7), 90.0, 1200.0),
      make_entry("squat", now, 120.0, 1500.0),
    ];

    let summary = summarize_progress(&series).unwrap();
    assert_eq!(summary.weight_change, 20.0);
    assert_eq!(summary.weight_percent, 20.0);
    assert_eq!(summary.volume_change, 500.0);
    assert_eq!(summary.volume_percent, 50.0);
    assert_eq!(summary.workout_count, 3);
  }

  #[test]
  fn test_summary_zero_baseline() {
    let now = Utc::now();
    let series = vec![
      make_entry("squat", now - Duration::days(7), 0.0, 0.0),
      make_entry("squat", now, 50.0, 400.0),
    ];

    let summary = summarize_progress(&series).unwrap();
    assert_eq!(summary.weight_change, 50.0);
    assert_eq!(summary.weight_percent, 0.0);
    assert_eq!(summary.volume_percent, 0.0);
  }

  #[test]
  fn test_windowed_series_takes_suffix() {
    let now = Utc::now();
    let series: Vec<ProgressEntry> = (0..12)
      .map(|i| make_entry("squat", now + Duration::days(i), i as f64, 0.0))
      .collect();

    let window = windowed_series(&series, 10);
    assert_eq!(window.len(), 10);
    assert_eq!(window[0].max_weight, 2.0);
    assert_eq!(window[9].max_weight, 11.0);

    assert_eq!(windowed_series(&series[..3], 10).len(), 3);
    assert!(windowed_series(&series, 0).is_empty());
  }

  #[test]
  fn test_chart_points_and_tracked_exercises() {
    let now = Utc::now();
    let entries = vec![
      make_entry("squat", now - Duration::days(2), 100.0, 1000.0),
      make_entry("bench-press", now - Duration::days(1), 80.0, 640.0),
      make_entry("squat", now, 110.0, 1100.0),
    ];

    assert_eq!(tracked_exercises(&entries), vec!["squat", "bench-press"]);

    let series = filter_and_sort_by_exercise(&entries, "squat");
    let points = chart_points(&series, 1, ProgressMetric::TotalVolume);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].value, 1100.0);
    assert_eq!(points[0].date, now);
  }
}
