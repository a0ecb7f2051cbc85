//! Day-level nutrition totals

use chrono::NaiveDate;

use crate::models::{DailyNutrition, MacroTotals, Meal};

/// Sum calories and macros over every food of every meal
pub fn calculate_day_totals(meals: &[Meal]) -> MacroTotals {
  meals
    .iter()
    .flat_map(|m| m.foods.iter())
    .fold(MacroTotals::default(), |mut totals, food| {
      totals.calories += food.calories;
      totals.protein += food.protein;
      totals.carbs += food.carbs;
      totals.fats += food.fats;
      totals
    })
}

/// Share of a daily goal reached, 0 when no goal is set
pub fn macro_percentage(value: f64, goal: f64) -> f64 {
  if goal > 0.0 {
    value / goal * 100.0
  } else {
    0.0
  }
}

impl DailyNutrition {
  pub fn empty(date: NaiveDate) -> Self {
    Self {
      date,
      meals: Vec::new(),
      totals: MacroTotals::default(),
    }
  }

  /// Insert or replace the meal (matched by id) and recompute totals
  pub fn with_meal(&self, meal: Meal) -> Self {
    let mut meals = self.meals.clone();
    match meals.iter_mut().find(|m| m.id == meal.id) {
      Some(existing) => *existing = meal,
      None => meals.push(meal),
    }
    self.with_meals(meals)
  }

  pub fn without_meal(&self, meal_id: &str) -> Self {
    let meals = self
      .meals
      .iter()
      .filter(|m| m.id != meal_id)
      .cloned()
      .collect();
    self.with_meals(meals)
  }

  fn with_meals(&self, meals: Vec<Meal>) -> Self {
    Self {
      date: self.date,
      totals: calculate_day_totals(&meals),
      meals,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{make_food, make_meal};

  fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
  }

  #[test]
  fn test_day_totals_sum_all_foods() {
    let meals = vec![
      make_meal("breakfast", vec![make_food(400.0, 30.0, 40.0, 10.0), make_food(100.0, 5.0, 10.0, 2.0)]),
      make_meal("lunch", vec![make_food(650.0, 45.0, 60.0, 20.0)]),
    ];

    let totals = calculate_day_totals(&meals);
    assert_eq!(totals.calories, 1150.0);
    assert_eq!(totals.protein, 80.0);
    assert_eq!(totals.carbs, 110.0);
    assert_eq!(totals.fats, 32.0);

    assert_eq!(calculate_day_totals(&[]), MacroTotals::default());
  }

  #[test]
  fn test_with_meal_upserts_and_recomputes() {
    let breakfast = make_meal("breakfast", vec![make_food(400.0, 30.0, 40.0, 10.0)]);
    let log = DailyNutrition::empty(day()).with_meal(breakfast.clone());
    assert_eq!(log.totals.calories, 400.0);

    let mut bigger = breakfast.clone();
    bigger.foods.push(make_food(200.0, 10.0, 20.0, 5.0));
    let log = log.with_meal(bigger);

    assert_eq!(log.meals.len(), 1);
    assert_eq!(log.totals.calories, 600.0);
    assert_eq!(log.totals.fats, 15.0);
  }

  #[test]
  fn test_without_meal() {
    let breakfast = make_meal("breakfast", vec![make_food(400.0, 30.0, 40.0, 10.0)]);
    let lunch = make_meal("lunch", vec![make_food(650.0, 45.0, 60.0, 20.0)]);
    let log = DailyNutrition::empty(day()).with_meal(breakfast.clone()).with_meal(lunch);

    let log = log.without_meal(&breakfast.id);
    assert_eq!(log.meals.len(), 1);
    assert_eq!(log.totals.calories, 650.0);
  }

  #[test]
  fn test_macro_percentage() {
    assert_eq!(macro_percentage(75.0, 150.0), 50.0);
    assert_eq!(macro_percentage(75.0, 0.0), 0.0);
  }
}
