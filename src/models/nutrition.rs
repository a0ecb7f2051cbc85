use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
  pub id: String,
  pub name: String,
  pub serving: f64,
  pub serving_unit: String,
  pub calories: f64,
  pub protein: f64,
  pub carbs: f64,
  pub fats: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
  pub id: String,
  pub name: String,
  /// Time of day as entered, e.g. "08:30"
  pub time: String,
  pub foods: Vec<FoodItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroTotals {
  pub calories: f64,
  pub protein: f64,
  pub carbs: f64,
  pub fats: f64,
}

/// Everything logged for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyNutrition {
  pub date: NaiveDate,
  pub meals: Vec<Meal>,
  pub totals: MacroTotals,
}
