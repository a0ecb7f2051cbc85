//! Barbell plate loading
//!
//! Greedy per-side breakdown of a target bar weight into plate denominations.
//! Greedy is minimal for the two canonical plate lists below; it is not
//! guaranteed minimal for arbitrary denominations.

use serde::{Deserialize, Serialize};

const LBS_PLATES: [f64; 6] = [45.0, 35.0, 25.0, 10.0, 5.0, 2.5];
const KG_PLATES: [f64; 7] = [25.0, 20.0, 15.0, 10.0, 5.0, 2.5, 1.25];

/// Counts at or above 2^64 can't be represented
const MAX_PLATE_COUNT: f64 = u64::MAX as f64;

const LBS_BAR: f64 = 45.0;
const KG_BAR: f64 = 20.0;

// ---------------------------------------------------------------------------
/// Unit: lbs or kg, each with its own plate list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    #[default]
    Lbs,
    Kg,
}

impl Unit {
    /// Canonical plates, heaviest first
    pub fn denominations(&self) -> &'static [f64] {
        resolve_denominations(*self)
    }

    /// Standard bar for the unit
    pub fn default_bar_weight(&self) -> f64 {
        match self {
            Self::Lbs => LBS_BAR,
            Self::Kg => KG_BAR,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lbs => write!(f, "lbs"),
            Self::Kg => write!(f, "kg"),
        }
    }
}

impl std::str::FromStr for Unit {
    type Err = PlateError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lbs" => Ok(Self::Lbs),
            "kg" => Ok(Self::Kg),
            _ => Err(PlateError::UnknownUnit(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlateError {
    #[error("Unknown unit: {0} (expected lbs or kg)")]
    UnknownUnit(String),
}

impl Serialize for PlateError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Static plate table for a unit
pub fn resolve_denominations(unit: Unit) -> &'static [f64] {
    match unit {
        Unit::Lbs => &LBS_PLATES,
        Unit::Kg => &KG_PLATES,
    }
}

// ---------------------------------------------------------------------------
/// Plate Load: solver output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateCount {
    pub weight: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateLoad {
    /// Plates for one side, heaviest first, only denominations actually used
    pub plates: Vec<PlateCount>,
    /// Per-side weight the plates could not cover, rounded to 2 decimals
    pub residue: f64,
    pub per_side: f64,
}

impl PlateLoad {
    /// True when the user must be warned that the target can't be loaded exactly
    pub fn has_residue(&self) -> bool {
        self.residue > 0.0
    }

    /// Bar plus both sides of what was actually loaded
    pub fn loaded_total(&self, bar: f64) -> f64 {
        let per_side: f64 = self.plates.iter().map(|p| p.weight * p.count as f64).sum();
        bar + per_side * 2.0
    }
}

/// Greedy breakdown of `target` into plates per side.
///
/// Returns None when no plates are needed (`target <= bar`), either
/// weight is not a finite number, or a plate count would not fit in a u64.
pub fn solve_plate_load(target: f64, bar: f64, denominations: &[f64]) -> Option<PlateLoad> {
    if !target.is_finite() || !bar.is_finite() || target <= bar {
        return None;
    }

    let per_side = (target - bar) / 2.0;
    let mut remaining = per_side;
    let mut plates = Vec::new();

    for &plate in denominations.iter().filter(|d| **d > 0.0) {
        let count = (remaining / plate).floor();
        if count >= MAX_PLATE_COUNT {
            return None;
        }
        let count = count as u64;
        if count > 0 {
            plates.push(PlateCount { weight: plate, count });
            remaining -= plate * count as f64;
        }
    }

    Some(PlateLoad {
        plates,
        residue: round_hundredths(remaining),
        per_side,
    })
}

/// Parse a weight typed into a form field. Blank, non-numeric and
/// non-finite text all give None.
pub fn parse_weight(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|w| w.is_finite())
}

/// Solve from raw form text. Unparsable input is "no plan", same as target <= bar.
pub fn solve_plate_input(target: &str, bar: &str, unit: Unit) -> Option<PlateLoad> {
    let target = parse_weight(target)?;
    let bar = parse_weight(bar)?;
    solve_plate_load(target, bar, unit.denominations())
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
