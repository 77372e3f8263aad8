use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical field names that can carry an issue annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Id,
    Timestamp,
    FoodName,
    Serving,
    Macros,
    Calories,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Serving {
    pub amount: f64,
    pub unit: String,
}

/// Macronutrients in grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Macros {
    /// Atwater 4-4-9 estimate in kcal.
    pub fn atwater_kcal(&self) -> f64 {
        4.0 * self.protein + 4.0 * self.carbs + 9.0 * self.fat
    }

    pub fn any_negative(&self) -> bool {
        self.protein < 0.0 || self.carbs < 0.0 || self.fat < 0.0
    }
}

/// Per-field findings. Each category is a set, so a field is listed at most once per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issues {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub invalid: BTreeSet<Field>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub unknown: BTreeSet<Field>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub inconsistent: BTreeSet<Field>,
}

impl Issues {
    pub fn is_empty(&self) -> bool {
        self.invalid.is_empty() && self.unknown.is_empty() && self.inconsistent.is_empty()
    }

    pub fn mark_invalid(&mut self, field: Field) {
        self.invalid.insert(field);
    }

    pub fn mark_unknown(&mut self, field: Field) {
        self.unknown.insert(field);
    }

    pub fn mark_inconsistent(&mut self, field: Field) {
        self.inconsistent.insert(field);
    }
}

/// Shape-independent nutrition log entry.
///
/// `calories` is the source's declared value; `None` means the source declared nothing
/// and serializes as `null`. `issues` is omitted from JSON entirely when it has no findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEntry {
    pub id: String,
    pub timestamp: String,
    pub food_name: String,
    pub serving: Serving,
    pub macros: Macros,
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Issues::is_empty")]
    pub issues: Issues,
}
