use super::model::{CanonicalEntry, Field};

/// Units accepted for `serving.unit`, compared case-insensitively.
pub const RECOGNIZED_UNITS: [&str; 3] = ["g", "ml", "tbsp"];

/// Runs every invariant check and appends `invalid` / `inconsistent` findings.
///
/// Checks never short-circuit and only add to the issue sets, so running this twice
/// over the same entry yields the same issues.
pub fn validate(mut entry: CanonicalEntry) -> CanonicalEntry {
    let issues = &mut entry.issues;

    let unit = entry.serving.unit.to_lowercase();
    if !RECOGNIZED_UNITS.contains(&unit.as_str()) {
        issues.mark_invalid(Field::Serving);
    }

    let amount = entry.serving.amount;
    if !(amount.is_finite() && amount > 0.0) {
        issues.mark_invalid(Field::Serving);
    }

    if entry.macros.any_negative() {
        issues.mark_invalid(Field::Macros);
    }

    // A null declaration is absence, not a contradiction.
    if let Some(declared) = entry.calories {
        if declared < 0.0 {
            issues.mark_invalid(Field::Calories);
        }
        if !calories_consistent(entry.macros.atwater_kcal(), declared) {
            issues.mark_inconsistent(Field::Calories);
        }
    }

    entry
}

/// Declared kcal must sit within a third of the Atwater estimate, either side.
pub fn calories_consistent(expected: f64, declared: f64) -> bool {
    expected.abs() / 3.0 >= (expected - declared).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::model::{Issues, Macros, Serving};

    fn entry(amount: f64, unit: &str, macros: Macros, calories: Option<f64>) -> CanonicalEntry {
        CanonicalEntry {
            id: "x".into(),
            timestamp: "t".into(),
            food_name: "Food".into(),
            serving: Serving { amount, unit: unit.into() },
            macros,
            calories,
            metadata: None,
            issues: Issues::default(),
        }
    }

    const MACROS: Macros = Macros { protein: 10.0, carbs: 20.0, fat: 5.0 }; // 165 kcal

    #[test]
    fn clean_entry_has_no_findings() {
        let e = validate(entry(100.0, "G", MACROS, Some(165.0)));
        assert!(e.issues.is_empty());
    }

    #[test]
    fn units_are_case_insensitive() {
        for unit in ["g", "ML", "Tbsp"] {
            assert!(validate(entry(1.0, unit, MACROS, None)).issues.is_empty());
        }
        let e = validate(entry(1.0, "cup", MACROS, None));
        assert!(e.issues.invalid.contains(&Field::Serving));
    }

    #[test]
    fn padded_units_are_not_recognized() {
        for unit in [" g ", "ml ", "\ttbsp"] {
            let e = validate(entry(1.0, unit, MACROS, None));
            assert!(e.issues.invalid.contains(&Field::Serving), "unit {:?}", unit);
        }
    }

    #[test]
    fn bad_amount_and_unit_collapse_to_one_finding() {
        let e = validate(entry(0.0, "scoop", MACROS, None));
        assert_eq!(e.issues.invalid.len(), 1);
        assert!(e.issues.invalid.contains(&Field::Serving));

        for amount in [-2.0, f64::NAN, f64::INFINITY] {
            let e = validate(entry(amount, "g", MACROS, None));
            assert!(e.issues.invalid.contains(&Field::Serving));
        }
    }

    #[test]
    fn negative_macros_are_invalid() {
        let macros = Macros { fat: -1.0, ..MACROS };
        let e = validate(entry(100.0, "g", macros, None));
        assert!(e.issues.invalid.contains(&Field::Macros));
    }

    #[test]
    fn negative_calories_are_invalid_and_inconsistent() {
        let e = validate(entry(100.0, "g", MACROS, Some(-165.0)));
        assert!(e.issues.invalid.contains(&Field::Calories));
        assert!(e.issues.inconsistent.contains(&Field::Calories));
    }

    #[test]
    fn tolerance_band_is_a_third_of_expected() {
        // expected 165, band 55
        assert!(calories_consistent(165.0, 220.0));
        assert!(calories_consistent(165.0, 110.0));
        assert!(!calories_consistent(165.0, 221.0));
        assert!(!calories_consistent(165.0, 109.0));
        assert!(calories_consistent(0.0, 0.0));
        assert!(!calories_consistent(0.0, 5.0));
    }

    #[test]
    fn null_calories_skip_calorie_checks() {
        let macros = Macros { protein: 100.0, carbs: 100.0, fat: 100.0 };
        let e = validate(entry(100.0, "g", macros, None));
        assert!(e.issues.is_empty());
    }

    #[test]
    fn findings_are_additive_to_unknown() {
        let mut e = entry(100.0, "g", Macros::default(), Some(250.0));
        e.issues.mark_unknown(Field::Macros);
        let e = validate(e);
        assert!(e.issues.unknown.contains(&Field::Macros));
        assert!(e.issues.inconsistent.contains(&Field::Calories));
    }

    #[test]
    fn validation_is_idempotent() {
        let once = validate(entry(-1.0, "oz", Macros { protein: -3.0, ..MACROS }, Some(900.0)));
        let twice = validate(once.clone());
        assert_eq!(once.issues, twice.issues);
        assert_eq!(once.issues.invalid.len(), 2);
        assert_eq!(once.issues.inconsistent.len(), 1);
    }
}
