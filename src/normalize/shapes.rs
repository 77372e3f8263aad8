use serde_json::{Map, Value};

use super::classify::SourceShape;
use super::coerce::{force_number, parse_number, parse_serving_size, synthesize_id, text};
use super::model::{CanonicalEntry, Field, Issues, Macros, Serving};

type Object = Map<String, Value>;

/// Maps one raw record of `shape` to a canonical entry.
///
/// Only `unknown` findings are recorded here. Records that are not JSON objects are
/// treated as empty objects, so every field ends up defaulted and flagged.
pub fn normalize_record(shape: SourceShape, raw: &Value) -> CanonicalEntry {
    let empty = Object::new();
    let obj = raw.as_object().unwrap_or(&empty);
    match shape {
        SourceShape::A => shape_a(obj),
        SourceShape::B => shape_b(obj),
        SourceShape::C => shape_c(obj),
        SourceShape::D => shape_d(obj),
    }
}

fn shape_a(obj: &Object) -> CanonicalEntry {
    let mut issues = Issues::default();
    let timestamp = required_text(obj.get("timestamp"), Field::Timestamp, &mut issues);
    let food_name = required_text(obj.get("foodName"), Field::FoodName, &mut issues);
    let id = native_id(obj.get("entryId"), SourceShape::A, &timestamp, &food_name, &mut issues);

    CanonicalEntry {
        id,
        timestamp,
        food_name,
        serving: typed_serving(obj.get("serving"), &mut issues),
        macros: typed_macros(obj.get("macros"), &mut issues),
        calories: typed_calories(obj.get("calories_kcal"), &mut issues),
        metadata: metadata([("brand", obj.get("brand"))]),
        issues,
    }
}

fn shape_b(obj: &Object) -> CanonicalEntry {
    let mut issues = Issues::default();
    let timestamp = required_text(obj.get("loggedAt"), Field::Timestamp, &mut issues);
    let food_name = required_text(obj.get("name"), Field::FoodName, &mut issues);
    let id = native_id(obj.get("id"), SourceShape::B, &timestamp, &food_name, &mut issues);

    let serving = match text(obj.get("servingSize")) {
        Some(raw) => {
            let (serving, defaulted) = parse_serving_size(&raw);
            if defaulted {
                issues.mark_unknown(Field::Serving);
            }
            serving
        }
        None => {
            issues.mark_unknown(Field::Serving);
            Serving {
                amount: 1.0,
                unit: String::new(),
            }
        }
    };

    let raw_macros = obj.get("macros");
    let mut macro_value = |key: &str| {
        parse_number(raw_macros.and_then(|m| m.get(key))).unwrap_or_else(|| {
            issues.mark_unknown(Field::Macros);
            0.0
        })
    };
    let macros = Macros {
        protein: macro_value("protein"),
        carbs: macro_value("carbs"),
        fat: macro_value("fat"),
    };

    // Numeric 0 is falsy upstream: kept as declared, but flagged.
    let raw_calories = obj.get("calories");
    let calories = parse_number(raw_calories);
    if calories.is_none() || raw_calories.and_then(Value::as_f64) == Some(0.0) {
        issues.mark_unknown(Field::Calories);
    }

    CanonicalEntry {
        id,
        timestamp,
        food_name,
        serving,
        macros,
        calories,
        metadata: metadata([("extra", obj.get("extra"))]),
        issues,
    }
}

fn shape_c(obj: &Object) -> CanonicalEntry {
    let mut issues = Issues::default();
    let item = obj.get("item").and_then(Value::as_object);
    let timestamp = required_text(obj.get("logged_at"), Field::Timestamp, &mut issues);
    let food_name = required_text(item.and_then(|i| i.get("label")), Field::FoodName, &mut issues);
    let id = synthesize_id(SourceShape::C.id_prefix(), &timestamp, &food_name);

    let amount = force_number(obj.get("serving_grams")).unwrap_or_else(|| {
        issues.mark_unknown(Field::Serving);
        0.0
    });

    // Macro slots: outer None means never listed, inner None means a non-numeric value.
    let mut protein: Option<Option<f64>> = None;
    let mut carbs: Option<Option<f64>> = None;
    let mut fat: Option<Option<f64>> = None;
    let mut energy: Option<&Value> = None;

    let nutrients = obj.get("nutrients").and_then(Value::as_array);
    for n in nutrients.into_iter().flatten() {
        let Some(key) = text(n.get("key").or_else(|| n.get("name"))) else {
            continue;
        };
        let raw = n.get("value").or_else(|| n.get("amount"));
        match key.trim().to_lowercase().as_str() {
            "protein" => protein = Some(force_number(raw)),
            "carbohydrate" | "carbs" => carbs = Some(force_number(raw)),
            "fat" => fat = Some(force_number(raw)),
            "energy" => energy = raw,
            _ => {}
        }
    }

    let mut settle = |slot: Option<Option<f64>>| {
        slot.flatten().unwrap_or_else(|| {
            issues.mark_unknown(Field::Macros);
            0.0
        })
    };
    let macros = Macros {
        protein: settle(protein),
        carbs: settle(carbs),
        fat: settle(fat),
    };

    let calories = typed_calories(energy, &mut issues);

    CanonicalEntry {
        id,
        timestamp,
        food_name,
        serving: Serving {
            amount,
            unit: "g".to_string(),
        },
        macros,
        calories,
        metadata: metadata([
            ("source", obj.get("source")),
            ("brand", item.and_then(|i| i.get("brand"))),
        ]),
        issues,
    }
}

fn shape_d(obj: &Object) -> CanonicalEntry {
    let mut issues = Issues::default();
    let timestamp = required_text(obj.get("time"), Field::Timestamp, &mut issues);
    let food = obj.get("food");
    let food_name = required_text(
        food.and_then(|f| if f.is_object() { f.get("name") } else { Some(f) }),
        Field::FoodName,
        &mut issues,
    );
    let id = native_id(obj.get("id"), SourceShape::D, &timestamp, &food_name, &mut issues);

    CanonicalEntry {
        id,
        timestamp,
        food_name,
        serving: typed_serving(obj.get("serving"), &mut issues),
        macros: typed_macros(obj.get("macros"), &mut issues),
        calories: typed_calories(obj.get("calories_kcal"), &mut issues),
        metadata: metadata([("macros_basis", obj.get("macros_basis"))]),
        issues,
    }
}

fn required_text(v: Option<&Value>, field: Field, issues: &mut Issues) -> String {
    text(v).unwrap_or_else(|| {
        issues.mark_unknown(field);
        String::new()
    })
}

fn native_id(
    v: Option<&Value>,
    shape: SourceShape,
    timestamp: &str,
    food_name: &str,
    issues: &mut Issues,
) -> String {
    match text(v).filter(|id| !id.is_empty()) {
        Some(id) => id,
        None => {
            issues.mark_unknown(Field::Id);
            synthesize_id(shape.id_prefix(), timestamp, food_name)
        }
    }
}

/// `{amount, unit}` taken as-is; a missing amount becomes 0 and is left for validation.
fn typed_serving(v: Option<&Value>, issues: &mut Issues) -> Serving {
    let amount = force_number(v.and_then(|s| s.get("amount"))).unwrap_or_else(|| {
        issues.mark_unknown(Field::Serving);
        0.0
    });
    let unit = text(v.and_then(|s| s.get("unit"))).unwrap_or_else(|| {
        issues.mark_unknown(Field::Serving);
        String::new()
    });
    Serving { amount, unit }
}

fn typed_macros(v: Option<&Value>, issues: &mut Issues) -> Macros {
    let mut gram = |key: &str| {
        force_number(v.and_then(|m| m.get(key))).unwrap_or_else(|| {
            issues.mark_unknown(Field::Macros);
            0.0
        })
    };
    Macros {
        protein: gram("protein"),
        carbs: gram("carbs"),
        fat: gram("fat"),
    }
}

/// Explicit `null` is a declared absence and is not flagged.
fn typed_calories(v: Option<&Value>, issues: &mut Issues) -> Option<f64> {
    if matches!(v, Some(Value::Null)) {
        return None;
    }
    let calories = force_number(v);
    if calories.is_none() {
        issues.mark_unknown(Field::Calories);
    }
    calories
}

fn metadata<const N: usize>(pairs: [(&str, Option<&Value>); N]) -> Option<Object> {
    let map: Object = pairs
        .into_iter()
        .filter_map(|(k, v)| v.filter(|v| !v.is_null()).map(|v| (k.to_string(), v.clone())))
        .collect();
    (!map.is_empty()).then_some(map)
}
