use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::model::Serving;

lazy_static! {
    static ref SERVING_SPLIT_RE: Regex = Regex::new(r"^(\d+(?:\.\d+)?)\s*([^\d.\s].*)$").unwrap();
    static ref FIRST_NUMBER_RE: Regex = Regex::new(r"\d+(?:\.\d+)?").unwrap();
    static ref ID_UNSAFE_RE: Regex = Regex::new(r"[^A-Za-z0-9-]").unwrap();
}

/// Loose numeric conversion used for typed upstreams: `null`/`false`/`""` become 0,
/// `true` becomes 1, numeric strings are parsed. `None` means the value is not a number
/// (absent, object, array, text, or non-finite).
pub fn force_number(v: Option<&Value>) -> Option<f64> {
    let n = match v? {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().ok()?
            }
        }
        Value::Array(_) | Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}

/// Strict conversion for string-typed upstreams: only JSON numbers and non-empty
/// numeric strings count.
pub fn parse_number(v: Option<&Value>) -> Option<f64> {
    let n = match v? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Text value of a scalar. Numbers and booleans are stringified; everything else is `None`.
pub fn text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Builds `<prefix>-<timestamp>-<name>` with every char outside `[A-Za-z0-9-]` replaced by `-`.
pub fn synthesize_id(prefix: &str, timestamp: &str, name: &str) -> String {
    let raw = format!("{}-{}-{}", prefix, timestamp, name);
    ID_UNSAFE_RE.replace_all(&raw, "-").into_owned()
}

/// Splits a free-text serving like `"2 tbsp"` into amount and unit.
///
/// Returns `true` in the second slot when no number was found and the amount was
/// defaulted to 1.
pub fn parse_serving_size(raw: &str) -> (Serving, bool) {
    let s = raw.trim();

    if let Some(caps) = SERVING_SPLIT_RE.captures(s) {
        if let Ok(amount) = caps[1].parse::<f64>() {
            return (
                Serving {
                    amount,
                    unit: caps[2].trim().to_string(),
                },
                false,
            );
        }
    }

    if let Some(m) = FIRST_NUMBER_RE.find(s) {
        if let Ok(amount) = m.as_str().parse::<f64>() {
            let unit = format!("{}{}", &s[..m.start()], &s[m.end()..]);
            return (
                Serving {
                    amount,
                    unit: unit.trim().to_string(),
                },
                false,
            );
        }
    }

    (
        Serving {
            amount: 1.0,
            unit: s.to_string(),
        },
        true,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn force_number_follows_loose_rules() {
        assert_eq!(force_number(Some(&json!(12.5))), Some(12.5));
        assert_eq!(force_number(Some(&json!(" 7 "))), Some(7.0));
        assert_eq!(force_number(Some(&json!(""))), Some(0.0));
        assert_eq!(force_number(Some(&Value::Null)), Some(0.0));
        assert_eq!(force_number(Some(&json!(true))), Some(1.0));
        assert_eq!(force_number(Some(&json!("n/a"))), None);
        assert_eq!(force_number(Some(&json!("NaN"))), None);
        assert_eq!(force_number(Some(&json!({ "g": 1 }))), None);
        assert_eq!(force_number(None), None);
    }

    #[test]
    fn parse_number_is_strict() {
        assert_eq!(parse_number(Some(&json!("10.5"))), Some(10.5));
        assert_eq!(parse_number(Some(&json!(3))), Some(3.0));
        assert_eq!(parse_number(Some(&json!(""))), None);
        assert_eq!(parse_number(Some(&Value::Null)), None);
        assert_eq!(parse_number(Some(&json!(false))), None);
        assert_eq!(parse_number(Some(&json!("inf"))), None);
    }

    #[test]
    fn text_stringifies_scalars_only() {
        assert_eq!(text(Some(&json!("x"))).as_deref(), Some("x"));
        assert_eq!(text(Some(&json!(42))).as_deref(), Some("42"));
        assert_eq!(text(Some(&Value::Null)), None);
        assert_eq!(text(Some(&json!(["x"]))), None);
    }

    #[test]
    fn synthesized_ids_are_sanitized() {
        assert_eq!(
            synthesize_id("c", "2024-01-02T08:30:00Z", "Greek Yogurt (2%)"),
            "c-2024-01-02T08-30-00Z-Greek-Yogurt--2--"
        );
    }

    #[test]
    fn serving_clean_split() {
        let (s, defaulted) = parse_serving_size("2 tbsp");
        assert_eq!(s, Serving { amount: 2.0, unit: "tbsp".into() });
        assert!(!defaulted);

        let (s, _) = parse_serving_size("250.5ml");
        assert_eq!(s, Serving { amount: 250.5, unit: "ml".into() });
    }

    #[test]
    fn serving_fallback_extracts_first_number() {
        let (s, defaulted) = parse_serving_size("about 30 g");
        assert_eq!(s.amount, 30.0);
        assert_eq!(s.unit, "about  g");
        assert!(!defaulted);

        let (s, _) = parse_serving_size("100");
        assert_eq!(s, Serving { amount: 100.0, unit: String::new() });

        let (s, _) = parse_serving_size("2.5");
        assert_eq!(s, Serving { amount: 2.5, unit: String::new() });
    }

    #[test]
    fn serving_without_number_defaults_to_one() {
        let (s, defaulted) = parse_serving_size("handful");
        assert_eq!(s, Serving { amount: 1.0, unit: "handful".into() });
        assert!(defaulted);
    }
}
