use serde_json::Value;
use tracing::{debug, warn};

use super::error::{NormalizeError, Result};

/// Known upstream layouts, one normalizer each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceShape {
    /// `entryId` + `foodName`
    A,
    /// `loggedAt` + string `servingSize`
    B,
    /// `item.label` + `nutrients` array
    C,
    /// `time` + `food`
    D,
}

impl SourceShape {
    /// Prefix used when an id has to be synthesized.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            SourceShape::A => "a",
            SourceShape::B => "b",
            SourceShape::C => "c",
            SourceShape::D => "d",
        }
    }
}

/// Picks the shape for a whole batch from its first record. First match wins.
pub fn classify(first: &Value) -> Result<SourceShape> {
    let shape = first.as_object().and_then(|obj| {
        let has = |k: &str| obj.contains_key(k);

        if has("entryId") && has("foodName") {
            return Some(SourceShape::A);
        }
        if has("loggedAt") && obj.get("servingSize").is_some_and(Value::is_string) {
            return Some(SourceShape::B);
        }
        let item_has_label = obj
            .get("item")
            .and_then(Value::as_object)
            .is_some_and(|item| item.contains_key("label"));
        if item_has_label && obj.get("nutrients").is_some_and(Value::is_array) {
            return Some(SourceShape::C);
        }
        if has("time") && has("food") {
            return Some(SourceShape::D);
        }
        None
    });

    match shape {
        Some(s) => {
            debug!(shape = ?s, "source shape classified");
            Ok(s)
        }
        None => {
            let err = NormalizeError::unrecognized(first);
            warn!(error = %err, "source shape not recognized");
            Err(err)
        }
    }
}
