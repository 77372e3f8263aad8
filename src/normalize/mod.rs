//! Schema-drift normalization core.
//!
//! Raw upstream records go through three pure steps: classify the batch by its first
//! record, map every record with that shape's normalizer, then validate each result.
//! Only an unrecognized shape fails the batch; every other anomaly ends up in the
//! entry's `issues`.

pub mod classify;
pub mod coerce;
pub mod error;
pub mod model;
pub mod shapes;
pub mod validate;

use serde_json::Value;
use tracing::debug;

pub use classify::{classify, SourceShape};
pub use error::{NormalizeError, Result};
pub use model::{CanonicalEntry, Field, Issues, Macros, Serving};
pub use shapes::normalize_record;
pub use validate::validate;

/// Normalizes one source's batch, preserving input order.
pub fn normalize_batch(records: &[Value]) -> Result<Vec<CanonicalEntry>> {
    let Some(first) = records.first() else {
        return Ok(Vec::new());
    };
    let shape = classify(first)?;

    let entries: Vec<CanonicalEntry> = records
        .iter()
        .map(|raw| validate(normalize_record(shape, raw)))
        .collect();

    let flagged = entries.iter().filter(|e| !e.issues.is_empty()).count();
    debug!(shape = ?shape, total = entries.len(), flagged, "batch normalized");
    Ok(entries)
}
