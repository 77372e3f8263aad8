use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    normalize::{normalize_batch, CanonicalEntry},
    sources::SourceKey,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/entries/:source", get(get_entries))
}

/// GET /entries/:source
/// Loads the raw payload of one source and returns it normalized, one entry per record.
#[instrument(skip(state))]
pub async fn get_entries(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Result<Json<Vec<CanonicalEntry>>, (StatusCode, String)> {
    let key: SourceKey = source.parse().map_err(|_| {
        warn!(%source, "unknown source requested");
        let known: Vec<&str> = SourceKey::ALL.iter().map(SourceKey::as_str).collect();
        (
            StatusCode::NOT_FOUND,
            format!("Unknown source, expected one of: {}", known.join(", ")),
        )
    })?;

    let records = state.sources.load(key).await.map_err(|e| {
        error!(error = %e, source = %key, "load source failed");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e))
    })?;

    let entries = normalize_batch(&records).map_err(|e| {
        warn!(error = %e, source = %key, "normalization rejected batch");
        (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    })?;

    info!(source = %key, entries = entries.len(), "entries normalized");
    Ok(Json(entries))
}
