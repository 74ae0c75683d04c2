//! Handler for the statistics endpoint.

use axum::{Json, extract::State};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns listen ports, domain count and host load.
///
/// # Endpoint
///
/// `GET /stats`
///
/// Takes as long as the configured sampling window (1 s by default) because
/// network throughput is measured across it.
///
/// # Response
///
/// ```json
/// {
///   "ok": true,
///   "stats": {
///     "ports": [80, 443],
///     "domain_count": 2,
///     "load_average_1m": 0.42,
///     "logical_cores": 4,
///     "memory_used_mb": 812,
///     "memory_total_mb": 3911,
///     "memory_used_percent": 20.76,
///     "upload_mbps": 0.31,
///     "download_mbps": 1.8,
///     "sampled_at": "2026-01-01T12:00:00Z"
///   }
/// }
/// ```
pub async fn stats_handler(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.stats_service.get_stats().await?;
    Ok(Json(StatsResponse { ok: true, stats }))
}
