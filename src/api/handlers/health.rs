//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health` (no authentication)
///
/// # Response Codes
///
/// - **200 OK**: Domains directory and listen file are readable
/// - **503 Service Unavailable**: One of them is not
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "domains_dir": { "status": "ok", "message": "3 domains" },
///     "listen_file": { "status": "ok", "message": "2 ports" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let domains_check = check_domains_dir(&state).await;
    let listen_check = check_listen_file(&state).await;

    let all_healthy = domains_check.is_ok() && listen_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            domains_dir: domains_check,
            listen_file: listen_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_domains_dir(state: &AppState) -> CheckStatus {
    match state.provisioning_service.list_domains().await {
        Ok(domains) => CheckStatus::ok(format!("{} domains", domains.len())),
        Err(e) => CheckStatus::error(e.to_string()),
    }
}

async fn check_listen_file(state: &AppState) -> CheckStatus {
    match state.provisioning_service.list_ports().await {
        Ok(ports) => CheckStatus::ok(format!("{} ports", ports.len())),
        Err(e) => CheckStatus::error(e.to_string()),
    }
}
