//! Handlers for web server lifecycle endpoints.

use axum::{Json, extract::State};

use crate::api::dto::response::{MessageResponse, StatusResponse};
use crate::error::AppError;
use crate::state::AppState;

/// `POST /reload`
pub async fn reload_handler(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.provisioning_service.reload().await?;
    Ok(Json(MessageResponse::ok("Server reloaded")))
}

/// `POST /restart`
pub async fn restart_handler(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.provisioning_service.restart().await?;
    Ok(Json(MessageResponse::ok("Server restarted")))
}

/// `POST /start`
pub async fn start_handler(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.provisioning_service.start().await?;
    Ok(Json(MessageResponse::ok("Server started")))
}

/// `POST /stop`
pub async fn stop_handler(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.provisioning_service.stop().await?;
    Ok(Json(MessageResponse::ok("Server stopped")))
}

/// Returns the service manager's state string.
///
/// # Endpoint
///
/// `GET /status`
///
/// # Response
///
/// ```json
/// { "ok": true, "status": "active" }
/// ```
pub async fn status_handler(
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, AppError> {
    let status = state.provisioning_service.status().await?;
    Ok(Json(StatusResponse { ok: true, status }))
}
