//! Handlers for listen port endpoints.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::port::{AddPortRequest, PortListResponse};
use crate::api::dto::response::MessageResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Adds a `listen <port>;` directive and reloads.
///
/// # Endpoint
///
/// `POST /add-port`
///
/// # Request Body
///
/// ```json
/// { "port": 8443 }
/// ```
///
/// The port may also be sent as a string.
///
/// # Errors
///
/// - 400 if the port is outside `1..=65535` or already listed
/// - 500 if the reload fails; the directive is removed again
pub async fn add_port_handler(
    State(state): State<AppState>,
    payload: Result<Json<AddPortRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let port = state
        .provisioning_service
        .add_port(&payload.port.to_string())
        .await?;

    Ok(Json(MessageResponse::ok(format!("Port {port} added"))))
}

/// Removes every directive for a port and reloads.
///
/// # Endpoint
///
/// `DELETE /delete-port/{port}`
pub async fn delete_port_handler(
    State(state): State<AppState>,
    Path(port): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let port = state.provisioning_service.delete_port(&port).await?;

    Ok(Json(MessageResponse::ok(format!("Port {port} deleted"))))
}

/// Lists managed listen ports in file order.
///
/// # Endpoint
///
/// `GET /ports`
pub async fn port_list_handler(
    State(state): State<AppState>,
) -> Result<Json<PortListResponse>, AppError> {
    let ports = state.provisioning_service.list_ports().await?;

    Ok(Json(PortListResponse { ok: true, ports }))
}
