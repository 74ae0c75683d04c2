//! Handlers for domain provisioning endpoints.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::domain::{AddDomainRequest, DomainListResponse};
use crate::api::dto::response::MessageResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Provisions a domain: bootstrap block, certificate, proxy block.
///
/// # Endpoint
///
/// `POST /add-domain`
///
/// # Request Body
///
/// ```json
/// { "domain": "example.com", "ip": "10.0.0.5" }
/// ```
///
/// Blocks until the certificate is issued and the server has reloaded.
///
/// # Errors
///
/// - 400 for an invalid domain or IP, or an already provisioned domain
/// - 500 if a reload or the certificate request fails; nothing is left on disk
pub async fn add_domain_handler(
    State(state): State<AppState>,
    payload: Result<Json<AddDomainRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let record = state
        .provisioning_service
        .add_domain(&payload.domain, &payload.ip)
        .await?;

    Ok(Json(MessageResponse::ok(format!(
        "Domain {} added and routed to {}",
        record.name, record.target
    ))))
}

/// Removes a domain's server block and reloads.
///
/// # Endpoint
///
/// `DELETE /delete-domain/{domain}`
///
/// # Errors
///
/// - 400 if the domain is malformed or not provisioned
/// - 500 if the reload fails (the config file is already gone)
pub async fn delete_domain_handler(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.provisioning_service.delete_domain(&domain).await?;

    Ok(Json(MessageResponse::ok(format!("Domain {domain} deleted"))))
}

/// Lists provisioned domains.
///
/// # Endpoint
///
/// `GET /domains`
pub async fn domain_list_handler(
    State(state): State<AppState>,
) -> Result<Json<DomainListResponse>, AppError> {
    let domains = state.provisioning_service.list_domains().await?;

    Ok(Json(DomainListResponse {
        ok: true,
        domains: domains.into_iter().collect(),
    }))
}
