//! Bearer token check for the provisioning API.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

type BearerRejection = <AuthBearer as FromRequestParts<AppState>>::Rejection;

/// Rejects the request with `401` unless it carries `Authorization: Bearer <API_KEY>`.
///
/// The token is compared in constant time by
/// [`AuthService`](crate::application::services::AuthService). The 401 body
/// is the usual error envelope and carries `WWW-Authenticate: Bearer`.
///
/// Installed as a route layer over every route except `/health`:
///
/// ```rust,ignore
/// let protected = api::routes::protected_routes()
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_api_key));
/// ```
pub async fn require_api_key(
    State(state): State<AppState>,
    bearer: Result<AuthBearer, BearerRejection>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let AuthBearer(token) = bearer.map_err(|_| {
        AppError::unauthorized(
            "Unauthorized",
            json!({"reason": "Missing or malformed Authorization header"}),
        )
    })?;

    state.auth_service.authenticate(&token)?;

    Ok(next.run(request).await)
}
