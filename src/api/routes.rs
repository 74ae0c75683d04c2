//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    add_domain_handler, add_port_handler, delete_domain_handler, delete_port_handler,
    domain_list_handler, port_list_handler, reload_handler, restart_handler, start_handler,
    stats_handler, status_handler, stop_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /add-domain`              - Provision a domain with a certificate
/// - `DELETE /delete-domain/{domain}`  - Remove a domain
/// - `GET    /domains`                 - List provisioned domains
/// - `POST   /add-port`                - Add a listen directive
/// - `DELETE /delete-port/{port}`      - Remove a listen directive
/// - `GET    /ports`                   - List listen ports
/// - `GET    /status`                  - Service manager state
/// - `POST   /reload`                  - Reload configuration in place
/// - `POST   /restart`                 - Restart the service
/// - `POST   /start`                   - Start the service
/// - `POST   /stop`                    - Stop the service
/// - `GET    /stats`                   - Host and configuration statistics
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/add-domain", post(add_domain_handler))
        .route("/delete-domain/{domain}", delete(delete_domain_handler))
        .route("/domains", get(domain_list_handler))
        .route("/add-port", post(add_port_handler))
        .route("/delete-port/{port}", delete(delete_port_handler))
        .route("/ports", get(port_list_handler))
        .route("/status", get(status_handler))
        .route("/reload", post(reload_handler))
        .route("/restart", post(restart_handler))
        .route("/start", post(start_handler))
        .route("/stop", post(stop_handler))
        .route("/stats", get(stats_handler))
}
