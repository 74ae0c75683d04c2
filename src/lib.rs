//! # Edge Provisioner
//!
//! Provisions nginx reverse-proxy routes: per-domain server blocks with
//! certbot-issued certificates, and the shared set of listen ports. Driven by
//! an authenticated HTTP API (`edge-provisioner`) or the `edgectl` CLI.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities, failure taxonomy, templates and store traits
//! - **Application Layer** ([`application`]) - The provisioning engine and statistics
//! - **Infrastructure Layer** ([`infrastructure`]) - Config files, external commands, host counters
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Guarantees
//!
//! - A failed `add-domain` leaves no config file behind and reloads the server
//!   back onto the previous configuration
//! - Only exact `listen <port>;` lines are ever added or removed
//! - Mutating operations never overlap within one process
//! - Every external command is bounded by a timeout
//!
//! ## Quick Start
//!
//! ```bash
//! export API_KEY="$(edgectl key generate --raw)"
//! cargo run
//!
//! curl -H "Authorization: Bearer $API_KEY" -d '{"port":8443}' \
//!      -H 'Content-Type: application/json' http://localhost:8080/add-port
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod telemetry;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{AuthService, ProvisioningService, StatsService};
    pub use crate::domain::entities::{DomainRecord, ListenPort, StatsSnapshot};
    pub use crate::domain::errors::{ErrorKind, OperationError, ProvisionError, Step};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
