//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating the configuration
//! store, the external process gateway and the host probe. Services consume
//! the domain's traits and provide a clean API for HTTP handlers and the CLI.
//!
//! # Available Services
//!
//! - [`services::provisioning_service::ProvisioningService`] - Domain and port lifecycle with rollback
//! - [`services::stats_service::StatsService`] - Host and configuration statistics
//! - [`services::auth_service::AuthService`] - API key authentication

pub mod services;
