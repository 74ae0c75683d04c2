//! Business logic services for the application layer.

pub mod auth_service;
pub mod provisioning_service;
pub mod stats_service;

pub use auth_service::AuthService;
pub use provisioning_service::ProvisioningService;
pub use stats_service::StatsService;
