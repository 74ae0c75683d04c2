use std::sync::Arc;

use crate::application::services::{AuthService, ProvisioningService, StatsService};

/// Shared state injected into every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub provisioning_service: Arc<ProvisioningService>,
    pub stats_service: Arc<StatsService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(
        provisioning_service: Arc<ProvisioningService>,
        stats_service: Arc<StatsService>,
        auth_service: Arc<AuthService>,
    ) -> Self {
        Self {
            provisioning_service,
            stats_service,
            auth_service,
        }
    }
}
