//! Host and configuration statistics service.

use std::sync::Arc;

use crate::domain::entities::StatsSnapshot;
use crate::domain::errors::ProvisionError;
use crate::domain::repositories::{DomainRepository, PortRepository};
use crate::infrastructure::system::SystemProbe;

/// Combines the configuration store's counts with one host sample.
///
/// Read-only: never takes the provisioning lock and never writes.
pub struct StatsService {
    domains: Arc<dyn DomainRepository>,
    ports: Arc<dyn PortRepository>,
    probe: Arc<dyn SystemProbe>,
}

impl StatsService {
    /// Creates a new statistics service.
    pub fn new(
        domains: Arc<dyn DomainRepository>,
        ports: Arc<dyn PortRepository>,
        probe: Arc<dyn SystemProbe>,
    ) -> Self {
        Self {
            domains,
            ports,
            probe,
        }
    }

    /// Takes a statistics snapshot.
    ///
    /// Blocks for the probe's sampling window while network throughput is
    /// measured.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Io`] if the listen file or the domains
    /// directory cannot be read.
    pub async fn get_stats(&self) -> Result<StatsSnapshot, ProvisionError> {
        let ports = self.ports.list().await?;
        let domain_count = self.domains.list().await?.len();
        let host = self.probe.sample().await;

        Ok(StatsSnapshot::new(ports, domain_count, &host))
    }
}
