//! Host sampling contract used by the stats collector.

use async_trait::async_trait;

use crate::domain::entities::HostSample;

/// Reads load, memory and network counters from the host.
///
/// Sampling never fails: counters the platform does not expose read as zero.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SystemProbe: Send + Sync {
    /// Takes one sample. Throughput fields cover the probe's sampling window,
    /// so this call takes at least that long.
    async fn sample(&self) -> HostSample;
}
