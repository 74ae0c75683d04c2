//! [`SystemProbe`] backed by the `sysinfo` crate.

use async_trait::async_trait;
use std::time::Duration;
use sysinfo::{CpuRefreshKind, Networks, RefreshKind, System};

use super::probe::SystemProbe;
use crate::domain::entities::HostSample;

#[derive(Debug, Clone)]
pub struct SysinfoProbe {
    window: Duration,
}

impl SysinfoProbe {
    /// `window` is the interval between the two network counter readings.
    pub fn new(window: Duration) -> Self {
        Self { window }
    }
}

/// Total bytes (sent, received) across every interface since boot.
fn network_totals() -> (u64, u64) {
    let networks = Networks::new_with_refreshed_list();
    networks
        .list()
        .values()
        .fold((0u64, 0u64), |(sent, received), data| {
            (
                sent.saturating_add(data.total_transmitted()),
                received.saturating_add(data.total_received()),
            )
        })
}

#[async_trait]
impl SystemProbe for SysinfoProbe {
    async fn sample(&self) -> HostSample {
        let (sent_before, received_before) = network_totals();
        tokio::time::sleep(self.window).await;
        let (sent_after, received_after) = network_totals();

        let mut system = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()),
        );
        system.refresh_memory();

        let sample = HostSample {
            load_average_1m: System::load_average().one,
            logical_cores: system.cpus().len(),
            memory_used_bytes: system.used_memory(),
            memory_total_bytes: system.total_memory(),
            // Counters reset when an interface goes away mid-window.
            bytes_sent: sent_after.saturating_sub(sent_before),
            bytes_received: received_after.saturating_sub(received_before),
            window: self.window,
        };

        tracing::debug!(
            load = sample.load_average_1m,
            cores = sample.logical_cores,
            sent = sample.bytes_sent,
            received = sample.bytes_received,
            "host sampled"
        );

        sample
    }
}
