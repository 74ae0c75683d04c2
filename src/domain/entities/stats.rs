//! Host and configuration statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use super::ListenPort;

const BYTES_PER_MIB: u64 = 1024 * 1024;

/// One reading of the host counters, taken over a sampling window.
#[derive(Debug, Clone, PartialEq)]
pub struct HostSample {
    pub load_average_1m: f64,
    pub logical_cores: usize,
    pub memory_used_bytes: u64,
    pub memory_total_bytes: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub window: Duration,
}

impl HostSample {
    pub fn upload_mbps(&self) -> f64 {
        megabits_per_second(self.bytes_sent, self.window)
    }

    pub fn download_mbps(&self) -> f64 {
        megabits_per_second(self.bytes_received, self.window)
    }
}

/// Converts a byte delta measured over `window` into Mbit/s.
pub fn megabits_per_second(bytes: u64, window: Duration) -> f64 {
    let secs = window.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    (bytes as f64 * 8.0 / 1_000_000.0) / secs
}

/// Statistics snapshot returned by `GET /stats` and `edgectl stats`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub ports: Vec<ListenPort>,
    pub domain_count: usize,
    pub load_average_1m: f64,
    pub logical_cores: usize,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
    pub memory_used_percent: f64,
    pub upload_mbps: f64,
    pub download_mbps: f64,
    pub sampled_at: DateTime<Utc>,
}

impl StatsSnapshot {
    pub fn new(ports: Vec<ListenPort>, domain_count: usize, host: &HostSample) -> Self {
        let memory_used_percent = if host.memory_total_bytes > 0 {
            host.memory_used_bytes as f64 / host.memory_total_bytes as f64 * 100.0
        } else {
            0.0
        };

        Self {
            ports,
            domain_count,
            load_average_1m: host.load_average_1m,
            logical_cores: host.logical_cores,
            memory_used_mb: host.memory_used_bytes / BYTES_PER_MIB,
            memory_total_mb: host.memory_total_bytes / BYTES_PER_MIB,
            memory_used_percent,
            upload_mbps: host.upload_mbps(),
            download_mbps: host.download_mbps(),
            sampled_at: Utc::now(),
        }
    }
}
