use serde::Serialize;
use std::time::Duration;

/// Cumulative load statistics, kept until `reset`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStats {
    pub total_loads: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub errors: u64,
    /// Fragment bytes fetched over the network
    pub bytes: u64,
    /// Summed latency of successful network loads
    #[serde(skip)]
    pub total_latency: Duration,
    pub network_loads: u64,
    pub secondary_assets: u64,
    pub secondary_bytes: u64,
}

impl LoadStats {
    pub fn average_latency(&self) -> Duration {
        match u32::try_from(self.network_loads) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(loads) => self.total_latency / loads,
        }
    }

    pub fn hit_rate(&self) -> f64 {
        if self.total_loads == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_loads as f64
        }
    }

    pub(crate) fn record_network_load(&mut self, bytes: usize, latency: Duration) {
        self.network_loads += 1;
        self.bytes += bytes as u64;
        self.total_latency += latency;
    }
}
