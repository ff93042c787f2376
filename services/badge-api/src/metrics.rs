//! Application metrics collection and reporting.

use metrics::{counter, histogram};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::RwLock;

/// Metrics collector for the badge API.
#[derive(Debug)]
pub struct MetricsCollector {
    pub renders_total: AtomicU64,
    pub render_errors: AtomicU64,
    /// Assets that were missing or undecodable, summed over all renders.
    pub asset_fallbacks: AtomicU64,

    render_times: RwLock<TimingStats>,

    start_time: Instant,
}

#[derive(Debug, Default)]
struct TimingStats {
    count: u64,
    total_us: u64,
    min_us: u64,
    max_us: u64,
    last_us: u64,
}

impl TimingStats {
    fn record(&mut self, duration_us: u64) {
        self.count += 1;
        self.total_us += duration_us;
        self.last_us = duration_us;
        if self.min_us == 0 || duration_us < self.min_us {
            self.min_us = duration_us;
        }
        if duration_us > self.max_us {
            self.max_us = duration_us;
        }
    }

    fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.total_us as f64 / self.count as f64) / 1000.0
        }
    }
}

/// Point-in-time view served by `/api/metrics`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub renders_total: u64,
    pub render_errors: u64,
    pub asset_fallbacks: u64,
    pub render_avg_ms: f64,
    pub render_min_ms: f64,
    pub render_max_ms: f64,
    pub render_last_ms: f64,
    pub uptime_secs: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            renders_total: AtomicU64::new(0),
            render_errors: AtomicU64::new(0),
            asset_fallbacks: AtomicU64::new(0),
            render_times: RwLock::new(TimingStats::default()),
            start_time: Instant::now(),
        }
    }

    /// Record a render operation
    pub async fn record_render(&self, duration_us: u64, success: bool) {
        self.renders_total.fetch_add(1, Ordering::Relaxed);
        counter!("badge_renders_total").increment(1);
        if !success {
            self.render_errors.fetch_add(1, Ordering::Relaxed);
            counter!("badge_render_errors_total").increment(1);
            return;
        }
        histogram!("badge_render_duration_ms").record(duration_us as f64 / 1000.0);

        let mut times = self.render_times.write().await;
        times.record(duration_us);
    }

    /// Record assets that a render had to do without
    pub fn record_asset_fallbacks(&self, count: usize) {
        if count == 0 {
            return;
        }
        self.asset_fallbacks
            .fetch_add(count as u64, Ordering::Relaxed);
        counter!("badge_asset_fallbacks_total").increment(count as u64);
    }

    pub async fn snapshot(&self) -> MetricsSnapshot {
        let times = self.render_times.read().await;
        MetricsSnapshot {
            renders_total: self.renders_total.load(Ordering::Relaxed),
            render_errors: self.render_errors.load(Ordering::Relaxed),
            asset_fallbacks: self.asset_fallbacks.load(Ordering::Relaxed),
            render_avg_ms: times.avg_ms(),
            render_min_ms: times.min_us as f64 / 1000.0,
            render_max_ms: times.max_us as f64 / 1000.0,
            render_last_ms: times.last_us as f64 / 1000.0,
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_render_timing() {
        let metrics = MetricsCollector::new();
        metrics.record_render(2_000, true).await;
        metrics.record_render(4_000, true).await;
        metrics.record_render(9_000, false).await;

        let snap = metrics.snapshot().await;
        assert_eq!(snap.renders_total, 3);
        assert_eq!(snap.render_errors, 1);
        assert_eq!(snap.render_avg_ms, 3.0);
        assert_eq!(snap.render_min_ms, 2.0);
        assert_eq!(snap.render_max_ms, 4.0);
        assert_eq!(snap.render_last_ms, 4.0);
    }

    #[test]
    fn test_asset_fallbacks_accumulate() {
        let metrics = MetricsCollector::new();
        metrics.record_asset_fallbacks(0);
        metrics.record_asset_fallbacks(3);
        metrics.record_asset_fallbacks(2);
        assert_eq!(metrics.asset_fallbacks.load(Ordering::Relaxed), 5);
    }
}
