use serde::Serialize;
use std::sync::Mutex;

/// Counters for the work a view performs.
pub struct MetricsRecorder {
    inner: Mutex<ViewMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewMetrics {
    pub layout_passes: usize,
    pub cities_culled: usize,
    pub coast_ticks: usize,
    pub feed_fallbacks: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ViewMetrics::default()),
        }
    }

    pub fn record_layout(&self, culled: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.layout_passes += 1;
            metrics.cities_culled += culled;
        }
    }

    pub fn record_coast_tick(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.coast_ticks += 1;
        }
    }

    pub fn record_fallback(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.feed_fallbacks += 1;
        }
    }

    pub fn snapshot(&self) -> ViewMetrics {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
