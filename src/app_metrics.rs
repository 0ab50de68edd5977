use std::time::{Duration, Instant};
use tracing::info;

use page_display::ScaleReport;

/// Counters for the clock ticker, logged and reset periodically
pub struct AppMetrics {
    /// Number of ticks run
    pub ticks: u64,
    /// Number of ticks where a display slot could not be written
    pub slot_errors: u64,
    /// Number of elements whose font size was rewritten
    pub elements_scaled: u64,
    /// Number of elements left alone because they could not be measured
    pub elements_skipped: u64,
}

impl AppMetrics {
    /// Create a new AppMetrics instance with all counters at zero
    pub fn new() -> Self {
        Self {
            ticks: 0,
            slot_errors: 0,
            elements_scaled: 0,
            elements_skipped: 0,
        }
    }

    pub fn record_scale(&mut self, report: &ScaleReport) {
        self.elements_scaled += report.scaled as u64;
        self.elements_skipped += report.skipped as u64;
    }

    /// Reset all counters to zero
    pub fn reset(&mut self) {
        self.ticks = 0;
        self.slot_errors = 0;
        self.elements_scaled = 0;
        self.elements_skipped = 0;
    }

    /// Log current metrics to the info log
    pub fn log(&self) {
        info!(
            "[Metrics] Ticks: {}, Slot errors: {}, Elements scaled: {}, Elements skipped: {}",
            self.ticks,
            self.slot_errors,
            self.elements_scaled,
            self.elements_skipped
        );
    }
}

impl Default for AppMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Manages periodic logging of application metrics
pub struct MetricsLogger {
    last_log: Instant,
    log_interval: Duration,
}

impl MetricsLogger {
    /// Create a new MetricsLogger with the specified logging interval
    pub fn new(log_interval: Duration) -> Self {
        Self {
            last_log: Instant::now(),
            log_interval,
        }
    }

    /// Log and reset the metrics if the interval has elapsed.
    /// Returns true if metrics were logged.
    pub fn check_and_log(&mut self, metrics: &mut AppMetrics) -> bool {
        if self.last_log.elapsed() < self.log_interval {
            return false;
        }
        metrics.log();
        metrics.reset();
        self.last_log = Instant::now();
        true
    }
}
