use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use page_display::{AutoScaler, Clock, DisplayText, DisplayUpdater, Page, PageError, ScaleReport};

use crate::app_metrics::{AppMetrics, MetricsLogger};
use crate::application_state::ApplicationState;

pub type SharedPage = Arc<Mutex<Page>>;
pub type SharedState = Arc<Mutex<ApplicationState>>;

/// Lock a shared value, recovering the data if a previous holder panicked
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub display: Result<DisplayText, PageError>,
    pub scale: ScaleReport,
}

/// Runs one refresh of the page: write the clock slots, then auto-scale
pub struct DisplayController {
    page: SharedPage,
    state: SharedState,
    updater: DisplayUpdater,
    scaler: AutoScaler,
    scalable_class: String,
    metrics: AppMetrics,
    metrics_logger: MetricsLogger,
}

impl DisplayController {
    pub fn new(
        page: SharedPage,
        state: SharedState,
        scaler: AutoScaler,
        scalable_class: impl Into<String>,
        metrics_interval: Duration,
    ) -> Self {
        Self {
            page,
            state,
            updater: DisplayUpdater::new(),
            scaler,
            scalable_class: scalable_class.into(),
            metrics: AppMetrics::new(),
            metrics_logger: MetricsLogger::new(metrics_interval),
        }
    }

    pub fn metrics(&self) -> &AppMetrics {
        &self.metrics
    }

    pub fn tick(&mut self, now: &NaiveDateTime) -> TickOutcome {
        let (display, scale) = {
            let mut page = lock(&self.page);
            let display = self.updater.update(&mut *page, now);
            let scale = self
                .scaler
                .apply(page.elements_with_class_mut(&self.scalable_class));
            (display, scale)
        };

        self.metrics.ticks += 1;
        self.metrics.record_scale(&scale);

        let timestamp = Utc::now();
        {
            let mut state = lock(&self.state);
            match &display {
                Ok(text) => {
                    debug!(day = %text.day, date = %text.date, time = %text.time, "Display updated");
                    state.record_display_update(text.clone(), timestamp);
                }
                Err(e) => {
                    self.metrics.slot_errors += 1;
                    warn!("Display update incomplete: {}", e);
                }
            }
            state.record_autoscale(scale, timestamp);
        }

        self.metrics_logger.check_and_log(&mut self.metrics);

        TickOutcome { display, scale }
    }
}

/// Owns the repeating refresh task. Dropping a running ticker aborts it.
pub struct ClockTicker {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<DisplayController>>,
}

impl ClockTicker {
    /// Spawn the refresh task. The first tick runs immediately.
    pub fn start<C>(mut controller: DisplayController, clock: C, interval: Duration) -> Self
    where
        C: Clock + Send + 'static,
    {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!("Clock ticker started, interval {:?}", interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        controller.tick(&clock.now());
                    }
                    changed = shutdown_rx.changed() => {
                        // sender dropped or stop requested
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("Clock ticker stopped after {} ticks since last metrics report", controller.metrics().ticks);
            controller
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the task and hand back its controller
    pub async fn stop(mut self) -> Option<DisplayController> {
        if self.shutdown.send(true).is_err() {
            debug!("Clock ticker already stopped");
        }
        let handle = self.handle.take()?;
        match handle.await {
            Ok(controller) => Some(controller),
            Err(e) => {
                warn!("Clock ticker task ended abnormally: {}", e);
                None
            }
        }
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use page_display::{FixedClock, ScalableElement, DEFAULT_TARGET_WIDTH};
    use page_display::page::SCALABLE_CLASS;

    fn tuesday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 2)
            .unwrap()
            .and_hms_opt(14, 7, 0)
            .unwrap()
    }

    fn controller_for(page: SharedPage, state: SharedState) -> DisplayController {
        DisplayController::new(
            page,
            state,
            AutoScaler::default(),
            SCALABLE_CLASS,
            Duration::from_secs(3600),
        )
    }

    fn shared_home() -> (SharedPage, SharedState) {
        (
            Arc::new(Mutex::new(Page::home())),
            Arc::new(Mutex::new(ApplicationState::default())),
        )
    }

    #[test]
    fn test_tick_updates_and_scales() {
        let (page, state) = shared_home();
        let mut controller = controller_for(page.clone(), state.clone());

        let outcome = controller.tick(&tuesday());
        let text = outcome.display.unwrap();
        assert_eq!(text.day, "Tuesday");
        assert_eq!(text.date, "2nd April");
        assert_eq!(text.time, "14:07");
        assert_eq!(outcome.scale, ScaleReport { scaled: 3, skipped: 0 });

        let page = lock(&page);
        for element in page.elements_with_class(SCALABLE_CLASS) {
            assert_abs_diff_eq!(element.rendered_width(), DEFAULT_TARGET_WIDTH, epsilon = 1e-9);
        }

        let state = lock(&state);
        assert!(state.last_display_update.is_some());
        assert!(state.last_autoscale.is_some());
        assert_eq!(state.last_display.as_ref().map(|t| t.day.as_str()), Some("Tuesday"));
        assert_eq!(controller.metrics().ticks, 1);
        assert_eq!(controller.metrics().elements_scaled, 3);
    }

    #[test]
    fn test_repeated_tick_is_stable() {
        let (page, state) = shared_home();
        let mut controller = controller_for(page.clone(), state);

        controller.tick(&tuesday());
        let first: Vec<f64> = lock(&page)
            .elements_with_class(SCALABLE_CLASS)
            .map(|e| e.font_size())
            .collect();
        controller.tick(&tuesday());
        let second: Vec<f64> = lock(&page)
            .elements_with_class(SCALABLE_CLASS)
            .map(|e| e.font_size())
            .collect();

        for (a, b) in first.iter().zip(second.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_tick_with_missing_slot() {
        let (page, state) = shared_home();
        lock(&page).remove("date").unwrap();
        let mut controller = controller_for(page.clone(), state.clone());

        let outcome = controller.tick(&tuesday());
        assert_eq!(outcome.display, Err(PageError::MissingSlot("date".to_string())));
        assert_eq!(outcome.scale.scaled, 2);
        assert_eq!(controller.metrics().slot_errors, 1);

        let state = lock(&state);
        assert!(state.last_display_update.is_none());
        assert!(state.last_autoscale.is_some());
    }

    #[tokio::test]
    async fn test_ticker_start_and_stop() {
        let (page, state) = shared_home();
        let controller = controller_for(page.clone(), state.clone());

        let ticker = ClockTicker::start(controller, FixedClock::new(tuesday()), Duration::from_millis(10));
        assert!(ticker.is_running());

        tokio::time::sleep(Duration::from_millis(50)).await;

        let controller = ticker.stop().await.unwrap();
        assert!(controller.metrics().ticks >= 1);
        assert_eq!(lock(&page).slot_text(page_display::SlotId::Time), Some("14:07"));
        assert!(lock(&state).last_display_update.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_ticks_on_interval() {
        let (page, state) = shared_home();
        let controller = controller_for(page, state);

        let ticker = ClockTicker::start(controller, FixedClock::new(tuesday()), Duration::from_millis(500));
        // first tick is immediate, then one every 500ms
        tokio::time::sleep(Duration::from_millis(1250)).await;

        let controller = ticker.stop().await.unwrap();
        assert_eq!(controller.metrics().ticks, 3);
    }

    #[tokio::test]
    async fn test_stop_after_task_ended() {
        let (page, state) = shared_home();
        let controller = controller_for(page, state);

        let ticker = ClockTicker::start(controller, FixedClock::new(tuesday()), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(20)).await;
        ticker.handle.as_ref().unwrap().abort();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!ticker.is_running());

        // the task is gone, so stop has no controller to hand back
        assert!(ticker.stop().await.is_none());
    }

    #[tokio::test]
    async fn test_dropped_ticker_stops_ticking() {
        let (page, state) = shared_home();
        let controller = controller_for(page, state.clone());

        let ticker = ClockTicker::start(controller, FixedClock::new(tuesday()), Duration::from_millis(5));
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(ticker);
        tokio::time::sleep(Duration::from_millis(10)).await;

        let last = lock(&state).last_autoscale;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(lock(&state).last_autoscale, last);
    }
}
