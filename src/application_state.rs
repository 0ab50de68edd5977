use chrono::{DateTime, Utc};

use page_display::{DisplayText, ScaleReport};

/// What the clock ticker last did, shared with the web layer
#[derive(Debug, Clone)]
pub struct ApplicationState {
    pub started_at: DateTime<Utc>,
    pub last_display_update: Option<DateTime<Utc>>,
    pub last_autoscale: Option<DateTime<Utc>>,
    pub last_display: Option<DisplayText>,
    pub last_scale: Option<ScaleReport>,
}

impl ApplicationState {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        ApplicationState {
            started_at,
            last_display_update: None,
            last_autoscale: None,
            last_display: None,
            last_scale: None,
        }
    }

    pub fn record_display_update(&mut self, text: DisplayText, timestamp: DateTime<Utc>) {
        self.last_display = Some(text);
        self.last_display_update = Some(timestamp);
    }

    pub fn record_autoscale(&mut self, report: ScaleReport, timestamp: DateTime<Utc>) {
        self.last_scale = Some(report);
        self.last_autoscale = Some(timestamp);
    }
}

impl Default for ApplicationState {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}
