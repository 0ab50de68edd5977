use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use page_display::{DisplayText, ScaleReport};

use crate::application_state::ApplicationState;

pub const PASS: &str = "PASS";
pub const FAIL: &str = "FAIL";
pub const UNKNOWN: &str = "UNKNOWN";

pub fn pass_fail(result: Option<bool>) -> &'static str {
    match result {
        Some(true) => PASS,
        Some(false) => FAIL,
        None => UNKNOWN,
    }
}

/// Whether a task that last ran at `last_run` is still on schedule
fn is_fresh(last_run: Option<DateTime<Utc>>, now: DateTime<Utc>, tolerance: Duration) -> Option<bool> {
    last_run.map(|ts| {
        let age = now.signed_duration_since(ts);
        // a timestamp slightly in the future still counts as fresh
        age.to_std().map(|age| age <= tolerance).unwrap_or(true)
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledTasks {
    pub display_update: &'static str,
    pub autoscale: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub uptime_seconds: i64,
    pub scheduled_tasks: ScheduledTasks,
    pub last_display: Option<DisplayText>,
    pub last_scale: Option<ScaleReport>,
}

impl HealthReport {
    pub fn from_state(state: &ApplicationState, now: DateTime<Utc>, tolerance: Duration) -> Self {
        let display_update = pass_fail(is_fresh(state.last_display_update, now, tolerance));
        let autoscale = pass_fail(is_fresh(state.last_autoscale, now, tolerance));
        let status = if display_update == PASS && autoscale == PASS { PASS } else { FAIL };

        Self {
            status,
            uptime_seconds: now.signed_duration_since(state.started_at).num_seconds().max(0),
            scheduled_tasks: ScheduledTasks {
                display_update,
                autoscale,
            },
            last_display: state.last_display.clone(),
            last_scale: state.last_scale,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == PASS
    }
}
