//! Home Page Display Library
//!
//! This library holds everything the home page clock widget does, independent
//! of how it is hosted:
//! - Ordinal suffix and zero-padding formatters
//! - Day/month names and the rendered day, date and time strings
//! - A page model with addressable display slots and scalable text elements
//! - The display updater that writes the current instant into the slots
//! - The auto-scaler that normalizes element font sizes to a target width
//!
//! # Example
//!
//! ```
//! use page_display::{AutoScaler, DisplayUpdater, FixedClock, Clock, Page};
//! use chrono::NaiveDate;
//!
//! let clock = FixedClock::new(
//!     NaiveDate::from_ymd_opt(2024, 4, 2).unwrap().and_hms_opt(9, 5, 0).unwrap(),
//! );
//! let mut page = Page::home();
//!
//! let text = DisplayUpdater::new().update(&mut page, &clock.now()).unwrap();
//! assert_eq!(text.day, "Tuesday");
//! assert_eq!(text.date, "2nd April");
//! assert_eq!(text.time, "09:05");
//!
//! let report = AutoScaler::default().apply(page.elements_with_class_mut("dateentry"));
//! assert_eq!(report.scaled, 3);
//! ```

pub mod autoscale;
pub mod format;
pub mod page;
pub mod updater;

// Re-export commonly used types
pub use autoscale::{AutoScaler, Measurement, ScaleError, ScaleReport, DEFAULT_TARGET_WIDTH};
pub use format::{DisplayText, day_name, month_name, ordinal_suffix, zero_pad};
pub use page::{DisplaySlots, Page, PageError, PageSnapshot, ScalableElement, SlotId, TextElement};
pub use updater::{Clock, DisplayUpdater, FixedClock, SystemClock};
