use chrono::{Datelike, Timelike, Weekday};
use serde::Serialize;

const DAY_NAMES: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March",
    "April", "May", "June",
    "July", "August", "September",
    "October", "November", "December",
];

/// English ordinal suffix for a day of month ("st", "nd", "rd" or "th").
///
/// The teens (11, 12, 13 and every x11, x12, x13) always take "th".
pub fn ordinal_suffix(day: u32) -> &'static str {
    let ones = day % 10;
    let hundreds = day % 100;
    match (ones, hundreds) {
        (1, h) if h != 11 => "st",
        (2, h) if h != 12 => "nd",
        (3, h) if h != 13 => "rd",
        _ => "th",
    }
}

/// Left-pad an hour or minute to two digits.
///
/// Values of 10 or more are returned unchanged, so callers must keep the
/// input within a clock range for the result to be two characters wide.
pub fn zero_pad(value: u32) -> String {
    if value < 10 {
        format!("0{}", value)
    } else {
        value.to_string()
    }
}

pub fn day_name(weekday: Weekday) -> &'static str {
    DAY_NAMES[weekday.num_days_from_sunday() as usize]
}

/// Month name for a zero-based month index (0 = January)
pub fn month_name(month0: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month0 as usize).copied()
}

/// The three strings shown by the home page clock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayText {
    /// Full day name, e.g. "Tuesday"
    pub day: String,
    /// Day of month with ordinal suffix and month name, e.g. "2nd April"
    pub date: String,
    /// 24-hour "HH:MM"
    pub time: String,
}

impl DisplayText {
    pub fn from_instant<T: Datelike + Timelike>(now: &T) -> Self {
        let day_of_month = now.day();
        // month0() is always 0..=11 for chrono types
        let month = month_name(now.month0()).unwrap_or_default();

        Self {
            day: day_name(now.weekday()).to_string(),
            date: format!("{}{} {}", day_of_month, ordinal_suffix(day_of_month), month),
            time: format!("{}:{}", zero_pad(now.hour()), zero_pad(now.minute())),
        }
    }
}
