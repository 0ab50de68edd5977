use chrono::{Local, NaiveDateTime};

use crate::format::DisplayText;
use crate::page::{DisplaySlots, PageError, SlotId};

/// Source of the wall-clock instant shown on the page
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stopped at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: NaiveDateTime,
}

impl FixedClock {
    pub fn new(instant: NaiveDateTime) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.instant
    }
}

/// Writes the day, date and time of an instant into the display slots
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayUpdater;

impl DisplayUpdater {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, now: &NaiveDateTime) -> DisplayText {
        DisplayText::from_instant(now)
    }

    /// Render `now` and write all three slots.
    ///
    /// Every slot is attempted even if an earlier one is missing; the first
    /// failure is returned once all writes are done.
    pub fn update<S: DisplaySlots + ?Sized>(
        &self,
        slots: &mut S,
        now: &NaiveDateTime,
    ) -> Result<DisplayText, PageError> {
        let text = self.render(now);

        let results = [
            slots.write_slot(SlotId::Day, &text.day),
            slots.write_slot(SlotId::Date, &text.date),
            slots.write_slot(SlotId::Time, &text.time),
        ];

        match results.into_iter().find_map(Result::err) {
            Some(e) => Err(e),
            None => Ok(text),
        }
    }
}
