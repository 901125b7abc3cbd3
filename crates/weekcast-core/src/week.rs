//! Week windows and event partitioning.
//!
//! A [`WeekWindow`] is an inclusive seven-day date range. The current week
//! starts on the most recent configured week-start day at or before today;
//! the next week begins exactly seven days later. All functions here are
//! pure: they take a reference date and return new values.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::event::CalendarEvent;
use crate::time::ReportZone;

/// An inclusive range of seven calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekWindow {
    /// First day of the window (inclusive).
    pub start: NaiveDate,
    /// Last day of the window (inclusive), six days after `start`.
    pub end: NaiveDate,
}

impl WeekWindow {
    /// Number of days in a window.
    pub const LENGTH_DAYS: u64 = 7;

    /// Creates the window that begins on `start`.
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + Days::new(Self::LENGTH_DAYS - 1),
        }
    }

    /// Returns the week containing `today`.
    pub fn current(today: NaiveDate, week_start: Weekday) -> Self {
        let offset = days_since(today.weekday(), week_start);
        Self::starting(today - Days::new(offset))
    }

    /// Returns the week after the one containing `today`.
    pub fn next(today: NaiveDate, week_start: Weekday) -> Self {
        Self::current(today, week_start).following()
    }

    /// Returns the window immediately after this one.
    pub fn following(&self) -> Self {
        Self::starting(self.start + Days::new(Self::LENGTH_DAYS))
    }

    /// Returns true if `date` falls within the window, both ends included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Selects the eligible events whose start date falls within the window.
    ///
    /// Only the start is considered; an event that begins on the last day and
    /// runs into the following week stays in this one. Input order is kept.
    pub fn filter<'a, I>(&self, events: I, zone: &ReportZone) -> Vec<CalendarEvent>
    where
        I: IntoIterator<Item = &'a CalendarEvent>,
    {
        events
            .into_iter()
            .filter(|e| e.is_eligible() && self.contains(zone.event_date(&e.start)))
            .cloned()
            .collect()
    }
}

/// Number of days from the most recent `week_start` to `day`.
fn days_since(day: Weekday, week_start: Weekday) -> u64 {
    let day = u64::from(day.num_days_from_monday());
    let start = u64::from(week_start.num_days_from_monday());
    (day + 7 - start) % 7
}

/// The events of one run, split into the current and the following week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekPartition {
    /// The current week.
    pub this_week: WeekWindow,
    /// The following week.
    pub next_week: WeekWindow,
    /// Eligible events starting in the current week.
    pub this_week_events: Vec<CalendarEvent>,
    /// Eligible events starting in the following week.
    pub next_week_events: Vec<CalendarEvent>,
}

impl WeekPartition {
    /// Partitions `events` relative to `today`.
    pub fn compute<'a, I>(events: I, today: NaiveDate, week_start: Weekday, zone: &ReportZone) -> Self
    where
        I: IntoIterator<Item = &'a CalendarEvent> + Clone,
    {
        let this_week = WeekWindow::current(today, week_start);
        let next_week = this_week.following();

        Self {
            this_week,
            next_week,
            this_week_events: this_week.filter(events.clone(), zone),
            next_week_events: next_week.filter(events, zone),
        }
    }
}
