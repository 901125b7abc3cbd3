//! Calendar entry types.
//!
//! This module provides the feed-level types the rest of the pipeline reads:
//! - [`EntryKind`]: The component type of a feed entry (`VEVENT`, `VTODO`, ...)
//! - [`CalendarEvent`]: A single feed entry with its summary and times
//! - [`CalendarFeed`]: The ordered set of entries parsed from one feed

use serde::{Deserialize, Serialize};

use crate::time::EventTime;

/// The component type of a calendar feed entry.
///
/// Only [`EntryKind::Event`] entries take part in the weekly digest; every
/// other kind is dropped before window filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A schedulable event (`VEVENT`).
    #[default]
    Event,
    /// A to-do item (`VTODO`).
    Todo,
    /// A journal entry (`VJOURNAL`).
    Journal,
    /// Free/busy information (`VFREEBUSY`).
    FreeBusy,
    /// A timezone definition (`VTIMEZONE`).
    TimeZone,
    /// Any other component.
    Other,
}

impl EntryKind {
    /// Returns the iCalendar component name for this kind.
    pub fn component_name(&self) -> &'static str {
        match self {
            Self::Event => "VEVENT",
            Self::Todo => "VTODO",
            Self::Journal => "VJOURNAL",
            Self::FreeBusy => "VFREEBUSY",
            Self::TimeZone => "VTIMEZONE",
            Self::Other => "X-COMPONENT",
        }
    }

    /// Returns true if entries of this kind are eligible for the digest.
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Event)
    }
}

/// A calendar feed entry.
///
/// This is read-only input to the digest pipeline; classification and
/// window filtering never modify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Opaque identifier of the entry within the feed (usually the UID).
    pub uid: String,
    /// Free-text summary (title) of the entry.
    pub summary: String,
    /// When the entry starts.
    pub start: EventTime,
    /// When the entry ends.
    pub end: EventTime,
    /// Component kind of the entry.
    pub kind: EntryKind,
}

impl CalendarEvent {
    /// Creates a new `VEVENT` entry.
    pub fn new(
        uid: impl Into<String>,
        summary: impl Into<String>,
        start: EventTime,
        end: EventTime,
    ) -> Self {
        Self {
            uid: uid.into(),
            summary: summary.into(),
            start,
            end,
            kind: EntryKind::Event,
        }
    }

    /// Builder method to set the entry kind.
    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns true if this entry takes part in the digest.
    pub fn is_eligible(&self) -> bool {
        self.kind.is_eligible()
    }
}

/// The entries parsed from a single calendar feed, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFeed {
    entries: Vec<CalendarEvent>,
}

impl CalendarFeed {
    /// Creates a feed from parsed entries.
    pub fn new(entries: Vec<CalendarEvent>) -> Self {
        Self { entries }
    }

    /// Returns every entry, eligible or not.
    pub fn entries(&self) -> &[CalendarEvent] {
        &self.entries
    }

    /// Iterates over the entries eligible for the digest.
    pub fn events(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.entries.iter().filter(|e| e.is_eligible())
    }

    /// Returns the total number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the feed has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CalendarEvent> for CalendarFeed {
    fn from_iter<I: IntoIterator<Item = CalendarEvent>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn all_day(uid: &str, summary: &str, d: u32) -> CalendarEvent {
        let date = NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
        CalendarEvent::new(
            uid,
            summary,
            EventTime::from_date(date),
            EventTime::from_date(date.succ_opt().unwrap()),
        )
    }

    #[test]
    fn component_names() {
        assert_eq!(EntryKind::Event.component_name(), "VEVENT");
        assert_eq!(EntryKind::Todo.component_name(), "VTODO");
        assert_eq!(EntryKind::TimeZone.component_name(), "VTIMEZONE");
        assert_eq!(EntryKind::Other.component_name(), "X-COMPONENT");
    }

    #[test]
    fn only_events_are_eligible() {
        assert!(EntryKind::Event.is_eligible());
        assert!(!EntryKind::Todo.is_eligible());
        assert!(!EntryKind::TimeZone.is_eligible());
        assert!(!EntryKind::Other.is_eligible());
    }

    #[test]
    fn feed_events_skip_other_kinds() {
        let feed: CalendarFeed = vec![
            all_day("a", "Ana's birthday", 3),
            all_day("tz", "Europe/Madrid", 3).with_kind(EntryKind::TimeZone),
            all_day("b", "Epiphany", 6),
        ]
        .into_iter()
        .collect();

        assert_eq!(feed.len(), 3);
        let uids: Vec<_> = feed.events().map(|e| e.uid.as_str()).collect();
        assert_eq!(uids, vec!["a", "b"]);
        assert_eq!(feed.entries()[1].kind, EntryKind::TimeZone);
    }

    #[test]
    fn serde_roundtrip() {
        let event = all_day("a", "Ana's birthday", 3);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"event\""));
        let parsed: CalendarEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }
}
