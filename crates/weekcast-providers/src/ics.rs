//! iCalendar (RFC 5545) parsing.
//!
//! Converts a feed body into a [`CalendarFeed`], keeping every component the
//! parser surfaces together with its [`EntryKind`] so that later stages can
//! filter by kind.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event, EventLike,
};
use tracing::{debug, warn};

use weekcast_core::{CalendarEvent, CalendarFeed, EntryKind, EventTime, ReportZone};

use crate::error::{ProviderError, ProviderResult};

/// Parses an iCalendar document into a feed.
///
/// Entries keep document order. A component without a `UID` gets a stand-in
/// built from its kind and position (`vevent-3@weekcast`), so it is still
/// classified and listed. `VEVENT`s without a `DTSTART` are skipped, a missing
/// `DTEND` falls back to the start, and a missing `SUMMARY` becomes an empty
/// string. Floating times are read in `zone`.
///
/// # Errors
///
/// Returns [`ProviderError::invalid_response`] when the body is not an
/// iCalendar document.
pub fn parse_feed(ics: &str, zone: &ReportZone) -> ProviderResult<CalendarFeed> {
    let body = ics.trim_start_matches('\u{feff}').trim_start();
    if !body.starts_with("BEGIN:VCALENDAR") {
        let preview: String = body.chars().take(40).collect();
        return Err(ProviderError::invalid_response(format!(
            "feed is not an iCalendar document (starts with {:?})",
            preview
        )));
    }

    let calendar = body
        .parse::<Calendar>()
        .map_err(|e| ProviderError::invalid_response(format!("failed to parse feed: {}", e)))?;

    let entries: Vec<CalendarEvent> = calendar
        .iter()
        .enumerate()
        .filter_map(|(index, component)| match component {
            CalendarComponent::Event(event) => parse_event(event, index, zone),
            CalendarComponent::Todo(todo) => parse_other(todo, EntryKind::Todo, index, zone),
            CalendarComponent::Venue(venue) => parse_other(venue, EntryKind::Other, index, zone),
            #[allow(unreachable_patterns)]
            _ => {
                debug!(index, "Skipping unsupported feed component");
                None
            }
        })
        .collect();

    debug!(entries = entries.len(), "Parsed feed");
    Ok(CalendarFeed::new(entries))
}

fn parse_event(event: &Event, index: usize, zone: &ReportZone) -> Option<CalendarEvent> {
    let summary = event.get_summary().unwrap_or_default();
    let Some(start) = event.get_start() else {
        warn!(summary, index, "Skipping event without DTSTART");
        return None;
    };
    let start = convert_date_time(start, zone);
    let end = event
        .get_end()
        .map(|end| convert_date_time(end, zone))
        .unwrap_or_else(|| start.clone());

    Some(CalendarEvent::new(
        entry_uid(event, EntryKind::Event, index),
        summary,
        start,
        end,
    ))
}

/// Reads a non-event component from its raw properties.
fn parse_other<C: Component>(
    component: &C,
    kind: EntryKind,
    index: usize,
    zone: &ReportZone,
) -> Option<CalendarEvent> {
    let start = ["DTSTART", "DUE", "DTSTAMP"]
        .iter()
        .find_map(|name| component.property_value(name))
        .and_then(|value| parse_icalendar_datetime(value, zone))?;

    Some(
        CalendarEvent::new(
            entry_uid(component, kind, index),
            component.get_summary().unwrap_or_default(),
            start.clone(),
            start,
        )
        .with_kind(kind),
    )
}

/// Returns the component's `UID`, or a stand-in derived from its position.
fn entry_uid<C: Component>(component: &C, kind: EntryKind, index: usize) -> String {
    match component.get_uid() {
        Some(uid) => uid.to_string(),
        None => {
            let uid = format!(
                "{}-{}@weekcast",
                kind.component_name().to_ascii_lowercase(),
                index
            );
            warn!(
                summary = component.get_summary().unwrap_or_default(),
                uid = %uid,
                "Feed entry has no UID, using its position"
            );
            uid
        }
    }
}

/// Converts icalendar's `DatePerhapsTime` into an [`EventTime`].
fn convert_date_time(dt: DatePerhapsTime, zone: &ReportZone) -> EventTime {
    match dt {
        DatePerhapsTime::Date(date) => EventTime::from_date(date),
        DatePerhapsTime::DateTime(cdt) => match cdt {
            CalendarDateTime::Utc(dt) => EventTime::from_utc(dt),
            CalendarDateTime::Floating(naive) => EventTime::from_utc(zone.resolve_naive(naive)),
            CalendarDateTime::WithTimezone { date_time, tzid } => {
                EventTime::from_utc(resolve_tzid(date_time, &tzid, zone))
            }
        },
    }
}

/// Resolves a local time with a `TZID` parameter.
///
/// Unknown zone names fall back to the report zone.
fn resolve_tzid(
    date_time: NaiveDateTime,
    tzid: &str,
    zone: &ReportZone,
) -> chrono::DateTime<Utc> {
    match tzid.parse::<Tz>() {
        Ok(tz) => match tz.from_local_datetime(&date_time).earliest() {
            Some(local) => local.with_timezone(&Utc),
            None => zone.resolve_naive(date_time),
        },
        Err(_) => {
            warn!(tzid, "Unknown TZID, reading time in the report zone");
            zone.resolve_naive(date_time)
        }
    }
}

/// Parses a raw iCalendar date or datetime value.
///
/// Handles `20250205T100000Z` (UTC), `20250205T100000` (floating, read in
/// `zone`) and `20250205` (date only).
pub fn parse_icalendar_datetime(s: &str, zone: &ReportZone) -> Option<EventTime> {
    let s = s.trim();

    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        let date = NaiveDate::parse_from_str(s, "%Y%m%d").ok()?;
        return Some(EventTime::from_date(date));
    }

    if let Some(utc) = s.strip_suffix('Z') {
        let dt = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S").ok()?;
        return Some(EventTime::from_utc(Utc.from_utc_datetime(&dt)));
    }

    NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%S")
        .ok()
        .map(|naive| EventTime::from_utc(zone.resolve_naive(naive)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    const UTC_ZONE: ReportZone = ReportZone::Named(Tz::UTC);

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry<'a>(feed: &'a CalendarFeed, uid: &str) -> &'a CalendarEvent {
        feed.entries()
            .iter()
            .find(|e| e.uid == uid)
            .unwrap_or_else(|| panic!("no entry with uid {uid}"))
    }

    fn factorial_ics() -> &'static str {
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Factorial//Calendar//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:birthday-1@factorial\r\n\
         DTSTART;VALUE=DATE:20250109\r\n\
         DTEND;VALUE=DATE:20250110\r\n\
         SUMMARY:Bea's birthday\r\n\
         END:VEVENT\r\n\
         BEGIN:VEVENT\r\n\
         UID:leave-1@factorial\r\n\
         DTSTART;VALUE=DATE:20250108\r\n\
         DTEND;VALUE=DATE:20250113\r\n\
         SUMMARY:Pablo on leave (5 days)\r\n\
         END:VEVENT\r\n\
         BEGIN:VEVENT\r\n\
         UID:offsite-1@factorial\r\n\
         DTSTART:20250110T090000Z\r\n\
         DTEND:20250110T170000Z\r\n\
         SUMMARY:Company offsite\r\n\
         END:VEVENT\r\n\
         BEGIN:VTODO\r\n\
         UID:todo-1@factorial\r\n\
         DTSTAMP:20250101T000000Z\r\n\
         DTSTART:20250109T080000Z\r\n\
         SUMMARY:Review contracts\r\n\
         END:VTODO\r\n\
         END:VCALENDAR\r\n"
    }

    #[test]
    fn parse_feed_keeps_document_order_and_kinds() {
        let feed = parse_feed(factorial_ics(), &UTC_ZONE).unwrap();
        let uids: Vec<_> = feed.entries().iter().map(|e| e.uid.as_str()).collect();
        assert_eq!(
            uids,
            vec![
                "birthday-1@factorial",
                "leave-1@factorial",
                "offsite-1@factorial",
                "todo-1@factorial"
            ]
        );

        let todo = entry(&feed, "todo-1@factorial");
        assert_eq!(todo.kind, EntryKind::Todo);
        assert_eq!(todo.summary, "Review contracts");
        assert_eq!(feed.events().count(), 3);
    }

    #[test]
    fn parse_all_day_and_timed() {
        let feed = parse_feed(factorial_ics(), &UTC_ZONE).unwrap();

        let birthday = entry(&feed, "birthday-1@factorial");
        assert_eq!(birthday.summary, "Bea's birthday");
        assert_eq!(birthday.start, EventTime::from_date(date(2025, 1, 9)));
        assert_eq!(birthday.end, EventTime::from_date(date(2025, 1, 10)));

        let offsite = entry(&feed, "offsite-1@factorial");
        assert_eq!(
            offsite.start,
            EventTime::from_utc(Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn tzid_is_resolved() {
        let ics = "BEGIN:VCALENDAR\r\n\
                   VERSION:2.0\r\n\
                   BEGIN:VEVENT\r\n\
                   UID:madrid-1\r\n\
                   DTSTART;TZID=Europe/Madrid:20250110T000030\r\n\
                   DTEND;TZID=Europe/Madrid:20250110T010000\r\n\
                   SUMMARY:Midnight release\r\n\
                   END:VEVENT\r\n\
                   END:VCALENDAR\r\n";
        let feed = parse_feed(ics, &UTC_ZONE).unwrap();
        let event = entry(&feed, "madrid-1");
        assert_eq!(
            event.start,
            EventTime::from_utc(Utc.with_ymd_and_hms(2025, 1, 9, 23, 0, 30).unwrap())
        );
        // Friday in Madrid, Thursday in UTC
        assert_eq!(UTC_ZONE.event_date(&event.start), date(2025, 1, 9));
        let madrid = ReportZone::Named(chrono_tz::Europe::Madrid);
        assert_eq!(madrid.event_date(&event.start), date(2025, 1, 10));
    }

    #[test]
    fn missing_end_and_summary() {
        let ics = "BEGIN:VCALENDAR\r\n\
                   VERSION:2.0\r\n\
                   BEGIN:VEVENT\r\n\
                   UID:bare-1\r\n\
                   DTSTART;VALUE=DATE:20250106\r\n\
                   END:VEVENT\r\n\
                   BEGIN:VEVENT\r\n\
                   SUMMARY:No uid\r\n\
                   DTSTART;VALUE=DATE:20250106\r\n\
                   END:VEVENT\r\n\
                   END:VCALENDAR\r\n";
        let feed = parse_feed(ics, &UTC_ZONE).unwrap();
        assert_eq!(feed.len(), 2);
        let event = entry(&feed, "bare-1");
        assert_eq!(event.summary, "");
        assert_eq!(event.start, event.end);
    }

    #[test]
    fn entries_without_uid_are_kept() {
        let ics = "BEGIN:VCALENDAR\r\n\
                   VERSION:2.0\r\n\
                   BEGIN:VEVENT\r\n\
                   UID:birthday-1@factorial\r\n\
                   DTSTART;VALUE=DATE:20250109\r\n\
                   SUMMARY:Bea's birthday\r\n\
                   END:VEVENT\r\n\
                   BEGIN:VEVENT\r\n\
                   DTSTART;VALUE=DATE:20250110\r\n\
                   SUMMARY:Luis's birthday\r\n\
                   END:VEVENT\r\n\
                   BEGIN:VEVENT\r\n\
                   UID:no-start\r\n\
                   SUMMARY:Floating idea\r\n\
                   END:VEVENT\r\n\
                   END:VCALENDAR\r\n";
        let feed = parse_feed(ics, &UTC_ZONE).unwrap();
        let uids: Vec<_> = feed.entries().iter().map(|e| e.uid.as_str()).collect();
        assert_eq!(uids, vec!["birthday-1@factorial", "vevent-1@weekcast"]);

        let luis = entry(&feed, "vevent-1@weekcast");
        assert_eq!(luis.summary, "Luis's birthday");
        assert_eq!(luis.kind, EntryKind::Event);
        assert_eq!(luis.start, EventTime::from_date(date(2025, 1, 10)));
    }

    #[test]
    fn html_body_is_rejected() {
        let err = parse_feed("<!DOCTYPE html><html>Sign in</html>", &UTC_ZONE).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
        assert!(err.message().contains("not an iCalendar document"));
    }

    #[test]
    fn empty_calendar_is_an_empty_feed() {
        let ics = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n";
        let feed = parse_feed(ics, &UTC_ZONE).unwrap();
        assert!(feed.is_empty());
    }

    #[test]
    fn raw_datetime_values() {
        assert_eq!(
            parse_icalendar_datetime("20250210", &UTC_ZONE),
            Some(EventTime::from_date(date(2025, 2, 10)))
        );
        assert_eq!(
            parse_icalendar_datetime("20250205T143000Z", &UTC_ZONE),
            Some(EventTime::from_utc(
                Utc.with_ymd_and_hms(2025, 2, 5, 14, 30, 0).unwrap()
            ))
        );
        let madrid = ReportZone::Named(chrono_tz::Europe::Madrid);
        assert_eq!(
            parse_icalendar_datetime("20250205T143000", &madrid),
            Some(EventTime::from_utc(
                Utc.with_ymd_and_hms(2025, 2, 5, 13, 30, 0).unwrap()
            ))
        );
        assert_eq!(parse_icalendar_datetime("tomorrow", &UTC_ZONE), None);
    }
}
