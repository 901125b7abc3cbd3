//! Digest summaries.
//!
//! This module turns [`CategorizedBuckets`] into display-ready [`Section`]s:
//! one section per non-empty bucket, in the fixed order first days,
//! birthdays, anniversaries, leaves, holidays. Each section carries a title
//! and one line per event:
//!
//! | Bucket      | Line                                  |
//! |-------------|---------------------------------------|
//! | first day   | `Ana (03/01)`                         |
//! | birthday    | `Ana (03/01)`                         |
//! | anniversary | `Luis - 3 año(s) (03/01)`             |
//! | leave       | `Pablo - 5 día(s) (03/01)`            |
//! | holiday     | `Epiphany (06/01)`                    |
//!
//! The [`document`] submodule assembles sections into a platform-neutral
//! [`MessageDocument`] and a plain-text console report.
//!
//! # Example
//!
//! ```rust
//! use weekcast_core::summary::{Locale, SectionLabels, SummaryBuilder, WeekLabel};
//! use weekcast_core::{CategorizedBuckets, ReportZone};
//!
//! let builder = SummaryBuilder::new(SectionLabels::default(), Locale::Es, ReportZone::Local);
//! let sections = builder.build(&CategorizedBuckets::new(), WeekLabel::ThisWeek);
//! assert!(sections.is_empty());
//! ```

pub mod document;


use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classify::{Bucket, CategorizedBuckets, ClassifiedEvent, ExtractedFields};
use crate::time::ReportZone;

pub use document::{Block, DigestIntro, MessageDocument, render_text};

/// Language for unit words in summary lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    /// Spanish (`año(s)`, `día(s)`).
    #[default]
    Es,
    /// English (`year(s)`, `day(s)`).
    En,
}

impl Locale {
    /// Unit word for anniversary years.
    pub fn years_unit(&self) -> &'static str {
        match self {
            Self::Es => "año(s)",
            Self::En => "year(s)",
        }
    }

    /// Unit word for leave days.
    pub fn days_unit(&self) -> &'static str {
        match self {
            Self::Es => "día(s)",
            Self::En => "day(s)",
        }
    }
}

/// Which of the two windows a summary describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekLabel {
    /// The current week.
    ThisWeek,
    /// The following week.
    NextWeek,
}

/// Section titles for each bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketTitles {
    /// Title for new hires.
    pub first_day: String,
    /// Title for birthdays.
    pub birthday: String,
    /// Title for anniversaries.
    pub anniversary: String,
    /// Title for leaves.
    pub leave: String,
    /// Title for holidays and other unclassified events.
    pub holiday: String,
}

impl BucketTitles {
    /// Slack titles for the current week.
    pub fn slack_this_week() -> Self {
        Self {
            first_day: ":new: *Nuevas incorporaciones:*".to_string(),
            birthday: ":partying_face: *Cumpleaños:*".to_string(),
            anniversary: ":tada: *Aniversarios de empresa:*".to_string(),
            leave: ":palm_tree: *Ausencias:*".to_string(),
            holiday: ":luffy-wooho: *Días festivos:*".to_string(),
        }
    }

    /// Slack titles for the following week.
    pub fn slack_next_week() -> Self {
        Self {
            first_day: ":new: *Nuevas incorporaciones la próxima semana:*".to_string(),
            birthday: ":partying_face: *Cumpleaños la próxima semana:*".to_string(),
            anniversary: ":tada: *Aniversarios de empresa la próxima semana:*".to_string(),
            leave: ":palm_tree: *Ausencias la próxima semana:*".to_string(),
            holiday: ":homer-whoohoo: *Días festivos para la próxima semana:*".to_string(),
        }
    }

    /// Plain titles for console output.
    pub fn console() -> Self {
        Self {
            first_day: "First Days:".to_string(),
            birthday: "Birthdays:".to_string(),
            anniversary: "Anniversaries:".to_string(),
            leave: "Leaves:".to_string(),
            holiday: "Holidays:".to_string(),
        }
    }

    /// Returns the title for a bucket.
    pub fn get(&self, bucket: Bucket) -> &str {
        match bucket {
            Bucket::FirstDay => &self.first_day,
            Bucket::Birthday => &self.birthday,
            Bucket::Anniversary => &self.anniversary,
            Bucket::Leave => &self.leave,
            Bucket::Holiday => &self.holiday,
        }
    }
}

impl Default for BucketTitles {
    fn default() -> Self {
        Self::slack_this_week()
    }
}

/// Section titles for both weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionLabels {
    /// Titles used for the current week.
    pub this_week: BucketTitles,
    /// Titles used for the following week.
    pub next_week: BucketTitles,
}

impl SectionLabels {
    /// Plain titles for console output, identical for both weeks.
    pub fn console() -> Self {
        Self {
            this_week: BucketTitles::console(),
            next_week: BucketTitles::console(),
        }
    }

    /// Returns the title for a bucket in the given week.
    pub fn title(&self, bucket: Bucket, week: WeekLabel) -> &str {
        match week {
            WeekLabel::ThisWeek => self.this_week.get(bucket),
            WeekLabel::NextWeek => self.next_week.get(bucket),
        }
    }
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self {
            this_week: BucketTitles::slack_this_week(),
            next_week: BucketTitles::slack_next_week(),
        }
    }
}

/// A titled group of summary lines for one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// The bucket this section lists.
    pub bucket: Bucket,
    /// Display title.
    pub title: String,
    /// One line per event, in classification order.
    pub lines: Vec<String>,
}

/// Builds summary sections from classified events.
#[derive(Debug, Clone, Default)]
pub struct SummaryBuilder {
    labels: SectionLabels,
    locale: Locale,
    zone: ReportZone,
}

impl SummaryBuilder {
    /// Creates a builder.
    pub fn new(labels: SectionLabels, locale: Locale, zone: ReportZone) -> Self {
        Self {
            labels,
            locale,
            zone,
        }
    }

    /// Builds one section per non-empty bucket, in display order.
    pub fn build(&self, buckets: &CategorizedBuckets, week: WeekLabel) -> Vec<Section> {
        self.build_only(buckets, week, &Bucket::ALL)
    }

    /// Like [`build`](Self::build), restricted to the listed buckets.
    ///
    /// Display order is always the fixed bucket order, whatever the order of
    /// `include`.
    pub fn build_only(
        &self,
        buckets: &CategorizedBuckets,
        week: WeekLabel,
        include: &[Bucket],
    ) -> Vec<Section> {
        buckets
            .non_empty()
            .filter(|(bucket, _)| include.contains(bucket))
            .map(|(bucket, events)| Section {
                bucket,
                title: self.labels.title(bucket, week).to_string(),
                lines: events.iter().map(|e| self.format_line(e)).collect(),
            })
            .collect()
    }

    /// Formats a single summary line.
    pub fn format_line(&self, classified: &ClassifiedEvent) -> String {
        let date = format_date(self.zone.event_date(&classified.event.start));
        match &classified.fields {
            ExtractedFields::FirstDay { name } | ExtractedFields::Birthday { name } => {
                format!("{} ({})", name, date)
            }
            ExtractedFields::Anniversary { name, years } => {
                format!("{} - {} {} ({})", name, years, self.locale.years_unit(), date)
            }
            ExtractedFields::Leave { name, days } => {
                format!("{} - {} {} ({})", name, days, self.locale.days_unit(), date)
            }
            ExtractedFields::Unclassified => {
                format!("{} ({})", classified.event.summary, date)
            }
        }
    }
}

/// Formats a date as zero-padded `DD/MM`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Classifier, RuleKind};
    use crate::event::CalendarEvent;
    use crate::time::EventTime;
    use chrono::{TimeZone, Utc};
    use chrono_tz::Tz;

    const UTC_ZONE: ReportZone = ReportZone::Named(Tz::UTC);

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event_on(uid: &str, summary: &str, d: NaiveDate) -> CalendarEvent {
        CalendarEvent::new(
            uid,
            summary,
            EventTime::from_date(d),
            EventTime::from_date(d.succ_opt().unwrap()),
        )
    }

    fn classifier() -> Classifier {
        Classifier::from_config([
            ("firstDayAnnouncement", "%s's first day!"),
            ("birthdayAnnouncement", "%s's birthday"),
            ("companyAnniversaryAnnouncementFirstYear", "%s's first year anniversary"),
            ("companyAnniversaryAnnouncementMultipleYears", "%s's %d year anniversary"),
            ("leaveAnnouncement", "%s on leave (%d days)"),
        ])
    }

    fn builder(locale: Locale) -> SummaryBuilder {
        SummaryBuilder::new(SectionLabels::default(), locale, UTC_ZONE)
    }

    #[test]
    fn format_date_is_zero_padded() {
        assert_eq!(format_date(date(2025, 1, 3)), "03/01");
        assert_eq!(format_date(date(2025, 12, 25)), "25/12");
    }

    #[test]
    fn line_formats_per_bucket() {
        let d = date(2025, 1, 3);
        let events = [
            event_on("1", "Ana's first day!", d),
            event_on("2", "Bea's birthday", d),
            event_on("3", "Marta's first year anniversary", d),
            event_on("4", "Luis's 3 year anniversary", d),
            event_on("5", "Pablo on leave (5 days)", d),
            event_on("6", "Epiphany", date(2025, 1, 6)),
        ];
        let buckets = classifier().classify(&events);
        let lines: Vec<String> = builder(Locale::Es)
            .build(&buckets, WeekLabel::ThisWeek)
            .into_iter()
            .flat_map(|s| s.lines)
            .collect();

        assert_eq!(
            lines,
            vec![
                "Ana (03/01)",
                "Bea (03/01)",
                "Marta - 1 año(s) (03/01)",
                "Luis - 3 año(s) (03/01)",
                "Pablo - 5 día(s) (03/01)",
                "Epiphany (06/01)",
            ]
        );
    }

    #[test]
    fn english_units() {
        let d = date(2025, 1, 3);
        let events = [
            event_on("1", "Luis's 3 year anniversary", d),
            event_on("2", "Pablo on leave (5 days)", d),
        ];
        let buckets = classifier().classify(&events);
        let sections = builder(Locale::En).build(&buckets, WeekLabel::ThisWeek);
        assert_eq!(sections[0].lines, vec!["Luis - 3 year(s) (03/01)"]);
        assert_eq!(sections[1].lines, vec!["Pablo - 5 day(s) (03/01)"]);
    }

    #[test]
    fn date_uses_report_zone() {
        // 23:30 UTC on Jan 2 is Jan 3 in Madrid.
        let start = Utc.with_ymd_and_hms(2025, 1, 2, 23, 30, 0).unwrap();
        let event = CalendarEvent::new(
            "1",
            "Team dinner",
            EventTime::from_utc(start),
            EventTime::from_utc(start + chrono::Duration::hours(2)),
        );
        let buckets = classifier().classify(&[event]);

        let madrid = SummaryBuilder::new(
            SectionLabels::default(),
            Locale::Es,
            ReportZone::Named(chrono_tz::Europe::Madrid),
        );
        let sections = madrid.build(&buckets, WeekLabel::ThisWeek);
        assert_eq!(sections[0].lines, vec!["Team dinner (03/01)"]);

        let sections = builder(Locale::Es).build(&buckets, WeekLabel::ThisWeek);
        assert_eq!(sections[0].lines, vec!["Team dinner (02/01)"]);
    }

    #[test]
    fn empty_buckets_emit_no_sections() {
        let buckets = classifier().classify(std::iter::empty());
        assert!(builder(Locale::Es).build(&buckets, WeekLabel::ThisWeek).is_empty());

        let events = [event_on("1", "Bea's birthday", date(2025, 1, 3))];
        let buckets = classifier().classify(&events);
        let sections = builder(Locale::Es).build(&buckets, WeekLabel::ThisWeek);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].bucket, Bucket::Birthday);
        assert_eq!(sections[0].title, ":partying_face: *Cumpleaños:*");
    }

    #[test]
    fn sections_follow_display_order() {
        let d = date(2025, 1, 3);
        let events = [
            event_on("1", "Epiphany", d),
            event_on("2", "Pablo on leave (5 days)", d),
            event_on("3", "Bea's birthday", d),
            event_on("4", "Ana's first day!", d),
        ];
        let buckets = classifier().classify(&events);
        let order: Vec<Bucket> = builder(Locale::Es)
            .build(&buckets, WeekLabel::ThisWeek)
            .iter()
            .map(|s| s.bucket)
            .collect();
        assert_eq!(
            order,
            vec![Bucket::FirstDay, Bucket::Birthday, Bucket::Leave, Bucket::Holiday]
        );
    }

    #[test]
    fn lines_keep_classification_order() {
        let events = [
            event_on("1", "Zoe's birthday", date(2025, 1, 7)),
            event_on("2", "Ana's birthday", date(2025, 1, 3)),
        ];
        let buckets = classifier().classify(&events);
        let sections = builder(Locale::Es).build(&buckets, WeekLabel::ThisWeek);
        assert_eq!(sections[0].lines, vec!["Zoe (07/01)", "Ana (03/01)"]);
    }

    #[test]
    fn build_only_restricts_buckets() {
        let d = date(2025, 1, 10);
        let events = [event_on("1", "Bea's birthday", d), event_on("2", "Carnival", d)];
        let buckets = classifier().classify(&events);
        let sections =
            builder(Locale::Es).build_only(&buckets, WeekLabel::NextWeek, &[Bucket::Holiday]);
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].title,
            ":homer-whoohoo: *Días festivos para la próxima semana:*"
        );
        assert_eq!(sections[0].lines, vec!["Carnival (10/01)"]);
    }

    #[test]
    fn console_labels() {
        let labels = SectionLabels::console();
        assert_eq!(labels.title(Bucket::Leave, WeekLabel::ThisWeek), "Leaves:");
        assert_eq!(labels.title(Bucket::Leave, WeekLabel::NextWeek), "Leaves:");
        assert_eq!(RuleKind::Leave.bucket(), Bucket::Leave);
    }

    #[test]
    fn partial_title_overrides_keep_defaults() {
        let json = r#"{"this_week": {"holiday": "*Holidays*"}}"#;
        let labels: SectionLabels = serde_json::from_str(json).unwrap();
        assert_eq!(labels.title(Bucket::Holiday, WeekLabel::ThisWeek), "*Holidays*");
        assert_eq!(
            labels.title(Bucket::Birthday, WeekLabel::ThisWeek),
            ":partying_face: *Cumpleaños:*"
        );
        assert_eq!(
            labels.title(Bucket::Holiday, WeekLabel::NextWeek),
            ":homer-whoohoo: *Días festivos para la próxima semana:*"
        );
    }
}
