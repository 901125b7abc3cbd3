//! Weekly report assembly: partition, classify, render.

use chrono::NaiveDate;
use tracing::{debug, info};
use weekcast_core::{
    CalendarFeed, CategorizedBuckets, Classifier, DigestIntro, Locale, MessageDocument,
    SectionLabels, SummaryBuilder, WeekLabel, WeekPartition, render_text,
};

use crate::config::WeekcastConfig;

/// The classified events of one run.
#[derive(Debug, Clone)]
pub struct WeeklyReport {
    /// Week windows and the events that fell in each.
    pub partition: WeekPartition,
    /// Classified events of the current week.
    pub this_week: CategorizedBuckets,
    /// Classified events of the following week.
    pub next_week: CategorizedBuckets,
}

impl WeeklyReport {
    /// Partitions and classifies `feed` relative to `today`.
    pub fn compute(
        feed: &CalendarFeed,
        today: NaiveDate,
        config: &WeekcastConfig,
        classifier: &Classifier,
    ) -> Self {
        let zone = config.report.timezone;
        let partition =
            WeekPartition::compute(feed.entries(), today, config.report.week_start, &zone);

        info!(
            today = %today,
            week_start = %partition.this_week.start,
            next_week_start = %partition.next_week.start,
            this_week_events = partition.this_week_events.len(),
            next_week_events = partition.next_week_events.len(),
            "Partitioned feed"
        );

        let this_week = classifier.classify(&partition.this_week_events);
        let next_week = classifier.classify(&partition.next_week_events);

        let anomalies = this_week.anomalies() + next_week.anomalies();
        if anomalies > 0 {
            info!(anomalies, "Some events could not be classified");
        }

        Self {
            partition,
            this_week,
            next_week,
        }
    }

    /// Plain-text report of both weeks, all buckets, English titles.
    pub fn console(&self, config: &WeekcastConfig) -> String {
        let builder = SummaryBuilder::new(
            SectionLabels::console(),
            Locale::En,
            config.report.timezone,
        );
        let this_week = builder.build(&self.this_week, WeekLabel::ThisWeek);
        let next_week = builder.build(&self.next_week, WeekLabel::NextWeek);

        let mut out = render_text("Events This Week", &this_week);
        out.push('\n');
        out.push_str(&render_text("Events Next Week", &next_week));
        out
    }

    /// Slack digest document.
    ///
    /// The following week only lists the buckets named in `report.next_week`.
    pub fn document(&self, config: &WeekcastConfig) -> MessageDocument {
        let report = &config.report;
        let builder = SummaryBuilder::new(config.labels.clone(), report.locale, report.timezone);
        let this_week = builder.build(&self.this_week, WeekLabel::ThisWeek);
        let next_week = builder.build_only(&self.next_week, WeekLabel::NextWeek, &report.next_week);
        debug!(
            this_week_sections = this_week.len(),
            next_week_sections = next_week.len(),
            "Built digest sections"
        );

        let intro = DigestIntro::for_company(&report.company, report.locale);
        MessageDocument::digest(&intro, &this_week, &next_week)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatcherSettings;
    use weekcast_core::{Block, CalendarEvent, EntryKind, EventTime, ReportZone};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn all_day(uid: &str, summary: &str, date: NaiveDate) -> CalendarEvent {
        CalendarEvent::new(
            uid,
            summary,
            EventTime::from_date(date),
            EventTime::from_date(date),
        )
    }

    fn config() -> WeekcastConfig {
        let mut config = WeekcastConfig::default();
        config.report.timezone = ReportZone::Named(chrono_tz::Europe::Madrid);
        config.matchers = vec![
            MatcherSettings {
                key: "birthdayAnnouncement".into(),
                pattern: "Cumpleaños de %s".into(),
            },
            MatcherSettings {
                key: "leaveAnnouncement".into(),
                pattern: "%s de vacaciones %d días".into(),
            },
        ];
        config
    }

    // Week of Sunday 2025-01-05 .. Saturday 2025-01-11, today Wednesday.
    fn feed() -> CalendarFeed {
        CalendarFeed::new(vec![
            all_day("1", "Cumpleaños de Ana", day(2025, 1, 7)),
            all_day("2", "Luis de vacaciones 3 días", day(2025, 1, 9)),
            all_day("3", "Reyes", day(2025, 1, 6)),
            all_day("4", "Cumpleaños de Marta", day(2025, 1, 14)),
            all_day("5", "San Vicente", day(2025, 1, 17)),
            all_day("6", "Entregar informe", day(2025, 1, 8)).with_kind(EntryKind::Todo),
            all_day("7", "Cumpleaños de Pedro", day(2025, 1, 20)),
        ])
    }

    fn report(config: &WeekcastConfig) -> WeeklyReport {
        WeeklyReport::compute(&feed(), day(2025, 1, 8), config, &config.classifier())
    }

    #[test]
    fn partitions_and_classifies_both_weeks() {
        let report = report(&config());
        assert_eq!(report.partition.this_week.start, day(2025, 1, 5));
        assert_eq!(report.this_week.len(), 3);
        assert_eq!(report.next_week.len(), 2);
        assert_eq!(report.this_week.anomalies(), 0);
    }

    #[test]
    fn console_report() {
        let config = config();
        insta::assert_snapshot!(report(&config).console(&config), @r"
        === Events This Week ===

        Birthdays:
          - Ana (07/01)

        Leaves:
          - Luis - 3 day(s) (09/01)

        Holidays:
          - Reyes (06/01)

        === Events Next Week ===

        Birthdays:
          - Marta (14/01)

        Holidays:
          - San Vicente (17/01)
        ");
    }

    #[test]
    fn slack_next_week_lists_only_configured_buckets() {
        let config = config();
        let doc = report(&config).document(&config);

        let texts: Vec<&str> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();

        assert!(texts.iter().any(|t| t.contains("Ana (07/01)")));
        assert!(texts.iter().any(|t| t.contains("San Vicente (17/01)")));
        assert!(!texts.iter().any(|t| t.contains("Marta")));
        assert!(doc.text.contains("Orbitant"));
    }

    #[test]
    fn next_week_divider_only_when_needed() {
        let mut config = config();
        config.report.next_week.clear();
        let doc = report(&config).document(&config);

        let dividers = doc.blocks.iter().filter(|b| matches!(b, Block::Divider)).count();
        assert_eq!(dividers, 1);
    }
}
