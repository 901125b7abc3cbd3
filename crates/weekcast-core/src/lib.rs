//! Core types: time, feed entries, week windows, classification, summaries

pub mod classify;
pub mod event;
pub mod pattern;
pub mod summary;
pub mod time;
pub mod tracing;
pub mod week;

pub use classify::{
    Bucket, CategorizedBuckets, ClassifiedEvent, Classifier, ExtractedFields, ExtractionError,
    MatcherRule, RuleKind,
};
pub use event::{CalendarEvent, CalendarFeed, EntryKind};
pub use pattern::{Pattern, Placeholder};
pub use summary::{
    Block, BucketTitles, DigestIntro, Locale, MessageDocument, Section, SectionLabels,
    SummaryBuilder, WeekLabel, format_date, render_text,
};
pub use time::{EventTime, ReportZone, ZoneError};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use week::{WeekPartition, WeekWindow};
