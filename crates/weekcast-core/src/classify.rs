//! Event classification.
//!
//! A [`Classifier`] holds an ordered list of [`MatcherRule`]s. Each event
//! summary is tried against the rules in order and the first full match
//! decides the event's [`Bucket`] and [`ExtractedFields`]. Events that match
//! no rule land in [`Bucket::Holiday`] with their summary kept for display.
//!
//! Rule kinds are resolved from configuration keys once, when the rule is
//! built. Each kind declares the fields its template must capture (its
//! [`Capture`] layout) and the template's placeholders are bound to those
//! fields by type at build time. Templates whose placeholders do not cover
//! the layout are disabled up front instead of failing per event.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::event::CalendarEvent;
use crate::pattern::{Pattern, Placeholder};

/// A field captured from a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capture {
    /// A person's name (`%s`).
    Name,
    /// Years at the company (`%d`).
    Years,
    /// Length of a leave in days (`%d`).
    Days,
}

impl Capture {
    /// The placeholder a template must use for this field.
    pub fn placeholder(&self) -> Placeholder {
        match self {
            Self::Name => Placeholder::Text,
            Self::Years | Self::Days => Placeholder::Digits,
        }
    }
}

/// The closed set of rule kinds a matcher can be configured as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// A new hire's first day.
    FirstDay,
    /// A birthday.
    Birthday,
    /// First company anniversary; the template only names the person.
    AnniversaryFirstYear,
    /// Later company anniversaries; the template carries the years.
    AnniversaryMultiYear,
    /// A leave of absence.
    Leave,
}

impl RuleKind {
    /// All rule kinds.
    pub const ALL: [RuleKind; 5] = [
        Self::FirstDay,
        Self::Birthday,
        Self::AnniversaryFirstYear,
        Self::AnniversaryMultiYear,
        Self::Leave,
    ];

    /// Resolves a configuration key.
    ///
    /// The well-known keys map directly. Any other key containing
    /// `Anniversary` is an anniversary rule: first-year if the key also
    /// contains `FirstYear`, multi-year otherwise.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "firstDayAnnouncement" => Some(Self::FirstDay),
            "birthdayAnnouncement" => Some(Self::Birthday),
            "companyAnniversaryAnnouncementFirstYear" => Some(Self::AnniversaryFirstYear),
            "companyAnniversaryAnnouncementMultipleYears" => Some(Self::AnniversaryMultiYear),
            "leaveAnnouncement" => Some(Self::Leave),
            k if k.contains("Anniversary") && k.contains("FirstYear") => {
                Some(Self::AnniversaryFirstYear)
            }
            k if k.contains("Anniversary") => Some(Self::AnniversaryMultiYear),
            _ => None,
        }
    }

    /// Returns the canonical configuration key for this kind.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FirstDay => "firstDayAnnouncement",
            Self::Birthday => "birthdayAnnouncement",
            Self::AnniversaryFirstYear => "companyAnniversaryAnnouncementFirstYear",
            Self::AnniversaryMultiYear => "companyAnniversaryAnnouncementMultipleYears",
            Self::Leave => "leaveAnnouncement",
        }
    }

    /// The fields this kind's template captures, in canonical order.
    pub fn layout(&self) -> &'static [Capture] {
        match self {
            Self::FirstDay | Self::Birthday | Self::AnniversaryFirstYear => &[Capture::Name],
            Self::AnniversaryMultiYear => &[Capture::Years, Capture::Name],
            Self::Leave => &[Capture::Name, Capture::Days],
        }
    }

    /// The output bucket for events matched by this kind.
    pub fn bucket(&self) -> Bucket {
        match self {
            Self::FirstDay => Bucket::FirstDay,
            Self::Birthday => Bucket::Birthday,
            Self::AnniversaryFirstYear | Self::AnniversaryMultiYear => Bucket::Anniversary,
            Self::Leave => Bucket::Leave,
        }
    }

    /// Binds a template's placeholders to this kind's fields.
    ///
    /// `%s` binds the name and `%d` the kind's number, so a template may list
    /// them in either order. Returns `None` unless the placeholders cover the
    /// layout exactly.
    pub fn bind(&self, placeholders: &[Placeholder]) -> Option<Vec<Capture>> {
        let numeric = self
            .layout()
            .iter()
            .copied()
            .find(|c| c.placeholder() == Placeholder::Digits);

        let bound: Vec<Capture> = placeholders
            .iter()
            .map(|p| match p {
                Placeholder::Text => Some(Capture::Name),
                Placeholder::Digits => numeric,
            })
            .collect::<Option<_>>()?;

        let mut expected = self.layout().to_vec();
        let mut found = bound.clone();
        expected.sort();
        found.sort();
        (expected == found).then_some(bound)
    }
}

/// Output category, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// New hires.
    FirstDay,
    /// Birthdays.
    Birthday,
    /// Company anniversaries, both variants.
    Anniversary,
    /// Leaves of absence.
    Leave,
    /// Everything no rule matched, shown as holidays.
    Holiday,
}

impl Bucket {
    /// All buckets in display order.
    pub const ALL: [Bucket; 5] = [
        Self::FirstDay,
        Self::Birthday,
        Self::Anniversary,
        Self::Leave,
        Self::Holiday,
    ];

    fn index(&self) -> usize {
        match self {
            Self::FirstDay => 0,
            Self::Birthday => 1,
            Self::Anniversary => 2,
            Self::Leave => 3,
            Self::Holiday => 4,
        }
    }

    /// Returns the snake_case name of this bucket.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstDay => "first_day",
            Self::Birthday => "birthday",
            Self::Anniversary => "anniversary",
            Self::Leave => "leave",
            Self::Holiday => "holiday",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed data extracted from a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtractedFields {
    /// A first day.
    FirstDay { name: String },
    /// A birthday.
    Birthday { name: String },
    /// A company anniversary.
    Anniversary { name: String, years: u32 },
    /// A leave of absence.
    Leave { name: String, days: u32 },
    /// No rule matched; the event summary is displayed as-is.
    Unclassified,
}

impl ExtractedFields {
    /// Returns the extracted name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::FirstDay { name }
            | Self::Birthday { name }
            | Self::Anniversary { name, .. }
            | Self::Leave { name, .. } => Some(name),
            Self::Unclassified => None,
        }
    }
}

/// A summary matched a rule but its captures could not be turned into fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// A capture group the layout relies on did not participate in the match.
    #[error("rule '{rule}' matched without capture {index}")]
    MissingCapture { rule: &'static str, index: usize },

    /// A numeric capture could not be parsed.
    #[error("rule '{rule}' captured non-numeric value '{value}'")]
    InvalidNumber { rule: &'static str, value: String },
}

/// A rule kind paired with its compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherRule {
    kind: RuleKind,
    pattern: Pattern,
    captures: Vec<Capture>,
}

impl MatcherRule {
    /// Builds a rule from a template.
    ///
    /// A template whose placeholders do not fit the kind's layout is logged
    /// and replaced by an inert pattern.
    pub fn new(kind: RuleKind, template: &str) -> Self {
        let pattern = Pattern::compile(template);
        if pattern.is_inert() {
            return Self::disabled(kind, template);
        }

        match kind.bind(pattern.placeholders()) {
            Some(captures) => Self {
                kind,
                pattern,
                captures,
            },
            None => {
                warn!(
                    rule = kind.key(),
                    template,
                    found = ?pattern.placeholders(),
                    expected = ?kind.layout(),
                    "Template placeholders do not fit rule layout, disabling rule"
                );
                Self::disabled(kind, template)
            }
        }
    }

    fn disabled(kind: RuleKind, template: &str) -> Self {
        Self {
            kind,
            pattern: Pattern::inert(template),
            captures: Vec::new(),
        }
    }

    /// Builds a rule from a configuration key and template.
    ///
    /// Returns `None` (and logs) when the key does not name a known rule.
    pub fn from_config(key: &str, template: &str) -> Option<Self> {
        match RuleKind::from_key(key) {
            Some(kind) => Some(Self::new(kind, template)),
            None => {
                warn!(key, "Unknown matcher key, skipping rule");
                None
            }
        }
    }

    /// Returns the rule kind.
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Returns the compiled pattern.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Returns true if this rule can match anything.
    pub fn is_active(&self) -> bool {
        !self.pattern.is_inert()
    }

    /// Matches a summary against this rule.
    ///
    /// Returns `None` when the summary does not match, otherwise the
    /// extraction outcome.
    pub fn extract(&self, summary: &str) -> Option<Result<ExtractedFields, ExtractionError>> {
        let captures = self.pattern.captures(summary)?;
        Some(self.fields_from(&captures))
    }

    fn fields_from(&self, captures: &[Option<&str>]) -> Result<ExtractedFields, ExtractionError> {
        let mut name = None;
        let mut number = None;

        for (index, capture) in self.captures.iter().enumerate() {
            let value = captures
                .get(index)
                .copied()
                .flatten()
                .ok_or(ExtractionError::MissingCapture {
                    rule: self.kind.key(),
                    index,
                })?;
            match capture {
                Capture::Name => name = Some(value.to_string()),
                Capture::Years | Capture::Days => {
                    number = Some(value.parse::<u32>().map_err(|_| {
                        ExtractionError::InvalidNumber {
                            rule: self.kind.key(),
                            value: value.to_string(),
                        }
                    })?)
                }
            }
        }

        let name = name.unwrap_or_default();
        let fields = match self.kind {
            RuleKind::FirstDay => ExtractedFields::FirstDay { name },
            RuleKind::Birthday => ExtractedFields::Birthday { name },
            RuleKind::AnniversaryFirstYear => ExtractedFields::Anniversary { name, years: 1 },
            RuleKind::AnniversaryMultiYear => ExtractedFields::Anniversary {
                name,
                years: number.unwrap_or_default(),
            },
            RuleKind::Leave => ExtractedFields::Leave {
                name,
                days: number.unwrap_or_default(),
            },
        };
        Ok(fields)
    }
}

/// An event with its category and extracted fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEvent {
    /// The source event.
    pub event: CalendarEvent,
    /// The bucket the event was placed in.
    pub bucket: Bucket,
    /// The rule that matched, if any.
    pub rule: Option<RuleKind>,
    /// The extracted fields.
    pub fields: ExtractedFields,
}

impl ClassifiedEvent {
    /// Creates an unclassified (holiday) entry for an event.
    pub fn unclassified(event: CalendarEvent) -> Self {
        Self {
            event,
            bucket: Bucket::Holiday,
            rule: None,
            fields: ExtractedFields::Unclassified,
        }
    }
}

/// Classified events grouped by bucket, each bucket in classification order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorizedBuckets {
    buckets: [Vec<ClassifiedEvent>; 5],
    anomalies: usize,
}

impl CategorizedBuckets {
    /// Creates an empty set of buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a classified event to its bucket.
    pub fn push(&mut self, classified: ClassifiedEvent) {
        self.buckets[classified.bucket.index()].push(classified);
    }

    /// Returns the events in a bucket.
    pub fn get(&self, bucket: Bucket) -> &[ClassifiedEvent] {
        &self.buckets[bucket.index()]
    }

    /// Iterates over non-empty buckets in display order.
    pub fn non_empty(&self) -> impl Iterator<Item = (Bucket, &[ClassifiedEvent])> {
        Bucket::ALL
            .into_iter()
            .map(|bucket| (bucket, self.get(bucket)))
            .filter(|(_, events)| !events.is_empty())
    }

    /// Total number of classified events.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Returns true if no events were classified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of events that matched a rule but failed extraction.
    ///
    /// These are also counted in the holiday bucket.
    pub fn anomalies(&self) -> usize {
        self.anomalies
    }
}

/// Applies matcher rules, in order, to calendar events.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    rules: Vec<MatcherRule>,
}

impl Classifier {
    /// Creates a classifier; rule order is evaluation order.
    pub fn new(rules: Vec<MatcherRule>) -> Self {
        Self { rules }
    }

    /// Creates a classifier from ordered `(key, template)` pairs.
    ///
    /// Unknown keys are skipped.
    pub fn from_config<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::new(
            pairs
                .into_iter()
                .filter_map(|(key, template)| MatcherRule::from_config(key, template))
                .collect(),
        )
    }

    /// Returns the rules in evaluation order.
    pub fn rules(&self) -> &[MatcherRule] {
        &self.rules
    }

    /// Classifies a single event.
    ///
    /// The first matching rule wins. If extraction fails the event is
    /// returned unclassified together with the error.
    pub fn classify_event(
        &self,
        event: &CalendarEvent,
    ) -> (ClassifiedEvent, Option<ExtractionError>) {
        for rule in &self.rules {
            match rule.extract(&event.summary) {
                None => continue,
                Some(Ok(fields)) => {
                    let classified = ClassifiedEvent {
                        event: event.clone(),
                        bucket: rule.kind().bucket(),
                        rule: Some(rule.kind()),
                        fields,
                    };
                    return (classified, None);
                }
                Some(Err(e)) => return (ClassifiedEvent::unclassified(event.clone()), Some(e)),
            }
        }
        (ClassifiedEvent::unclassified(event.clone()), None)
    }

    /// Classifies events into buckets.
    pub fn classify<'a, I>(&self, events: I) -> CategorizedBuckets
    where
        I: IntoIterator<Item = &'a CalendarEvent>,
    {
        let mut buckets = CategorizedBuckets::new();
        for event in events {
            let (classified, error) = self.classify_event(event);
            if let Some(e) = error {
                warn!(
                    uid = %event.uid,
                    summary = %event.summary,
                    error = %e,
                    "Classification anomaly, listing event as unclassified"
                );
                buckets.anomalies += 1;
            }
            debug!(
                uid = %event.uid,
                bucket = %classified.bucket,
                "Classified event"
            );
            buckets.push(classified);
        }
        buckets
    }
}
