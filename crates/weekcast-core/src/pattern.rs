//! Pattern templates for recognising calendar summaries.
//!
//! A template is literal text with typed placeholders:
//!
//! | Placeholder | Matches                                  | Regex     |
//! |-------------|------------------------------------------|-----------|
//! | `%s`        | shortest non-empty run of any characters | `(.+?)`   |
//! | `%d`        | one or more ASCII digits                 | `([0-9]+)`|
//! | `%%`        | a literal `%`                            | `%`       |
//!
//! Everything else is matched literally and the whole summary must match,
//! so `"%s's first day!"` recognises `"Ana's first day!"` but not
//! `"Re: Ana's first day!"`. A `%` followed by any other character is kept
//! as literal text, so `"50% off"` matches itself.
//!
//! Compilation never fails. A template that cannot be compiled (empty,
//! ending in a lone `%`, or a regex the engine rejects) produces an inert
//! [`Pattern`] that matches nothing.

use regex::Regex;
use tracing::warn;

/// A typed capture marker inside a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// `%s`: any text.
    Text,
    /// `%d`: ASCII decimal digits.
    Digits,
}

impl Placeholder {
    fn regex(&self) -> &'static str {
        match self {
            Self::Text => "(.+?)",
            Self::Digits => "([0-9]+)",
        }
    }
}

/// A compiled template.
#[derive(Debug, Clone)]
pub struct Pattern {
    template: String,
    regex: Option<Regex>,
    placeholders: Vec<Placeholder>,
}

impl Pattern {
    /// Compiles a template into an anchored matcher.
    pub fn compile(template: &str) -> Self {
        let compiled = translate(template).and_then(|(source, placeholders)| {
            match Regex::new(&source) {
                Ok(regex) => Some((regex, placeholders)),
                Err(e) => {
                    warn!(template, error = %e, "Pattern template did not compile");
                    None
                }
            }
        });

        match compiled {
            Some((regex, placeholders)) => Self {
                template: template.to_string(),
                regex: Some(regex),
                placeholders,
            },
            None => Self::inert(template),
        }
    }

    /// Creates a pattern that never matches.
    pub fn inert(template: &str) -> Self {
        Self {
            template: template.to_string(),
            regex: None,
            placeholders: Vec::new(),
        }
    }

    /// Returns the source template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the placeholders in the order they appear in the template.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Returns true if this pattern can never match.
    pub fn is_inert(&self) -> bool {
        self.regex.is_none()
    }

    /// Returns the generated regular expression, if any.
    pub fn as_regex(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }

    /// Matches `text` and returns one entry per placeholder, in template order.
    ///
    /// Returns `None` when the text does not match. A placeholder whose group
    /// did not participate in the match is reported as `None`.
    pub fn captures<'t>(&self, text: &'t str) -> Option<Vec<Option<&'t str>>> {
        let caps = self.regex.as_ref()?.captures(text)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str()))
                .collect(),
        )
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
            && self.placeholders == other.placeholders
            && self.as_regex() == other.as_regex()
    }
}

impl Eq for Pattern {}

/// Translates a template into an anchored regex source.
///
/// Returns `None` for templates that should compile to an inert pattern.
fn translate(template: &str) -> Option<(String, Vec<Placeholder>)> {
    if template.is_empty() {
        warn!("Empty pattern template");
        return None;
    }

    let mut source = String::with_capacity(template.len() + 16);
    let mut literal = String::new();
    let mut placeholders = Vec::new();
    let mut chars = template.chars();

    source.push('^');
    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        let placeholder = match chars.next() {
            Some('s') => Placeholder::Text,
            Some('d') => Placeholder::Digits,
            Some('%') => {
                literal.push('%');
                continue;
            }
            Some(other) => {
                literal.push('%');
                literal.push(other);
                continue;
            }
            None => {
                warn!(template, "Pattern template ends with a lone `%`");
                return None;
            }
        };

        source.push_str(&regex::escape(&literal));
        literal.clear();
        source.push_str(placeholder.regex());
        placeholders.push(placeholder);
    }
    source.push_str(&regex::escape(&literal));
    source.push('$');

    Some((source, placeholders))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &Pattern, text: &str) -> bool {
        pattern.captures(text).is_some()
    }

    #[test]
    fn first_day_template() {
        let pattern = Pattern::compile("%s's first day!");
        assert!(!pattern.is_inert());
        assert_eq!(pattern.placeholders(), &[Placeholder::Text]);
        assert_eq!(
            pattern.captures("Ana's first day!"),
            Some(vec![Some("Ana")])
        );
    }

    #[test]
    fn captures_follow_template_order() {
        let pattern = Pattern::compile("%s's %d year anniversary");
        assert_eq!(
            pattern.placeholders(),
            &[Placeholder::Text, Placeholder::Digits]
        );
        assert_eq!(
            pattern.captures("Luis's 3 year anniversary"),
            Some(vec![Some("Luis"), Some("3")])
        );

        let pattern = Pattern::compile("%d years of %s");
        assert_eq!(
            pattern.captures("12 years of María José"),
            Some(vec![Some("12"), Some("María José")])
        );
    }

    #[test]
    fn match_is_anchored() {
        let pattern = Pattern::compile("%s's birthday");
        assert!(matches(&pattern, "Ana's birthday"));
        assert!(!matches(&pattern, "Ana's birthday party"));
        assert!(!matches(&pattern, "Reminder: it is Ana's birthday!"));
    }

    #[test]
    fn text_placeholder_is_non_greedy() {
        let pattern = Pattern::compile("%s - %s");
        assert_eq!(
            pattern.captures("a - b - c"),
            Some(vec![Some("a"), Some("b - c")])
        );
    }

    #[test]
    fn digits_reject_non_numeric() {
        let pattern = Pattern::compile("%s on leave for %d days");
        assert!(matches(&pattern, "Ana on leave for 5 days"));
        assert_eq!(pattern.captures("Ana on leave for five days"), None);
        assert_eq!(pattern.captures("Ana on leave for  days"), None);
    }

    #[test]
    fn digits_are_ascii_only() {
        let pattern = Pattern::compile("%s - leave (%d days)");
        assert!(matches(&pattern, "Pablo - leave (5 days)"));
        assert_eq!(pattern.captures("Pablo - leave (\u{0665} days)"), None);
        assert_eq!(pattern.captures("Pablo - leave (\u{FF15} days)"), None);
    }

    #[test]
    fn text_placeholder_requires_one_char() {
        let pattern = Pattern::compile("%s's birthday");
        assert!(!matches(&pattern, "'s birthday"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let pattern = Pattern::compile("(%s) [day off] + %d? $^.*|\\");
        assert!(matches(&pattern, "(Ana) [day off] + 2? $^.*|\\"));
        assert!(!matches(&pattern, "Ana day off 2"));

        let pattern = Pattern::compile("Day off: %s.");
        assert!(matches(&pattern, "Day off: Ana."));
        assert!(!matches(&pattern, "Day off: Ana!"));
    }

    #[test]
    fn escaped_percent_is_literal() {
        let pattern = Pattern::compile("100%% %s");
        assert_eq!(pattern.placeholders(), &[Placeholder::Text]);
        assert!(matches(&pattern, "100% Ana"));
        assert!(!matches(&pattern, "100%% Ana"));
    }

    #[test]
    fn unknown_percent_sequences_are_literal() {
        let pattern = Pattern::compile("50% off");
        assert!(!pattern.is_inert());
        assert!(matches(&pattern, "50% off"));
        assert!(!matches(&pattern, "50 off"));

        let pattern = Pattern::compile("%s cumple años (100% fiesta)");
        assert_eq!(pattern.placeholders(), &[Placeholder::Text]);
        assert_eq!(
            pattern.captures("Ana cumple años (100% fiesta)"),
            Some(vec![Some("Ana")])
        );

        let pattern = Pattern::compile("%x first day");
        assert!(matches(&pattern, "%x first day"));
    }

    #[test]
    fn malformed_templates_are_inert() {
        for template in ["", "%", "%s's %"] {
            let pattern = Pattern::compile(template);
            assert!(pattern.is_inert(), "{template:?} should be inert");
            assert!(!matches(&pattern, template));
            assert!(!matches(&pattern, ""));
            assert_eq!(pattern.captures("anything"), None);
            assert_eq!(pattern.template(), template);
        }
    }

    #[test]
    fn literal_only_template() {
        let pattern = Pattern::compile("Company offsite");
        assert!(pattern.placeholders().is_empty());
        assert_eq!(pattern.captures("Company offsite"), Some(vec![]));
        assert_eq!(pattern.captures("Company offsite 2025"), None);
    }

    #[test]
    fn compilation_is_deterministic() {
        let a = Pattern::compile("%s's %d year anniversary");
        let b = Pattern::compile("%s's %d year anniversary");
        assert_eq!(a, b);
        assert_eq!(a.as_regex(), Some("^(.+?)'s ([0-9]+) year anniversary$"));

        let summary = "Luis's 3 year anniversary";
        assert_eq!(a.captures(summary), b.captures(summary));
        assert_eq!(a.captures(summary), a.captures(summary));
    }
}
