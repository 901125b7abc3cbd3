//! Platform-neutral message documents and console text.

use serde::{Deserialize, Serialize};

use super::{Locale, Section};

/// One block of a message document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Block {
    /// A horizontal separator.
    Divider,
    /// A heading line (Slack mrkdwn).
    Header(String),
    /// Formatted body text (Slack mrkdwn).
    Text(String),
}

/// The opening of a weekly digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestIntro {
    /// Greeting shown as the message header and used as fallback text.
    pub greeting: String,
    /// Emoji shortcode prefixed to the header.
    pub icon: String,
    /// Heading placed above the current week's sections.
    pub this_week_heading: String,
}

impl DigestIntro {
    /// Builds the intro for a company in the given locale.
    pub fn for_company(company: &str, locale: Locale) -> Self {
        let (greeting, heading) = match locale {
            Locale::Es => (
                format!("Aquí tienes el resumen semanal de {}", company),
                "*Eventos de esta semana:*",
            ),
            Locale::En => (
                format!("Here is the weekly summary for {}", company),
                "*Events this week:*",
            ),
        };
        Self {
            greeting,
            icon: ":calendar:".to_string(),
            this_week_heading: heading.to_string(),
        }
    }

    fn header(&self) -> String {
        if self.icon.is_empty() {
            self.greeting.clone()
        } else {
            format!("{} {}", self.icon, self.greeting)
        }
    }
}

/// A chat message: fallback text plus ordered blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDocument {
    /// Plain text shown by clients that cannot render blocks.
    pub text: String,
    /// Message body.
    pub blocks: Vec<Block>,
}

impl MessageDocument {
    /// Creates an empty document with the given fallback text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blocks: Vec::new(),
        }
    }

    /// Appends a block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Appends each section as a header block followed by a text block
    /// holding its lines.
    pub fn push_sections(&mut self, sections: &[Section]) {
        for section in sections {
            self.push(Block::Header(section.title.clone()));
            self.push(Block::Text(section_lines(section)));
        }
    }

    /// Composes the weekly digest.
    ///
    /// Layout: intro header, divider, this week's heading and sections, then
    /// (only when `next_week` is non-empty) a divider and the next week's
    /// sections.
    pub fn digest(intro: &DigestIntro, this_week: &[Section], next_week: &[Section]) -> Self {
        let mut doc = Self::new(intro.greeting.clone());
        doc.push(Block::Header(intro.header()));
        doc.push(Block::Divider);
        doc.push(Block::Text(intro.this_week_heading.clone()));
        doc.push_sections(this_week);

        if !next_week.is_empty() {
            doc.push(Block::Divider);
            doc.push_sections(next_week);
        }
        doc
    }

    /// Returns true if the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

fn section_lines(section: &Section) -> String {
    section
        .lines
        .iter()
        .map(|line| format!("- {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders sections as an indented plain-text report under `heading`.
pub fn render_text(heading: &str, sections: &[Section]) -> String {
    let mut out = format!("=== {} ===\n", heading);
    if sections.is_empty() {
        out.push_str("\n(no events)\n");
        return out;
    }
    for section in sections {
        out.push('\n');
        out.push_str(&section.title);
        out.push('\n');
        for line in &section.lines {
            out.push_str("  - ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
