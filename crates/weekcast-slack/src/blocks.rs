//! Conversion from [`MessageDocument`] to Slack Block Kit JSON.
//!
//! Headers and text both become `section` blocks with `mrkdwn` text, so emoji
//! shortcodes and `*bold*` render the same everywhere. Section text longer
//! than Slack's limit is split on line boundaries into consecutive sections.

use serde_json::{Value, json};
use tracing::warn;
use weekcast_core::{Block, MessageDocument};

/// Maximum characters in a section's text.
pub const MAX_SECTION_CHARS: usize = 3000;

/// Maximum blocks in one message.
pub const MAX_BLOCKS: usize = 50;

/// Renders a document's blocks as Block Kit JSON.
///
/// Blocks past [`MAX_BLOCKS`] are dropped with a warning.
pub fn to_block_kit(doc: &MessageDocument) -> Vec<Value> {
    let mut out = Vec::with_capacity(doc.blocks.len());
    for block in &doc.blocks {
        match block {
            Block::Divider => out.push(json!({ "type": "divider" })),
            Block::Header(text) | Block::Text(text) => {
                out.extend(split_text(text, MAX_SECTION_CHARS).into_iter().map(section));
            }
        }
    }

    if out.len() > MAX_BLOCKS {
        warn!(
            blocks = out.len(),
            limit = MAX_BLOCKS,
            "Digest exceeds Slack block limit, truncating"
        );
        out.truncate(MAX_BLOCKS);
    }
    out
}

fn section(text: String) -> Value {
    json!({
        "type": "section",
        "text": { "type": "mrkdwn", "text": text },
    })
}

/// Splits `text` into chunks of at most `max_chars` characters.
///
/// Breaks at the last newline that fits; a single line longer than the limit
/// is cut at a character boundary. A `max_chars` of zero disables splitting.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 || text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    let mut started = false;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let sep = usize::from(started);

        if current_len + sep + line_len <= max_chars {
            if started {
                current.push('\n');
            }
            current.push_str(line);
            current_len += sep + line_len;
            started = true;
            continue;
        }

        if started {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        let mut rest = line;
        while rest.chars().count() > max_chars {
            let cut = rest
                .char_indices()
                .nth(max_chars)
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            chunks.push(rest[..cut].to_string());
            rest = &rest[cut..];
        }
        current.push_str(rest);
        current_len = rest.chars().count();
        started = true;
    }

    if started {
        chunks.push(current);
    }
    chunks
}
