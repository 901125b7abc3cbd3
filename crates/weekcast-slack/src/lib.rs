//! weekcast-slack: digest delivery through the Slack Web API.
//!
//! Converts a [`weekcast_core::MessageDocument`] into Block Kit JSON and
//! posts it with `chat.postMessage`. Delivery is plain HTTPS with a bot
//! token; there is no socket connection to open or close.

pub mod blocks;
pub mod client;
pub mod error;
pub mod types;

pub use blocks::{MAX_BLOCKS, MAX_SECTION_CHARS, split_text, to_block_kit};
pub use client::{DEFAULT_API_URL, SlackClient, build_message};
pub use error::{Result, SlackError};
pub use types::{AuthTestResponse, PostMessage, PostMessageResponse};
