//! Calendar feed sources and iCalendar parsing.
//!
//! - [`FeedSource`] - The trait every feed location implements
//! - [`HttpFeed`] - A published `.ics` URL (feature `http`, on by default)
//! - [`FileFeed`] - A local `.ics` file
//! - [`parse_feed`] - iCalendar body to [`weekcast_core::CalendarFeed`]
//! - [`ProviderError`] - Error types for retrieval and parsing
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │   HttpFeed   │   │   FileFeed   │
//! └──────┬───────┘   └──────┬───────┘
//!        │    FeedSource    │
//!        └────────┬─────────┘
//!                 ▼ fetch_raw()
//!            ICS body
//!                 ▼ parse_feed()
//!          CalendarFeed
//! ```

pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod ics;
pub mod source;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
#[cfg(feature = "http")]
pub use http::{HttpFeed, HttpFeedConfig};
pub use ics::{parse_feed, parse_icalendar_datetime};
pub use source::{BoxFuture, FeedSource, FileFeed};
