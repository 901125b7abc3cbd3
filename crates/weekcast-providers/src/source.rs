//! FeedSource trait definition.
//!
//! A [`FeedSource`] produces the raw body of an iCalendar feed. The provided
//! [`FeedSource::fetch_feed`] method parses that body into a
//! [`CalendarFeed`].

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tracing::debug;
use weekcast_core::{CalendarFeed, ReportZone};

use crate::error::{ProviderError, ProviderResult};
use crate::ics::parse_feed;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe so the CLI can hold a
/// `Box<dyn FeedSource>` chosen at runtime.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A place calendar feeds are read from.
pub trait FeedSource: Send + Sync {
    /// Short name used in errors and logs ("http", "file").
    fn name(&self) -> &str;

    /// Human-readable location, safe to log.
    fn location(&self) -> String;

    /// Retrieves the raw feed body.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the feed cannot be retrieved.
    fn fetch_raw(&self) -> BoxFuture<'_, ProviderResult<String>>;

    /// Retrieves and parses the feed. Floating times are read in `zone`.
    fn fetch_feed(&self, zone: ReportZone) -> BoxFuture<'_, ProviderResult<CalendarFeed>> {
        Box::pin(async move {
            let body = self.fetch_raw().await?;
            debug!(source = self.name(), bytes = body.len(), "Fetched feed body");
            parse_feed(&body, &zone).map_err(|e| e.with_provider(self.name()))
        })
    }
}

/// A feed stored in a local `.ics` file.
#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    /// Creates a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeedSource for FileFeed {
    fn name(&self) -> &str {
        "file"
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_raw(&self) -> BoxFuture<'_, ProviderResult<String>> {
        Box::pin(async move {
            tokio::fs::read_to_string(&self.path).await.map_err(|e| {
                ProviderError::io(format!("reading {}", self.path.display()), e)
                    .with_provider(self.name())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use std::io::Write;

    const ICS: &str = "BEGIN:VCALENDAR\r\n\
                       VERSION:2.0\r\n\
                       BEGIN:VEVENT\r\n\
                       UID:holiday-1\r\n\
                       DTSTART;VALUE=DATE:20250106\r\n\
                       DTEND;VALUE=DATE:20250107\r\n\
                       SUMMARY:Epiphany\r\n\
                       END:VEVENT\r\n\
                       END:VCALENDAR\r\n";

    #[tokio::test]
    async fn file_feed_reads_and_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ICS.as_bytes()).unwrap();

        let source = FileFeed::new(file.path());
        assert_eq!(source.name(), "file");
        assert_eq!(source.location(), file.path().display().to_string());

        let feed = source.fetch_feed(ReportZone::Local).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.entries()[0].uid, "holiday-1");
        assert_eq!(feed.entries()[0].summary, "Epiphany");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileFeed::new(dir.path().join("missing.ics"));

        let err = source.fetch_feed(ReportZone::Local).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::NotFound);
        assert_eq!(err.provider(), Some("file"));
    }

    #[tokio::test]
    async fn parse_errors_name_the_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a calendar").unwrap();

        let err = FileFeed::new(file.path())
            .fetch_feed(ReportZone::Local)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
        assert!(err.to_string().starts_with("[file] invalid_response"));
    }
}
