//! Feed data model.
//!
//! The central type is [`FeedEntry`], one syndication item representing one
//! day's page. Its identity is a digest of the canonical URL and the calendar
//! date, nothing else: extraction can be re-run with better sanitization
//! without ever producing a duplicate entry for a day already in the feed.

use chrono::{Datelike, NaiveDate, TimeZone};
use sha2::{Digest, Sha256};

use crate::config::Config;

/// RFC-822 timestamp format used for RSS `pubDate` and `lastBuildDate`.
pub const RFC822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// One feed item, as persisted in the feed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    /// Human-readable title resolved from the page.
    pub title: String,
    /// Canonical daily-page URL; unique per calendar day by construction.
    pub link: String,
    /// Stable identifier, lowercase hex SHA-256 of `"{link}|{YYYY-MM-DD}"`.
    pub guid: String,
    /// RFC-822 publication timestamp, 06:00 local in the configured zone.
    pub pub_date: String,
    /// Sanitized HTML fragment forming the entry body.
    pub description: String,
}

/// Stable identifier for the entry of `link` on `date`.
///
/// Deliberately a function of the URL and calendar date only. Same day and
/// same URL always yield the same identifier regardless of what was extracted,
/// so a recorded day is never duplicated (and never rewritten in place).
pub fn entry_guid(link: &str, date: NaiveDate) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}|{}", link, date.format("%Y-%m-%d")).as_bytes());
    hex::encode(hasher.finalize())
}

impl FeedEntry {
    /// Build the immutable entry for one day's page.
    pub fn build(
        title: String,
        link: String,
        date: NaiveDate,
        description: String,
        cfg: &Config,
    ) -> FeedEntry {
        // 06:00 exists unambiguously on every civil day in the configured zone.
        let published = cfg
            .timezone
            .with_ymd_and_hms(date.year(), date.month(), date.day(), 6, 0, 0)
            .unwrap();
        FeedEntry {
            guid: entry_guid(&link, date),
            pub_date: published.format(RFC822_FORMAT).to_string(),
            title,
            link,
            description,
        }
    }
}
