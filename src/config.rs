//! Run configuration.
//!
//! Every knob lives in a single immutable [`Config`] value constructed at
//! startup and passed by reference into each component. Nothing reads
//! process-wide mutable state.

use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use url::Url;

/// Immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Origin of the source site.
    pub base_url: Url,
    /// Time zone used for publication timestamps.
    pub timezone: Tz,
    /// Path of the persisted feed document.
    pub feed_file: String,
    /// Feed envelope title.
    pub feed_title: String,
    /// Feed envelope description.
    pub feed_description: String,
    /// Entry title used when a page has neither an `<h1>` nor a `<title>`.
    pub fallback_title: String,
    /// Maximum number of entries retained in the feed.
    pub max_items: usize,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: Url::parse("https://www.morningoffering.com").unwrap(),
            timezone: chrono_tz::America::New_York,
            feed_file: "feed.xml".to_string(),
            feed_title: "Morning Offering (Unofficial RSS)".to_string(),
            feed_description:
                "Unofficial, personal-use RSS feed created from morningoffering.com daily page."
                    .to_string(),
            fallback_title: "Morning Offering".to_string(),
            max_items: 60,
            user_agent:
                "Personal-RSS-Generator/1.1 (+https://github.com/your-username/morning-offering-rss)"
                    .to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Site origin without a trailing slash, the prefix for root-relative URLs.
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    /// Canonical URL of the daily page for `date`.
    pub fn daily_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/offering/{:02}-{:02}/",
            self.origin(),
            date.month(),
            date.day()
        )
    }

    /// Landing page the feed envelope links back to.
    pub fn feed_link(&self) -> String {
        format!("{}/offering/", self.origin())
    }
}
