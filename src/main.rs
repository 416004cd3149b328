//! # Morning Offering RSS
//!
//! Generates or backfills an unofficial RSS feed from the
//! [Morning Offering](https://www.morningoffering.com) daily page.
//!
//! ## Usage
//!
//! ```sh
//! # Today only
//! morning_offering_rss
//!
//! # Backfill the last three days
//! morning_offering_rss --days 3
//! ```
//!
//! ## Architecture
//!
//! One run is a single synchronous pass:
//! 1. **Load**: read the persisted feed document (missing or unreadable
//!    means starting empty)
//! 2. **Scrape**: for each day, most recent first, fetch the page, extract
//!    and sanitize its regions, and build one entry
//! 3. **Merge**: prepend entries that are not already recorded, keyed by
//!    guid and link
//! 4. **Write**: truncate to the retention cap and persist the document once
//!
//! A day without a published page is skipped silently; any other fetch
//! failure aborts the run before the feed file is touched, so the last good
//! document is preserved.

use std::error::Error;
use std::fs;

use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use morning_offering_rss::cli::Cli;
use morning_offering_rss::config::Config;
use morning_offering_rss::feed::{self, rss};
use morning_offering_rss::net::HttpFetcher;
use morning_offering_rss::scrapers::morning_offering;

fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("feed_update starting up");

    let args = Cli::parse();
    let cfg = Config::default();
    let fetcher = HttpFetcher::new(&cfg)?;

    let now = Utc::now().with_timezone(&cfg.timezone);

    let mut entries = match fs::read_to_string(&cfg.feed_file) {
        Ok(xml) => rss::load_feed(&xml),
        Err(e) => {
            info!(path = %cfg.feed_file, error = %e, "No existing feed; starting empty");
            Vec::new()
        }
    };
    info!(count = entries.len(), path = %cfg.feed_file, "Loaded persisted feed");

    let mut added = 0usize;
    for i in 0..args.days {
        let date = (now - chrono::Duration::days(i as i64)).date_naive();
        if let Some(entry) = morning_offering::scrape_day(date, &fetcher, &cfg)? {
            if feed::merge(&mut entries, entry) {
                added += 1;
            }
        }
    }

    feed::truncate(&mut entries, cfg.max_items);

    let xml = rss::write_feed(&entries, &cfg, &now)?;
    fs::write(&cfg.feed_file, xml)?;
    info!(path = %cfg.feed_file, total = entries.len(), added, "Wrote feed document");

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");

    Ok(())
}
