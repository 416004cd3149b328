// tests/pipeline_e2e.rs
//
// End-to-end runs of the scrape -> extract -> build -> merge pipeline against
// an in-memory page source, plus feed persistence round trips.

use std::collections::HashMap;
use std::error::Error;

use chrono::{NaiveDate, TimeZone};

use morning_offering_rss::config::Config;
use morning_offering_rss::feed::{self, rss};
use morning_offering_rss::models::FeedEntry;
use morning_offering_rss::net::PageFetcher;
use morning_offering_rss::scrapers::morning_offering::scrape_day;

/// In-memory stand-in for the HTTP transport. Unknown URLs behave like a
/// page that has not been published yet.
struct FakeFetcher {
    pages: HashMap<String, String>,
    fail: bool,
}

impl FakeFetcher {
    fn with_pages(pages: HashMap<String, String>) -> Self {
        FakeFetcher { pages, fail: false }
    }

    fn failing() -> Self {
        FakeFetcher {
            pages: HashMap::new(),
            fail: true,
        }
    }
}

impl PageFetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<Option<String>, Box<dyn Error>> {
        if self.fail {
            return Err("HTTP status server error (503 Service Unavailable)".into());
        }
        Ok(self.pages.get(url).cloned())
    }
}

const PRAYER: &str = "O Jesus, through the Immaculate Heart of Mary, I offer You my prayers, \
                      works, joys, and sufferings of this day.";

fn daily_page(day: u32) -> String {
    format!(
        "<html><head><title>Morning Offering</title></head><body>\
         <h1>Daily Offering: January {day}</h1>\
         <p>{PRAYER}</p>\
         <div id=\"saint-quote\"><p>\"Pray without ceasing.\"</p>\
         <ul><li>\u{227b} Recommended for You: a shiny devotional</li></ul>\
         <a class=\"button\" href=\"/shop/devotional\">Find a Devotional</a></div>\
         <div id=\"meditation\"><p>Meditate <a href=\"/reflections/today/\">here</a>.</p></div>\
         </body></html>"
    )
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

fn run_days(days: &[u32], fetcher: &FakeFetcher, cfg: &Config, entries: &mut Vec<FeedEntry>) {
    for &day in days {
        if let Some(entry) = scrape_day(date(day), fetcher, cfg).unwrap() {
            feed::merge(entries, entry);
        }
    }
    feed::truncate(entries, cfg.max_items);
}

#[test]
fn promotional_content_never_reaches_the_feed() {
    let cfg = Config::default();
    let mut pages = HashMap::new();
    pages.insert(cfg.daily_url(date(2)), daily_page(2));
    let fetcher = FakeFetcher::with_pages(pages);

    let entry = scrape_day(date(2), &fetcher, &cfg).unwrap().unwrap();

    assert_eq!(entry.title, "Daily Offering: January 2");
    assert!(entry.description.contains("<h2>The Morning Offering</h2>"));
    assert!(entry.description.contains("I offer You my prayers"));
    assert!(entry.description.contains("Pray without ceasing."));
    assert!(!entry.description.contains("shiny devotional"));
    assert!(!entry.description.contains("Find a Devotional"));
    assert!(
        entry
            .description
            .contains("href=\"https://www.morningoffering.com/reflections/today/\"")
    );
}

#[test]
fn three_day_backfill_produces_one_entry_per_published_day() {
    let cfg = Config::default();
    let mut pages = HashMap::new();
    // Day 1 has no page yet; days 2 and 3 are published.
    pages.insert(cfg.daily_url(date(2)), daily_page(2));
    pages.insert(cfg.daily_url(date(3)), daily_page(3));
    let fetcher = FakeFetcher::with_pages(pages);

    let mut entries = Vec::new();
    run_days(&[3, 2, 1], &fetcher, &cfg, &mut entries);

    assert_eq!(entries.len(), 2);
    for entry in &entries {
        assert!(entry.pub_date.contains("06:00:00"), "{}", entry.pub_date);
    }

    // Re-running the same backfill adds nothing.
    run_days(&[3, 2, 1], &fetcher, &cfg, &mut entries);
    assert_eq!(entries.len(), 2);
}

#[test]
fn unpublished_day_leaves_feed_byte_identical() {
    let cfg = Config::default();
    let now = cfg.timezone.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();

    let mut pages = HashMap::new();
    pages.insert(cfg.daily_url(date(2)), daily_page(2));
    let fetcher = FakeFetcher::with_pages(pages);

    let mut entries = Vec::new();
    run_days(&[2], &fetcher, &cfg, &mut entries);
    let before = rss::write_feed(&entries, &cfg, &now).unwrap();

    // Day 4 is not published; the run contributes nothing for it.
    run_days(&[4], &fetcher, &cfg, &mut entries);
    let after = rss::write_feed(&entries, &cfg, &now).unwrap();

    assert_eq!(before, after);
}

#[test]
fn transport_failure_aborts_the_run() {
    let cfg = Config::default();
    let fetcher = FakeFetcher::failing();
    assert!(scrape_day(date(2), &fetcher, &cfg).is_err());
}

#[test]
fn page_without_recognized_regions_still_publishes_a_fallback_entry() {
    let cfg = Config::default();
    let url = cfg.daily_url(date(2));
    let mut pages = HashMap::new();
    pages.insert(
        url.clone(),
        "<html><head><title>Offline</title></head><body><p>Template changed.</p></body></html>"
            .to_string(),
    );
    let fetcher = FakeFetcher::with_pages(pages);

    let entry = scrape_day(date(2), &fetcher, &cfg).unwrap().unwrap();
    assert!(entry.description.contains("See original page:"));
    assert!(entry.description.contains(&url));
}

#[test]
fn persisted_feed_round_trips_through_a_second_run() {
    let cfg = Config::default();
    let now = cfg.timezone.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();

    let mut pages = HashMap::new();
    pages.insert(cfg.daily_url(date(2)), daily_page(2));
    pages.insert(cfg.daily_url(date(3)), daily_page(3));
    let fetcher = FakeFetcher::with_pages(pages);

    // First run records day 2 and persists.
    let mut entries = Vec::new();
    run_days(&[2], &fetcher, &cfg, &mut entries);
    let persisted = rss::write_feed(&entries, &cfg, &now).unwrap();

    // Second run loads the persisted document and adds day 3 on top.
    let mut reloaded = rss::load_feed(&persisted);
    assert_eq!(reloaded, entries);
    run_days(&[3, 2], &fetcher, &cfg, &mut reloaded);

    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded[1].title, "Daily Offering: January 2");
    let guids: Vec<&str> = reloaded.iter().map(|e| e.guid.as_str()).collect();
    assert_eq!(guids.len(), 2);
    assert_ne!(guids[0], guids[1]);
}

#[test]
fn retention_cap_drops_only_the_oldest_entries() {
    let cfg = Config::default();
    let mut entries: Vec<FeedEntry> = (1..=60)
        .rev()
        .map(|n| FeedEntry {
            title: format!("Day {n}"),
            link: format!("https://www.morningoffering.com/archive/{n}/"),
            guid: format!("{n:064x}"),
            pub_date: String::new(),
            description: String::new(),
        })
        .collect();

    let mut pages = HashMap::new();
    pages.insert(cfg.daily_url(date(2)), daily_page(2));
    let fetcher = FakeFetcher::with_pages(pages);
    run_days(&[2], &fetcher, &cfg, &mut entries);

    assert_eq!(entries.len(), 60);
    assert_eq!(entries[0].title, "Daily Offering: January 2");
    assert_eq!(entries[59].title, "Day 2");
    assert!(!entries.iter().any(|e| e.title == "Day 1"));
}
