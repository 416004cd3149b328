//! Morning Offering daily-page scraper.
//!
//! The site publishes one page per calendar day under `/offering/{mm}-{dd}/`.
//! The page is a fixed template, so extraction walks a declarative, ordered
//! table of named regions instead of heuristically stripping the whole page:
//! precise, noise-free output at the cost of breaking if the template is
//! redesigned. Regions missing from a page contribute nothing and are not an
//! error; a page with no recognized region at all degrades to a link back to
//! the original.
//!
//! # Regions
//!
//! | Region | Located by | Rendered as |
//! |--------|-----------|-------------|
//! | Offering prayer | literal text match | fixed heading + paragraph |
//! | Saint quote | `#saint-quote` | heading + sanitized block |
//! | Meditation | `#meditation` | sanitized block |
//! | Daily verse | `#daily-verse` | sanitized block |
//! | Saint of the day | `.daily-saint` | heading + image + sanitized text |
//! | Devotion of the month | `.order-lg-1` / `.order-lg-2` | heading + sanitized text + image |
//! | Daily prayers | `.order-sm-1` | sanitized block |

use std::error::Error;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::models::FeedEntry;
use crate::net::PageFetcher;
use crate::scrapers::sanitize::{absolutize, rewrite_urls, sanitize};

/// Opening words of the daily offering prayer, located by literal text match.
const OFFERING_PRAYER: &str = "O Jesus, through the Immaculate Heart of Mary";

static SAINT_QUOTE: Lazy<Selector> = Lazy::new(|| Selector::parse("#saint-quote").unwrap());
static MEDITATION: Lazy<Selector> = Lazy::new(|| Selector::parse("#meditation").unwrap());
static DAILY_VERSE: Lazy<Selector> = Lazy::new(|| Selector::parse("#daily-verse").unwrap());
static DAILY_SAINT: Lazy<Selector> = Lazy::new(|| Selector::parse(".daily-saint").unwrap());
static DAILY_SAINT_IMG: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".daily-saint > div:nth-child(1) > img:nth-child(1)").unwrap());
static DAILY_SAINT_TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".daily-saint > div:nth-child(2)").unwrap());
static DEVOTION_TEXT: Lazy<Selector> = Lazy::new(|| Selector::parse(".order-lg-1").unwrap());
static DEVOTION_IMG: Lazy<Selector> = Lazy::new(|| Selector::parse(".order-lg-2").unwrap());
static DAILY_PRAYERS: Lazy<Selector> = Lazy::new(|| Selector::parse(".order-sm-1").unwrap());
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static PAGE_TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

/// One named region of the daily page template.
struct Region {
    name: &'static str,
    render: fn(&Html, &Config) -> Vec<String>,
}

/// Ordered extraction table; output follows this order, not page order.
const REGIONS: &[Region] = &[
    Region {
        name: "offering-prayer",
        render: render_offering_prayer,
    },
    Region {
        name: "saint-quote",
        render: render_saint_quote,
    },
    Region {
        name: "meditation",
        render: render_meditation,
    },
    Region {
        name: "daily-verse",
        render: render_daily_verse,
    },
    Region {
        name: "daily-saint",
        render: render_daily_saint,
    },
    Region {
        name: "devotion",
        render: render_devotion,
    },
    Region {
        name: "daily-prayers",
        render: render_daily_prayers,
    },
];

/// Assemble the sanitized entry body for one daily page.
#[instrument(level = "debug", skip_all, fields(%url))]
pub fn extract(document: &Html, url: &str, cfg: &Config) -> String {
    let mut parts: Vec<String> = Vec::new();
    for region in REGIONS {
        let rendered = (region.render)(document, cfg);
        debug!(region = region.name, fragments = rendered.len(), "Rendered region");
        parts.extend(rendered);
    }

    if parts.is_empty() {
        warn!(%url, "No recognized region on page; falling back to a source link");
        let href = html_escape::encode_double_quoted_attribute(url);
        let text = html_escape::encode_text(url);
        return format!("<p>See original page:</p>\n<p><a href=\"{href}\">{text}</a></p>");
    }

    absolutize(&parts.join("\n"), cfg)
}

/// Pick the entry title: first `<h1>`, then `<title>`, then the fixed default.
pub fn resolve_title(document: &Html, cfg: &Config) -> String {
    if let Some(h1) = document.select(&H1).next() {
        let text = h1.text().collect::<String>();
        let text = text.trim();
        if !text.is_empty() {
            return text.to_string();
        }
    }
    if let Some(title) = document.select(&PAGE_TITLE).next() {
        let text = title.text().collect::<String>();
        let text = text.trim();
        if !text.is_empty() {
            return text.to_string();
        }
    }
    cfg.fallback_title.clone()
}

/// Process one calendar day: fetch the page, extract its content, build the
/// feed entry.
///
/// A day whose page has not been published is not an error; it yields
/// `Ok(None)` and the run continues. Any other fetch failure propagates and
/// aborts the run before the feed is written.
#[instrument(level = "info", skip(fetcher, cfg), fields(%date))]
pub fn scrape_day<F>(
    date: NaiveDate,
    fetcher: &F,
    cfg: &Config,
) -> Result<Option<FeedEntry>, Box<dyn Error>>
where
    F: PageFetcher,
{
    let url = cfg.daily_url(date);
    let Some(body) = fetcher.fetch(&url)? else {
        warn!(%url, "No page published for this day; skipping");
        return Ok(None);
    };

    let document = Html::parse_document(&body);
    let title = resolve_title(&document, cfg);
    let description = extract(&document, &url, cfg);
    let entry = FeedEntry::build(title, url, date, description, cfg);
    info!(guid = %entry.guid, title = %entry.title, "Built feed entry");
    Ok(Some(entry))
}

fn render_offering_prayer(document: &Html, _cfg: &Config) -> Vec<String> {
    let Some(text) = document
        .root_element()
        .text()
        .find(|t| t.contains(OFFERING_PRAYER))
    else {
        return Vec::new();
    };
    vec![
        "<h2>The Morning Offering</h2>".to_string(),
        format!("<p>{}</p>", html_escape::encode_text(text.trim())),
    ]
}

fn render_saint_quote(document: &Html, cfg: &Config) -> Vec<String> {
    let Some(el) = document.select(&SAINT_QUOTE).next() else {
        return Vec::new();
    };
    vec!["<h2>Saint Quote</h2>".to_string(), sanitize(el, cfg)]
}

fn render_meditation(document: &Html, cfg: &Config) -> Vec<String> {
    document
        .select(&MEDITATION)
        .next()
        .map(|el| vec![sanitize(el, cfg)])
        .unwrap_or_default()
}

fn render_daily_verse(document: &Html, cfg: &Config) -> Vec<String> {
    document
        .select(&DAILY_VERSE)
        .next()
        .map(|el| vec![sanitize(el, cfg)])
        .unwrap_or_default()
}

fn render_daily_saint(document: &Html, cfg: &Config) -> Vec<String> {
    if document.select(&DAILY_SAINT).next().is_none() {
        return Vec::new();
    }
    let mut parts = vec!["<h2>Saint of the Day</h2>".to_string()];
    if let Some(img) = document.select(&DAILY_SAINT_IMG).next() {
        parts.push(rewrite_urls(img, cfg));
    }
    if let Some(text) = document.select(&DAILY_SAINT_TEXT).next() {
        parts.push(sanitize(text, cfg));
    }
    parts
}

fn render_devotion(document: &Html, cfg: &Config) -> Vec<String> {
    let Some(text) = document.select(&DEVOTION_TEXT).next() else {
        return Vec::new();
    };
    let mut parts = vec![
        "<h2>Devotion of the Month</h2>".to_string(),
        sanitize(text, cfg),
    ];
    if let Some(img) = document.select(&DEVOTION_IMG).next() {
        parts.push(rewrite_urls(img, cfg));
    }
    parts
}

fn render_daily_prayers(document: &Html, cfg: &Config) -> Vec<String> {
    document
        .select(&DAILY_PRAYERS)
        .next()
        .map(|el| vec![sanitize(el, cfg)])
        .unwrap_or_default()
}
