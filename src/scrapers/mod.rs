//! Scraping pipeline for the source site.
//!
//! Two layers:
//!
//! - [`sanitize`]: generic cleanup of a parsed region, stripping promotional
//!   subtrees and absolutizing root-relative URLs while re-serializing.
//! - [`morning_offering`]: the site-specific scraper, with the ordered region
//!   table, title resolution, and the per-day driver that turns one calendar
//!   date into at most one feed entry.

pub mod morning_offering;
pub mod sanitize;
