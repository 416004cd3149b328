//! Command-line interface definitions.
//!
//! The invocation surface is intentionally tiny: one flag controlling how
//! many days to (re)process, ending at today and walking backward.

use clap::Parser;

/// Command-line arguments for the feed generator.
///
/// # Examples
///
/// ```sh
/// # Today only (the default)
/// morning_offering_rss
///
/// # Backfill the last week
/// morning_offering_rss --days 7
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Number of days to fetch (1 = today only). Includes today and goes backward.
    #[arg(short, long, default_value_t = 1)]
    pub days: u32,
}
