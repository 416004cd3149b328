//! Feed document assembly: the ordered entry collection, dedup merge, and
//! size cap.
//!
//! The collection is newest-first. Merging never reorders what is already
//! there; it either prepends a new entry or leaves the collection untouched.
//! Truncation runs once per batch, after every day in the run has been
//! merged.

pub mod rss;

use tracing::{debug, info};

use crate::models::FeedEntry;

/// Merge `entry` into the newest-first collection.
///
/// An entry is already present when an existing record matches its guid or
/// its link. Present entries are left as stored, so an improved extraction of
/// an already-recorded day changes nothing. Returns whether the entry was
/// inserted.
pub fn merge(entries: &mut Vec<FeedEntry>, entry: FeedEntry) -> bool {
    let present = entries
        .iter()
        .any(|existing| existing.guid == entry.guid || existing.link == entry.link);
    if present {
        debug!(guid = %entry.guid, link = %entry.link, "Entry already in feed; keeping stored record");
        return false;
    }
    info!(guid = %entry.guid, link = %entry.link, "Adding entry to feed");
    entries.insert(0, entry);
    true
}

/// Cap the collection at `max_items`, dropping the oldest (tail) entries.
pub fn truncate(entries: &mut Vec<FeedEntry>, max_items: usize) {
    if entries.len() > max_items {
        debug!(dropped = entries.len() - max_items, "Truncating feed");
        entries.truncate(max_items);
    }
}
