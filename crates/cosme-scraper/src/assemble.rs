use cosme_core::{Dataset, ProfileFormat, ReviewEntry, ReviewRow};

use crate::normalize::normalize_profile;

/// Projects entries into dataset rows, normalizing each profile with `format`.
///
/// One row per entry, in input order. Nothing is filtered or deduplicated.
#[must_use]
pub fn assemble(entries: Vec<ReviewEntry>, format: ProfileFormat, layout: &str) -> Dataset {
    let rows = entries
        .into_iter()
        .map(|entry| {
            let profile = normalize_profile(&entry.raw_profile, format);
            ReviewRow::new(entry, profile)
        })
        .collect();
    Dataset::new(layout, rows)
}
