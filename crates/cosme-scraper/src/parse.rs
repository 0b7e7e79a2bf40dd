//! Listing-page parser: review nodes → [`RawItem`]s.
//!
//! Every sub-extraction is optional and independent. A malformed entry
//! degrades to `None`/`""` fields; parsing never fails.

use cosme_core::ReviewEntry;
use reqwest::Url;
use scraper::{ElementRef, Html};

use crate::parse_helpers::{decode_rating, first_match, resolve_link, spaced_text, text_excluding};
use crate::selectors::CompiledLayout;

/// One review as found on a listing page, plus the link to its full text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
    pub entry: ReviewEntry,
    /// Absolute URL of the "read more" detail page, if the listing has one.
    pub detail_link: Option<String>,
}

/// Parses every review entry on one listing page, in document order.
///
/// `page_url` is used to resolve relative "read more" links; without it only
/// absolute links are kept. Returns an empty vector when no entry selector of
/// `layout` matches, which callers treat as the end of the listing.
#[must_use]
pub fn parse_listing(markup: &str, layout: &CompiledLayout, page_url: Option<&Url>) -> Vec<RawItem> {
    let document = Html::parse_document(markup);
    layout
        .select_entries(&document)
        .into_iter()
        .map(|node| parse_entry(node, layout, page_url))
        .collect()
}

fn parse_entry(node: ElementRef<'_>, layout: &CompiledLayout, page_url: Option<&Url>) -> RawItem {
    let rating = first_match(node, &layout.rating)
        .and_then(|el| decode_rating(el, &layout.layout().rating_rule));

    let raw_profile = first_match(node, &layout.profile)
        .map(spaced_text)
        .unwrap_or_default();

    let body_text = first_match(node, &layout.body)
        .map(|el| text_excluding(el, &layout.body_exclude))
        .unwrap_or_default();

    let posted_at = first_match(node, &layout.date)
        .map(|el| el.text().collect::<String>().trim().to_owned())
        .unwrap_or_default();

    let detail_link = first_match(node, &layout.read_more)
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| resolve_link(page_url, href));

    RawItem {
        entry: ReviewEntry {
            rating,
            raw_profile,
            body_text,
            posted_at,
        },
        detail_link,
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
