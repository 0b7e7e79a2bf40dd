//! Page-number pagination over a review listing.
//!
//! The driver is a small state machine:
//!
//! ```text
//! Fetching(1) ─► Fetching(2) ─► … ─► Exhausted   (a page parsed to zero entries)
//!      │                          └─► Capped      (the page limit was reached)
//!      └──────────── any page ──────► Aborted     (transport failure)
//! ```
//!
//! Pages are fetched strictly one after another, and detail pages for a
//! listing page are fetched before the next listing page.

use std::time::Duration;

use cosme_core::{Dataset, ProfileFormat, ReviewEntry, UNKNOWN};
use reqwest::Url;

use crate::assemble::assemble;
use crate::client::{
    existing_listing_suffix, normalize_listing_url, page_url, rebase_listing_url, PageFetcher,
};
use crate::error::ScraperError;
use crate::expand::expand;
use crate::parse::parse_listing;
use crate::selectors::{CompiledLayout, LayoutSet};

/// Safety ceiling when the caller sets no page limit.
pub const MAX_PAGES: u32 = 200;

/// Listing suffix and page parameter used before a layout is detected, when
/// the URL carries no known listing suffix.
const DEFAULT_LISTING_SUFFIX: &str = "/review/";
const DEFAULT_PAGE_PARAM: &str = "page";

/// Which layout descriptor a run parses with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LayoutChoice {
    /// Use the layout with this name (case-insensitive).
    Named(String),
    /// Probe the first page and keep the first layout that matches.
    #[default]
    Detect,
}

#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub layout: LayoutChoice,
    /// Stop after this many listing pages. `None` runs until exhaustion,
    /// bounded by [`MAX_PAGES`].
    pub page_limit: Option<u32>,
    /// Pause before each detail-page fetch.
    pub detail_delay: Duration,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            layout: LayoutChoice::Detect,
            page_limit: None,
            detail_delay: Duration::from_millis(400),
        }
    }
}

/// Why a successful collection stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A page yielded zero entries.
    Exhausted,
    /// The page limit was reached.
    Capped,
}

/// Driver state between page iterations.
#[derive(Debug)]
pub enum PageState {
    /// About to fetch this 1-based page.
    Fetching(u32),
    Exhausted,
    Capped,
    /// The run failed; carries the error returned to the caller.
    Aborted(ScraperError),
}

impl PageState {
    /// Initial state for a run with `limit`.
    #[must_use]
    pub fn start(limit: Option<u32>) -> Self {
        if limit == Some(0) {
            Self::Capped
        } else {
            Self::Fetching(1)
        }
    }

    /// State after `page` parsed to `found` entries.
    #[must_use]
    pub fn advance(page: u32, found: usize, limit: Option<u32>) -> Self {
        if found == 0 {
            Self::Exhausted
        } else if limit.is_some_and(|limit| page >= limit) {
            Self::Capped
        } else {
            Self::Fetching(page + 1)
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Fetching(_))
    }
}

/// Everything one run collected, in page order then document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub entries: Vec<ReviewEntry>,
    /// Listing pages requested, including a final empty one and a first page
    /// refetched after detection.
    pub pages_fetched: u32,
    pub termination: Termination,
    /// Layout the entries were parsed with; `None` when detection found no
    /// layout on the first page.
    pub layout: Option<String>,
    pub profile_format: ProfileFormat,
}

impl Collection {
    /// Normalizes every entry's profile and builds the dataset.
    #[must_use]
    pub fn into_dataset(self) -> Dataset {
        let layout = self.layout.as_deref().unwrap_or(UNKNOWN);
        assemble(self.entries, self.profile_format, layout)
    }
}

/// Collects every review reachable from `url`.
///
/// `url` may be a product page; it is normalized to the review listing first.
///
/// # Errors
///
/// - [`ScraperError::UnknownLayout`] / [`ScraperError::InvalidListingUrl`]
///   before any fetch.
/// - [`ScraperError::PageAborted`] when a listing page fails to fetch; the
///   entries collected so far are discarded.
/// - [`ScraperError::PaginationLimit`] when no limit is set and the listing
///   runs past [`MAX_PAGES`].
pub async fn collect<F: PageFetcher>(
    fetcher: &F,
    layouts: &LayoutSet,
    url: &str,
    options: &CollectOptions,
) -> Result<Collection, ScraperError> {
    let mut active: Option<&CompiledLayout> = match &options.layout {
        LayoutChoice::Named(name) => Some(layouts.get(name)?),
        LayoutChoice::Detect => None,
    };
    let known_suffixes = layouts.listing_suffixes();
    let mut base = match active {
        Some(layout) => normalize_listing_url(url, &layout.layout().listing_suffix)?,
        None => {
            let given = normalize_listing_url(url, "")?;
            let suffix = existing_listing_suffix(&given, &known_suffixes)
                .unwrap_or(DEFAULT_LISTING_SUFFIX);
            normalize_listing_url(url, suffix)?
        }
    };

    tracing::info!(
        url = %base,
        layout = active.map_or("detect", CompiledLayout::name),
        page_limit = ?options.page_limit,
        "collecting reviews"
    );

    let mut entries: Vec<ReviewEntry> = Vec::new();
    let mut pages_fetched = 0u32;
    let mut state = PageState::start(options.page_limit);

    let termination = loop {
        let page = match state {
            PageState::Fetching(page) => page,
            PageState::Exhausted => break Termination::Exhausted,
            PageState::Capped => break Termination::Capped,
            PageState::Aborted(err) => return Err(err),
        };

        if options.page_limit.is_none() && page > MAX_PAGES {
            state = PageState::Aborted(ScraperError::PaginationLimit {
                url: base.to_string(),
                max_pages: MAX_PAGES,
            });
            continue;
        }

        let param = active.map_or(DEFAULT_PAGE_PARAM, |l| l.layout().page_param.as_str());
        let target = page_url(&base, param, page);

        pages_fetched += 1;
        let markup = match fetcher.fetch_page(target.as_str()).await {
            Ok(markup) => markup,
            Err(source) => {
                tracing::warn!(page, url = %target, error = %source, "listing fetch failed, aborting");
                state = PageState::Aborted(ScraperError::PageAborted {
                    page,
                    collected: entries.len(),
                    source: Box::new(source),
                });
                continue;
            }
        };

        let layout = match active {
            Some(layout) => layout,
            None => match layouts.detect(&markup) {
                Some(layout) => {
                    tracing::info!(layout = layout.name(), "detected listing layout");
                    active = Some(layout);
                    base = rebase_listing_url(
                        url,
                        &known_suffixes,
                        &layout.layout().listing_suffix,
                    )?;
                    let first = page_url(&base, &layout.layout().page_param, 1);
                    if first != target {
                        tracing::info!(
                            layout = layout.name(),
                            url = %first,
                            "layout uses a different listing URL, refetching first page"
                        );
                        state = PageState::Fetching(1);
                        continue;
                    }
                    layout
                }
                None => {
                    tracing::warn!(url = %target, "no known layout matches the first page");
                    state = PageState::Exhausted;
                    continue;
                }
            },
        };

        let found = collect_page(fetcher, layout, &markup, &target, options, &mut entries).await;
        if found == 0 && page == 1 {
            tracing::warn!(
                layout = layout.name(),
                url = %target,
                "first page has no reviews; the layout may not match this page"
            );
        }
        tracing::info!(page, entries = found, total = entries.len(), "page collected");

        state = PageState::advance(page, found, options.page_limit);
    };

    tracing::info!(
        pages = pages_fetched,
        entries = entries.len(),
        termination = ?termination,
        "collection finished"
    );

    Ok(Collection {
        entries,
        pages_fetched,
        termination,
        layout: active.map(|l| l.name().to_owned()),
        profile_format: active.map_or_else(ProfileFormat::default, |l| l.layout().profile_format),
    })
}

/// Parses one listing page and expands its entries into `out`.
/// Returns the number of entries found on the page.
async fn collect_page<F: PageFetcher>(
    fetcher: &F,
    layout: &CompiledLayout,
    markup: &str,
    page: &Url,
    options: &CollectOptions,
    out: &mut Vec<ReviewEntry>,
) -> usize {
    let items = parse_listing(markup, layout, Some(page));
    let found = items.len();

    for item in items {
        let entry = expand(
            fetcher,
            layout,
            item.entry,
            item.detail_link.as_deref(),
            options.detail_delay,
        )
        .await;
        out.push(entry);
    }

    found
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;
