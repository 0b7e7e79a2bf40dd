pub mod assemble;
pub mod client;
pub mod error;
pub mod expand;
pub mod normalize;
pub mod pagination;
pub mod parse;
pub(crate) mod parse_helpers;
pub(crate) mod rate_limit;
#[cfg(feature = "render")]
pub mod render;
pub mod selectors;

pub use assemble::assemble;
pub use client::{
    existing_listing_suffix, normalize_listing_url, page_url, rebase_listing_url, PageFetcher,
    ReviewClient,
};
pub use error::ScraperError;
pub use expand::{expand, extract_detail_text};
pub use normalize::{normalize_profile, GENDER_LABELS, SKIN_TYPE_LABELS};
pub use pagination::{
    collect, CollectOptions, Collection, LayoutChoice, PageState, Termination, MAX_PAGES,
};
pub use parse::{parse_listing, RawItem};
#[cfg(feature = "render")]
pub use render::BrowserFetcher;
pub use selectors::{CompiledLayout, LayoutSet};
