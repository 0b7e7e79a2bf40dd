use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("browser rendering failed for {url}: {reason}")]
    Render { url: String, reason: String },

    #[error("invalid listing URL \"{url}\": {reason}")]
    InvalidListingUrl { url: String, reason: String },

    #[error("invalid header value for {name}: {value:?}")]
    InvalidHeader { name: &'static str, value: String },

    #[error("invalid selector {selector:?} in layout {layout}: {reason}")]
    InvalidSelector {
        layout: String,
        selector: String,
        reason: String,
    },

    #[error("unknown layout: {name}")]
    UnknownLayout { name: String },

    #[error("pagination limit reached for {url}: exceeded {max_pages} pages")]
    PaginationLimit { url: String, max_pages: u32 },

    #[error("collection aborted on page {page} after {collected} reviews: {source}")]
    PageAborted {
        page: u32,
        collected: usize,
        #[source]
        source: Box<ScraperError>,
    },
}

impl ScraperError {
    /// Returns `true` for failures of the network boundary itself: connection
    /// errors, timeouts, non-2xx responses and browser rendering failures.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Http(_)
            | Self::RateLimited { .. }
            | Self::NotFound { .. }
            | Self::UnexpectedStatus { .. }
            | Self::Render { .. } => true,
            Self::PageAborted { source, .. } => source.is_transport(),
            _ => false,
        }
    }
}
