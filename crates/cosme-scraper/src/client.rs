use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

/// Source of raw page markup.
///
/// The pagination driver and detail expander only talk to this trait, so tests
/// can swap the network for canned pages.
pub trait PageFetcher: Sync {
    /// Fetches `url` and returns the response body.
    ///
    /// Any failure here is a transport failure (see [`ScraperError::is_transport`]).
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send;
}

/// HTTP fetcher for review-listing and review-detail pages.
///
/// Every request carries the configured `User-Agent` and `Accept-Language`
/// headers and is bounded by the client timeout. Non-2xx responses are typed
/// errors. 429 and network failures are retried with exponential backoff up
/// to `max_retries` additional attempts.
pub struct ReviewClient {
    client: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl ReviewClient {
    /// Creates a `ReviewClient` with the given timeout, headers and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidHeader`] if `accept_language` is not a
    /// valid header value, or [`ScraperError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        accept_language: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        let language =
            HeaderValue::from_str(accept_language).map_err(|_| ScraperError::InvalidHeader {
                name: "Accept-Language",
                value: accept_language.to_owned(),
            })?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from the scraper section of [`cosme_core::AppConfig`].
    ///
    /// # Errors
    ///
    /// See [`ReviewClient::new`].
    pub fn from_config(config: &cosme_core::AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            &config.scraper_accept_language,
            config.scraper_max_retries,
            config.scraper_retry_backoff_base_secs,
        )
    }

    async fn get_once(&self, url: &str) -> Result<String, ScraperError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(ScraperError::RateLimited {
                domain: extract_domain(url),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}

impl PageFetcher for ReviewClient {
    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        tracing::debug!(url, "fetching page");
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.get_once(url)
        })
        .await
    }
}

/// Normalizes a product URL into its review-listing endpoint.
///
/// Appends `suffix` (e.g. `"/review/"`) when the path does not already end
/// with it, and drops any query string or fragment so the page parameter can
/// be added cleanly.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidListingUrl`] if `url` does not parse or is
/// not `http`/`https`.
pub fn normalize_listing_url(url: &str, suffix: &str) -> Result<Url, ScraperError> {
    let invalid = |reason: String| ScraperError::InvalidListingUrl {
        url: url.to_owned(),
        reason,
    };

    let mut parsed = Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
    }
    parsed.set_query(None);
    parsed.set_fragment(None);

    let path = parsed.path().trim_end_matches('/').to_owned();
    let bare_suffix = suffix.trim_end_matches('/');
    let new_path = if path.ends_with(bare_suffix) {
        if suffix.ends_with('/') {
            format!("{path}/")
        } else {
            path
        }
    } else {
        format!("{path}{suffix}")
    };
    parsed.set_path(&new_path);

    Ok(parsed)
}

/// Moves `url` onto the listing endpoint for `suffix`.
///
/// Unlike [`normalize_listing_url`], a path that already ends with one of
/// `known_suffixes` has that suffix swapped for `suffix` instead of getting a
/// second one appended. Pass the suffixes longest first.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidListingUrl`] under the same conditions as
/// [`normalize_listing_url`].
pub fn rebase_listing_url(
    url: &str,
    known_suffixes: &[&str],
    suffix: &str,
) -> Result<Url, ScraperError> {
    let mut bare = normalize_listing_url(url, "")?;
    let path = bare.path();
    let stem = known_suffixes
        .iter()
        .map(|s| s.trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .find_map(|s| path.strip_suffix(s))
        .unwrap_or(path)
        .to_owned();
    bare.set_path(&stem);

    normalize_listing_url(bare.as_str(), suffix)
}

/// The suffix in `known_suffixes` that `url`'s path already ends with, if any.
#[must_use]
pub fn existing_listing_suffix<'a>(url: &Url, known_suffixes: &[&'a str]) -> Option<&'a str> {
    let path = url.path().trim_end_matches('/');
    known_suffixes.iter().copied().find(|s| {
        let bare = s.trim_end_matches('/');
        !bare.is_empty() && path.ends_with(bare)
    })
}

/// Builds the URL for one 1-based listing page: `{base}?{param}={page}`.
///
/// Any existing value of `param` on `base` is replaced; other query pairs are kept.
#[must_use]
pub fn page_url(base: &Url, param: &str, page: u32) -> Url {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(k, _)| k != param)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(param, &page.to_string());
    }
    url
}

/// Extracts the hostname from a URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
