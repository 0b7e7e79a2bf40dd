//! Headless Chrome fetcher for templates that only exist after client-side
//! rendering. Enabled with the `render` feature.

use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions};

use crate::client::PageFetcher;
use crate::error::ScraperError;

/// Fetches pages through one shared headless browser.
///
/// Each fetch opens a tab, navigates, waits the settle time and returns the
/// rendered DOM. The blocking browser calls run on tokio's blocking pool.
pub struct BrowserFetcher {
    browser: Browser,
    settle: Duration,
    user_agent: String,
    accept_language: String,
}

impl BrowserFetcher {
    /// Launches the browser.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Render`] if Chrome cannot be found or started.
    pub fn launch(
        settle: Duration,
        user_agent: &str,
        accept_language: &str,
        idle_timeout_secs: u64,
    ) -> Result<Self, ScraperError> {
        let launch_error = |reason: String| ScraperError::Render {
            url: "about:blank".to_owned(),
            reason,
        };

        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .idle_browser_timeout(Duration::from_secs(idle_timeout_secs.max(30)))
            .build()
            .map_err(|e| launch_error(e.to_string()))?;
        let browser = Browser::new(options).map_err(|e| launch_error(e.to_string()))?;

        tracing::info!(settle_ms = settle.as_millis(), "headless browser launched");

        Ok(Self {
            browser,
            settle,
            user_agent: user_agent.to_owned(),
            accept_language: accept_language.to_owned(),
        })
    }

    /// Builds a fetcher from the scraper section of [`cosme_core::AppConfig`].
    ///
    /// # Errors
    ///
    /// See [`BrowserFetcher::launch`].
    pub fn from_config(
        config: &cosme_core::AppConfig,
        settle: Duration,
    ) -> Result<Self, ScraperError> {
        Self::launch(
            settle,
            &config.scraper_user_agent,
            &config.scraper_accept_language,
            config.scraper_request_timeout_secs.saturating_mul(3),
        )
    }
}

fn render_page(
    browser: &Browser,
    url: &str,
    settle: Duration,
    user_agent: &str,
    accept_language: &str,
) -> Result<String, ScraperError> {
    let failed = |reason: String| ScraperError::Render {
        url: url.to_owned(),
        reason,
    };

    let tab = browser.new_tab().map_err(|e| failed(e.to_string()))?;
    tab.set_user_agent(user_agent, Some(accept_language), None)
        .map_err(|e| failed(e.to_string()))?;
    tab.navigate_to(url).map_err(|e| failed(e.to_string()))?;
    if let Err(e) = tab.wait_until_navigated() {
        tracing::warn!(url, error = %e, "navigation did not settle, reading current DOM");
    }

    std::thread::sleep(settle);
    let html = tab.get_content().map_err(|e| failed(e.to_string()));

    if let Err(e) = tab.close(true) {
        tracing::debug!(url, error = %e, "failed to close tab");
    }
    html
}

impl PageFetcher for BrowserFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        tracing::debug!(url, "rendering page");
        let browser = self.browser.clone();
        let target = url.to_owned();
        let settle = self.settle;
        let user_agent = self.user_agent.clone();
        let accept_language = self.accept_language.clone();

        tokio::task::spawn_blocking(move || {
            render_page(&browser, &target, settle, &user_agent, &accept_language)
        })
        .await
        .map_err(|e| ScraperError::Render {
            url: url.to_owned(),
            reason: e.to_string(),
        })?
    }
}
