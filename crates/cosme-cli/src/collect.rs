//! `collect` and `layouts` command handlers.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use cosme_analysis::ExportFormat;
use cosme_core::AppConfig;
use cosme_scraper::{
    collect, CollectOptions, Collection, LayoutChoice, LayoutSet, PageFetcher, ReviewClient,
};

use crate::report;

/// Resolved arguments for one `collect` run.
#[derive(Debug)]
pub(crate) struct CollectRequest {
    pub url: String,
    pub page_limit: Option<u32>,
    pub layout: Option<String>,
    pub output: PathBuf,
    pub format: ExportFormat,
    pub detail_delay_ms: u64,
    pub summary: bool,
}

impl CollectRequest {
    fn options(&self) -> CollectOptions {
        CollectOptions {
            layout: self
                .layout
                .clone()
                .map_or(LayoutChoice::Detect, LayoutChoice::Named),
            page_limit: self.page_limit,
            detail_delay: Duration::from_millis(self.detail_delay_ms),
        }
    }
}

fn load_layout_set(config: &AppConfig) -> anyhow::Result<LayoutSet> {
    let layouts = cosme_core::resolve_layouts(config.layouts_path.as_deref())
        .context("failed to load layouts")?;
    LayoutSet::compile(&layouts).context("failed to compile layout selectors")
}

/// Scrape, export, and optionally summarize one product's reviews.
///
/// # Errors
///
/// Returns an error if the layouts or client cannot be set up, the
/// collection aborts on a transport failure, or the export cannot be written.
pub(crate) async fn run_collect(config: &AppConfig, request: CollectRequest) -> anyhow::Result<()> {
    let layouts = load_layout_set(config)?;
    let options = request.options();

    let collection = fetch_with_configured_client(config, &layouts, &request.url, &options).await?;

    let pages = collection.pages_fetched;
    let termination = collection.termination;
    let dataset = collection.into_dataset();

    if dataset.is_empty() {
        println!(
            "no reviews found at {} (check the URL, or pass --layout if the page uses an unlisted template)",
            request.url
        );
    } else {
        println!(
            "collected {} reviews from {pages} pages with layout {} ({termination:?})",
            dataset.len(),
            dataset.layout()
        );
    }

    cosme_analysis::export_to_path(&dataset, &request.output, request.format)
        .with_context(|| format!("failed to export to {}", request.output.display()))?;
    println!("wrote {}", request.output.display());

    if request.summary && !dataset.is_empty() {
        report::print_report(&dataset);
    }
    Ok(())
}

async fn fetch_with_configured_client(
    config: &AppConfig,
    layouts: &LayoutSet,
    url: &str,
    options: &CollectOptions,
) -> anyhow::Result<Collection> {
    let render_wait = match &options.layout {
        LayoutChoice::Named(name) => layouts.get(name)?.layout().render_wait_ms,
        LayoutChoice::Detect => None,
    };

    if let Some(wait_ms) = render_wait {
        #[cfg(feature = "render")]
        {
            let fetcher = cosme_scraper::BrowserFetcher::from_config(
                config,
                Duration::from_millis(wait_ms),
            )
            .context("failed to launch headless browser")?;
            return run(&fetcher, layouts, url, options).await;
        }
        #[cfg(not(feature = "render"))]
        tracing::warn!(
            wait_ms,
            "layout needs client-side rendering but this build lacks the `render` feature; using plain HTTP"
        );
    }

    let client = ReviewClient::from_config(config).context("failed to build HTTP client")?;
    run(&client, layouts, url, options).await
}

async fn run<F: PageFetcher>(
    fetcher: &F,
    layouts: &LayoutSet,
    url: &str,
    options: &CollectOptions,
) -> anyhow::Result<Collection> {
    collect(fetcher, layouts, url, options)
        .await
        .with_context(|| format!("failed to collect reviews from {url}"))
}

/// Print every available layout in detection order.
///
/// # Errors
///
/// Returns an error if the configured layouts file is invalid.
pub(crate) fn print_layouts(config: &AppConfig) -> anyhow::Result<()> {
    let layouts = load_layout_set(config)?;
    for compiled in layouts.iter() {
        let layout = compiled.layout();
        let rendered = if layout.needs_rendering() {
            " [rendered]"
        } else {
            ""
        };
        println!(
            "{:<16} ?{}=N  {}{}{rendered}",
            layout.name,
            layout.page_param,
            layout.listing_suffix,
            layout
                .description
                .as_deref()
                .map(|d| format!("  {d}"))
                .unwrap_or_default()
        );
    }
    Ok(())
}
