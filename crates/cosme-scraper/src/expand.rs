//! Best-effort "read more" expansion: replace a truncated excerpt with the
//! full text from the review's detail page.

use std::time::Duration;

use cosme_core::ReviewEntry;
use scraper::Html;

use crate::client::PageFetcher;
use crate::parse_helpers::{first_match, text_excluding};
use crate::selectors::CompiledLayout;

/// Follows `link` (if any) and swaps in the full review text.
///
/// Waits `delay` before the fetch. Every failure (fetch error, no detail node,
/// empty text) keeps the listing excerpt; this function never fails.
pub async fn expand<F: PageFetcher>(
    fetcher: &F,
    layout: &CompiledLayout,
    mut entry: ReviewEntry,
    link: Option<&str>,
    delay: Duration,
) -> ReviewEntry {
    let Some(link) = link else {
        return entry;
    };
    if !layout.has_detail_selectors() {
        tracing::debug!(layout = layout.name(), "layout has no detail selectors, keeping excerpt");
        return entry;
    }

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let markup = match fetcher.fetch_page(link).await {
        Ok(markup) => markup,
        Err(e) => {
            tracing::warn!(url = link, error = %e, "detail fetch failed, keeping excerpt");
            return entry;
        }
    };

    match extract_detail_text(&markup, layout) {
        Some(full) => {
            tracing::debug!(url = link, chars = full.chars().count(), "expanded review body");
            entry.body_text = full;
        }
        None => tracing::debug!(url = link, "no detail text on page, keeping excerpt"),
    }
    entry
}

/// Full review text from a detail page, or `None` if no detail selector
/// matches or the matched node is blank.
#[must_use]
pub fn extract_detail_text(markup: &str, layout: &CompiledLayout) -> Option<String> {
    let document = Html::parse_document(markup);
    let root = document.root_element();
    let text = first_match(root, &layout.detail_body)
        .map(|node| text_excluding(node, &layout.body_exclude))?;
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScraperError;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct OnePage {
        result: Result<&'static str, u16>,
        calls: AtomicU32,
    }

    impl OnePage {
        fn ok(markup: &'static str) -> Self {
            Self {
                result: Ok(markup),
                calls: AtomicU32::new(0),
            }
        }

        fn status(status: u16) -> Self {
            Self {
                result: Err(status),
                calls: AtomicU32::new(0),
            }
        }
    }

    impl PageFetcher for OnePage {
        async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.result {
                Ok(markup) => Ok(markup.to_owned()),
                Err(status) => Err(ScraperError::UnexpectedStatus {
                    status,
                    url: url.to_owned(),
                }),
            }
        }
    }

    fn layout() -> CompiledLayout {
        let layouts = cosme_core::builtin_layouts();
        CompiledLayout::compile(&layouts[0]).unwrap()
    }

    fn excerpt() -> ReviewEntry {
        ReviewEntry {
            rating: Some(4.0),
            raw_profile: "30代 女性 乾燥肌".to_owned(),
            body_text: "しっとり…".to_owned(),
            posted_at: "2024/05/12".to_owned(),
        }
    }

    const DETAIL: &str = r#"
        <div id="product-review-detail"><div class="body">
          <p class="read">しっとりするのに べたつかない。
          朝まで潤いが続きます。</p>
        </div></div>
    "#;

    #[tokio::test]
    async fn replaces_excerpt_with_full_text() {
        let fetcher = OnePage::ok(DETAIL);
        let entry = expand(&fetcher, &layout(), excerpt(), Some("https://x/1"), Duration::ZERO).await;
        assert_eq!(
            entry.body_text,
            "しっとりするのに べたつかない。 朝まで潤いが続きます。"
        );
        assert_eq!(entry.rating, Some(4.0));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_excerpt() {
        let fetcher = OnePage::status(500);
        let entry = expand(&fetcher, &layout(), excerpt(), Some("https://x/1"), Duration::ZERO).await;
        assert_eq!(entry, excerpt());
    }

    #[tokio::test]
    async fn missing_detail_node_keeps_excerpt() {
        let fetcher = OnePage::ok("<html><body><p>削除されました</p></body></html>");
        let entry = expand(&fetcher, &layout(), excerpt(), Some("https://x/1"), Duration::ZERO).await;
        assert_eq!(entry, excerpt());
    }

    #[tokio::test]
    async fn blank_detail_node_keeps_excerpt() {
        let fetcher = OnePage::ok(r#"<div class="review-detail"><p class="read">  </p></div>"#);
        let entry = expand(&fetcher, &layout(), excerpt(), Some("https://x/1"), Duration::ZERO).await;
        assert_eq!(entry, excerpt());
    }

    #[tokio::test]
    async fn no_link_means_no_fetch() {
        let fetcher = OnePage::ok(DETAIL);
        let entry = expand(&fetcher, &layout(), excerpt(), None, Duration::ZERO).await;
        assert_eq!(entry, excerpt());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn layout_without_detail_selectors_skips_fetch() {
        let mut raw = cosme_core::builtin_layouts().remove(0);
        raw.selectors.detail_body.clear();
        let layout = CompiledLayout::compile(&raw).unwrap();
        let fetcher = OnePage::ok(DETAIL);
        let entry = expand(&fetcher, &layout, excerpt(), Some("https://x/1"), Duration::ZERO).await;
        assert_eq!(entry, excerpt());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_pacing_delay_before_fetch() {
        let fetcher = OnePage::ok(DETAIL);
        let start = tokio::time::Instant::now();
        let _ = expand(
            &fetcher,
            &layout(),
            excerpt(),
            Some("https://x/1"),
            Duration::from_millis(400),
        )
        .await;
        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[test]
    fn extract_detail_text_uses_second_selector() {
        let markup = r#"<div class="review-detail"><p class="read">全文</p></div>"#;
        assert_eq!(extract_detail_text(markup, &layout()).as_deref(), Some("全文"));
    }
}
