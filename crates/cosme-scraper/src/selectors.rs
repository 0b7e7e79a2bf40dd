//! Compiled layout descriptors and trial-selector layout detection.

use cosme_core::Layout;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScraperError;

/// A [`Layout`] with every CSS selector parsed once up front.
#[derive(Debug)]
pub struct CompiledLayout {
    layout: Layout,
    pub(crate) entry: Vec<Selector>,
    pub(crate) rating: Vec<Selector>,
    pub(crate) profile: Vec<Selector>,
    pub(crate) body: Vec<Selector>,
    pub(crate) body_exclude: Vec<Selector>,
    pub(crate) date: Vec<Selector>,
    pub(crate) read_more: Vec<Selector>,
    pub(crate) detail_body: Vec<Selector>,
}

impl CompiledLayout {
    /// Compiles every selector of `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] naming the first selector that
    /// does not parse.
    pub fn compile(layout: &Layout) -> Result<Self, ScraperError> {
        let name = layout.name.as_str();
        let s = &layout.selectors;

        Ok(Self {
            entry: compile_all(name, &s.entry)?,
            rating: compile_all(name, &s.rating)?,
            profile: compile_all(name, &s.profile)?,
            body: compile_all(name, &s.body)?,
            body_exclude: compile_all(name, &s.body_exclude)?,
            date: compile_all(name, &s.date)?,
            read_more: compile_all(name, &s.read_more)?,
            detail_body: compile_all(name, &s.detail_body)?,
            layout: layout.clone(),
        })
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.layout.name
    }

    /// Returns `true` if a detail page can be parsed with this layout.
    #[must_use]
    pub fn has_detail_selectors(&self) -> bool {
        !self.detail_body.is_empty()
    }

    /// Review nodes of `document`, using the first entry selector that matches
    /// at least one node. Empty when no candidate matches.
    pub(crate) fn select_entries<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        self.entry
            .iter()
            .map(|sel| document.select(sel).collect::<Vec<_>>())
            .find(|nodes| !nodes.is_empty())
            .unwrap_or_default()
    }

    /// Returns `true` if any entry selector matches in `document`.
    #[must_use]
    pub fn matches(&self, document: &Html) -> bool {
        self.entry.iter().any(|sel| document.select(sel).next().is_some())
    }
}

fn compile_all(layout: &str, list: &[String]) -> Result<Vec<Selector>, ScraperError> {
    list.iter()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            Selector::parse(raw).map_err(|e| ScraperError::InvalidSelector {
                layout: layout.to_owned(),
                selector: raw.clone(),
                reason: format!("{e:?}"),
            })
        })
        .collect()
}

/// The set of layouts a run may use, in probing order.
#[derive(Debug)]
pub struct LayoutSet {
    layouts: Vec<CompiledLayout>,
}

impl LayoutSet {
    /// Compiles `layouts`, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] if any selector does not parse.
    pub fn compile(layouts: &[Layout]) -> Result<Self, ScraperError> {
        let layouts = layouts
            .iter()
            .map(CompiledLayout::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { layouts })
    }

    /// The built-in layouts from [`cosme_core::builtin_layouts`].
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] if a built-in selector does not parse.
    pub fn builtin() -> Result<Self, ScraperError> {
        Self::compile(&cosme_core::builtin_layouts())
    }

    /// Looks a layout up by name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::UnknownLayout`] if no layout has that name.
    pub fn get(&self, name: &str) -> Result<&CompiledLayout, ScraperError> {
        self.layouts
            .iter()
            .find(|l| l.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ScraperError::UnknownLayout {
                name: name.to_owned(),
            })
    }

    /// First layout whose entry selectors match anything in `markup`.
    #[must_use]
    pub fn detect(&self, markup: &str) -> Option<&CompiledLayout> {
        let document = Html::parse_document(markup);
        let found = self.layouts.iter().find(|l| l.matches(&document));
        match found {
            Some(layout) => tracing::debug!(layout = layout.name(), "detected layout"),
            None => tracing::debug!("no layout matched page markup"),
        }
        found
    }

    /// Distinct listing suffixes of every layout, longest first.
    #[must_use]
    pub fn listing_suffixes(&self) -> Vec<&str> {
        let mut suffixes: Vec<&str> = self
            .layouts
            .iter()
            .map(|l| l.layout().listing_suffix.as_str())
            .collect();
        suffixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        suffixes.dedup();
        suffixes
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledLayout> {
        self.layouts.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_named(name: &str) -> Layout {
        cosme_core::builtin_layouts()
            .into_iter()
            .find(|l| l.name == name)
            .expect("built-in layout")
    }

    #[test]
    fn every_builtin_layout_compiles() {
        let set = LayoutSet::builtin().unwrap();
        assert_eq!(set.len(), cosme_core::builtin_layouts().len());
    }

    #[test]
    fn invalid_selector_names_layout_and_selector() {
        let mut layout = layout_named("cosme-card");
        layout.selectors.date = vec!["[[broken".to_owned()];
        let err = CompiledLayout::compile(&layout).unwrap_err();
        assert!(
            matches!(err, ScraperError::InvalidSelector { ref layout, ref selector, .. }
                if layout == "cosme-card" && selector == "[[broken"),
            "got: {err:?}"
        );
    }

    #[test]
    fn blank_selectors_are_skipped() {
        let mut layout = layout_named("cosme-card");
        layout.selectors.read_more = vec!["  ".to_owned()];
        let compiled = CompiledLayout::compile(&layout).unwrap();
        assert!(compiled.read_more.is_empty());
    }

    #[test]
    fn get_is_case_insensitive() {
        let set = LayoutSet::builtin().unwrap();
        assert_eq!(set.get("COSME-2024").unwrap().name(), "cosme-2024");
    }

    #[test]
    fn get_unknown_layout_errors() {
        let set = LayoutSet::builtin().unwrap();
        assert!(matches!(
            set.get("cosme-1999"),
            Err(ScraperError::UnknownLayout { .. })
        ));
    }

    #[test]
    fn detect_picks_matching_layout() {
        let set = LayoutSet::builtin().unwrap();
        let markup = r#"<ul class="review-list"><li class="review-card">x</li></ul>"#;
        assert_eq!(set.detect(markup).unwrap().name(), "cosme-card");
    }

    #[test]
    fn detect_prefers_earlier_layout_when_several_match() {
        let set = LayoutSet::builtin().unwrap();
        let markup = r#"
            <div id="product-review-list"><div>a</div></div>
            <div class="review-sec">b</div>
        "#;
        assert_eq!(set.detect(markup).unwrap().name(), "cosme-2024");
    }

    #[test]
    fn detect_returns_none_for_unrecognized_markup() {
        let set = LayoutSet::builtin().unwrap();
        assert!(set.detect("<html><body><p>maintenance</p></body></html>").is_none());
    }

    #[test]
    fn listing_suffixes_are_distinct_and_longest_first() {
        let set = LayoutSet::builtin().unwrap();
        assert_eq!(set.listing_suffixes(), vec!["/reviews/", "/review/"]);
    }

    #[test]
    fn select_entries_falls_back_to_second_candidate() {
        let compiled = CompiledLayout::compile(&layout_named("cosme-card")).unwrap();
        let doc = Html::parse_document(
            r#"<div class="review-card">1</div><div class="review-card">2</div>"#,
        );
        assert_eq!(compiled.select_entries(&doc).len(), 2);
    }
}
