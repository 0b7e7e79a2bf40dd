//! Layout descriptors for the review-listing templates the site has fielded.
//!
//! A [`Layout`] is plain data: a table of CSS selectors keyed by field name
//! plus the rules for decoding ratings and profiles. The scraper compiles it
//! once per run, so supporting a new template means adding a layout (in code
//! or in a YAML file), not touching the pipeline.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How a rating indicator node is turned into a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RatingRule {
    /// Keep the digits and decimal point of the node text, e.g. `"4.5"` or `"評価 5"`.
    Text,
    /// Read the star count from a class name such as `star-4` (prefix `"star-"`).
    ClassSuffix { prefix: String },
}

/// Field separator for [`ProfileFormat::DelimiterSplit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Separator {
    /// `・` (katakana middle dot), e.g. `"20代後半・女性・混合肌"`.
    MiddleDot,
    /// Any run of whitespace.
    Whitespace,
}

/// Shape of the reviewer profile string for a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfileFormat {
    /// Search the whole string for an age token, a gender token and a skin type.
    #[default]
    PatternCapture,
    /// Positional fields: age, gender, skin type.
    DelimiterSplit { separator: Separator },
}

/// CSS selectors keyed by field. Every list is in priority order; the first
/// selector that finds a node wins and the others are ignored for that field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSelectors {
    /// Candidate containers, one node per review.
    pub entry: Vec<String>,
    #[serde(default)]
    pub rating: Vec<String>,
    #[serde(default)]
    pub profile: Vec<String>,
    #[serde(default)]
    pub body: Vec<String>,
    /// Descendants of the body node whose text must not leak into the body.
    #[serde(default)]
    pub body_exclude: Vec<String>,
    #[serde(default)]
    pub date: Vec<String>,
    /// "Read more" anchors pointing at the untruncated review.
    #[serde(default)]
    pub read_more: Vec<String>,
    /// Full-text node on the detail page.
    #[serde(default)]
    pub detail_body: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub selectors: LayoutSelectors,
    #[serde(default = "default_rating_rule")]
    pub rating_rule: RatingRule,
    #[serde(default)]
    pub profile_format: ProfileFormat,
    /// Query parameter carrying the 1-based page number.
    #[serde(default = "default_page_param")]
    pub page_param: String,
    /// Path suffix of the review-listing endpoint for a product.
    #[serde(default = "default_listing_suffix")]
    pub listing_suffix: String,
    /// Settle time after load for templates rendered client-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_wait_ms: Option<u64>,
}

fn default_rating_rule() -> RatingRule {
    RatingRule::Text
}

fn default_page_param() -> String {
    "page".to_owned()
}

fn default_listing_suffix() -> String {
    "/review/".to_owned()
}

impl Layout {
    /// Returns `true` when the layout only appears after client-side rendering.
    #[must_use]
    pub fn needs_rendering(&self) -> bool {
        self.render_wait_ms.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct LayoutsFile {
    pub layouts: Vec<Layout>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// The templates known to have been served by the site, newest first.
///
/// The order doubles as the probing order for layout detection.
#[must_use]
pub fn builtin_layouts() -> Vec<Layout> {
    vec![
        Layout {
            name: "cosme-2024".to_owned(),
            description: Some("product-review-list with reviewer-info header".to_owned()),
            selectors: LayoutSelectors {
                entry: strings(&["#product-review-list > div"]),
                rating: strings(&["div.body div.rating.clearfix p.reviewer-rating"]),
                profile: strings(&["div.head div.reviewer-info"]),
                body: strings(&[
                    "div.body > p:not(.reviewer-rating):not(.mobile-date):not(.more)",
                    "div.body p.read",
                ]),
                body_exclude: strings(&[
                    ".reviewer-rating",
                    ".mobile-date",
                    "a.read-more",
                    "p.more",
                ]),
                date: strings(&["div.body div.rating.clearfix p.mobile-date"]),
                read_more: strings(&["div.body a.read-more", "div.body p.more a"]),
                detail_body: strings(&[
                    "#product-review-detail div.body p.read",
                    "div.review-detail p.read",
                ]),
            },
            rating_rule: RatingRule::Text,
            profile_format: ProfileFormat::PatternCapture,
            page_param: default_page_param(),
            listing_suffix: default_listing_suffix(),
            render_wait_ms: None,
        },
        Layout {
            name: "cosme-2022".to_owned(),
            description: Some("review-sec blocks with star classes".to_owned()),
            selectors: LayoutSelectors {
                entry: strings(&["div.review-sec"]),
                rating: strings(&["div.rating-stars", "p.reviewer-rating"]),
                profile: strings(&["p.reviewer-attr", "ul.reviewer-info"]),
                body: strings(&["p.read"]),
                body_exclude: strings(&["span.read-more"]),
                date: strings(&["p.date", "span.date"]),
                read_more: strings(&["span.read-more a", "a.cmn-viewmore"]),
                detail_body: strings(&["div.review-sec p.read"]),
            },
            rating_rule: RatingRule::ClassSuffix {
                prefix: "star-".to_owned(),
            },
            profile_format: ProfileFormat::DelimiterSplit {
                separator: Separator::MiddleDot,
            },
            page_param: default_page_param(),
            listing_suffix: default_listing_suffix(),
            render_wait_ms: None,
        },
        Layout {
            name: "cosme-card".to_owned(),
            description: Some("card list with space-separated profile".to_owned()),
            selectors: LayoutSelectors {
                entry: strings(&["ul.review-list > li.review-card", "div.review-card"]),
                rating: strings(&[".rating-value", ".rating .num"]),
                profile: strings(&[".user-profile"]),
                body: strings(&[".review-text"]),
                body_exclude: Vec::new(),
                date: strings(&["time", ".post-date"]),
                read_more: strings(&["a.more-link"]),
                detail_body: strings(&[".review-detail .review-text"]),
            },
            rating_rule: RatingRule::Text,
            profile_format: ProfileFormat::DelimiterSplit {
                separator: Separator::Whitespace,
            },
            page_param: default_page_param(),
            listing_suffix: default_listing_suffix(),
            render_wait_ms: None,
        },
        Layout {
            name: "cosme-sp".to_owned(),
            description: Some("smartphone template with microdata ratings".to_owned()),
            selectors: LayoutSelectors {
                entry: strings(&["section.review-list article"]),
                rating: strings(&["[itemprop='ratingValue']", ".rating"]),
                profile: strings(&[".reviewer .attr", ".reviewer"]),
                body: strings(&[".review-body"]),
                body_exclude: strings(&[".rating", ".review-date"]),
                date: strings(&[".review-date", "[itemprop='datePublished']"]),
                read_more: strings(&[".review-body a.more"]),
                detail_body: strings(&["article .review-body"]),
            },
            rating_rule: RatingRule::Text,
            profile_format: ProfileFormat::PatternCapture,
            page_param: "pg".to_owned(),
            listing_suffix: default_listing_suffix(),
            render_wait_ms: None,
        },
        Layout {
            name: "cosme-table".to_owned(),
            description: Some("legacy table template with rate-N icons".to_owned()),
            selectors: LayoutSelectors {
                entry: strings(&["table.review-table tr.review"]),
                rating: strings(&["td.rating span", "td.rating img"]),
                profile: strings(&["td.reviewer"]),
                body: strings(&["td.comment"]),
                body_exclude: strings(&["span.date"]),
                date: strings(&["td.comment span.date", "td.date"]),
                read_more: strings(&["td.comment a.continue"]),
                detail_body: strings(&["div.review-body"]),
            },
            rating_rule: RatingRule::ClassSuffix {
                prefix: "rate-".to_owned(),
            },
            profile_format: ProfileFormat::PatternCapture,
            page_param: default_page_param(),
            listing_suffix: "/reviews/".to_owned(),
            render_wait_ms: None,
        },
        Layout {
            name: "cosme-rendered".to_owned(),
            description: Some("client-rendered template keyed by data-testid".to_owned()),
            selectors: LayoutSelectors {
                entry: strings(&["[data-testid='review-item']"]),
                rating: strings(&["[data-testid='review-rating']"]),
                profile: strings(&["[data-testid='reviewer-attributes']"]),
                body: strings(&["[data-testid='review-body']"]),
                body_exclude: Vec::new(),
                date: strings(&["[data-testid='review-date']"]),
                read_more: strings(&["a[data-testid='review-read-more']"]),
                detail_body: strings(&["[data-testid='review-detail-body']"]),
            },
            rating_rule: RatingRule::Text,
            profile_format: ProfileFormat::PatternCapture,
            page_param: default_page_param(),
            listing_suffix: default_listing_suffix(),
            render_wait_ms: Some(2_000),
        },
    ]
}

/// Load and validate extra layouts from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_layouts(path: &Path) -> Result<LayoutsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LayoutsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let layouts_file: LayoutsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::LayoutsFileParse)?;

    validate_layouts(&layouts_file.layouts)?;

    Ok(layouts_file)
}

/// Built-in layouts, with those from `path` merged in.
///
/// A file layout whose name matches a built-in replaces it in place; new
/// names are appended after the built-ins.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be loaded or the merged set is invalid.
pub fn resolve_layouts(path: Option<&Path>) -> Result<Vec<Layout>, ConfigError> {
    let mut layouts = builtin_layouts();
    let Some(path) = path else {
        return Ok(layouts);
    };

    for extra in load_layouts(path)?.layouts {
        match layouts.iter_mut().find(|l| l.name == extra.name) {
            Some(existing) => *existing = extra,
            None => layouts.push(extra),
        }
    }

    validate_layouts(&layouts)?;
    Ok(layouts)
}

fn validate_layouts(layouts: &[Layout]) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for layout in layouts {
        if layout.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "layout name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(layout.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate layout name: '{}'",
                layout.name
            )));
        }

        if layout.selectors.entry.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "layout '{}' needs at least one entry selector",
                layout.name
            )));
        }

        if layout.page_param.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "layout '{}' has an empty page_param",
                layout.name
            )));
        }

        if !layout.listing_suffix.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "layout '{}' listing_suffix must start with '/', got '{}'",
                layout.name, layout.listing_suffix
            )));
        }

        if let RatingRule::ClassSuffix { prefix } = &layout.rating_rule {
            if prefix.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "layout '{}' class_suffix rating rule needs a prefix",
                    layout.name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
