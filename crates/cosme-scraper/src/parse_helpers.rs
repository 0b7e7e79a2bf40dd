//! Text and attribute primitives shared by the listing parser and the detail
//! expander. None of these fail: missing input degrades to `None` or `""`.

use cosme_core::RatingRule;
use reqwest::Url;
use scraper::{ElementRef, Node, Selector};

/// Collapses every whitespace run to a single space and trims the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First descendant of `node` matched by the selectors, tried in priority order.
///
/// Only the first selector that finds anything is used; results of different
/// selectors are never combined.
pub(crate) fn first_match<'a>(node: ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|sel| node.select(sel).next())
}

/// Text of `node` with each text piece trimmed and joined by a single space.
/// Used for profile strings, where pieces are separate `<li>`/`<span>` tokens.
pub(crate) fn spaced_text(node: ElementRef<'_>) -> String {
    collapse_whitespace(&node.text().collect::<Vec<_>>().join(" "))
}

/// Text of `node`, skipping any descendant subtree matched by `exclude`.
pub(crate) fn text_excluding(node: ElementRef<'_>, exclude: &[Selector]) -> String {
    let mut out = String::new();
    push_text(node, exclude, &mut out);
    collapse_whitespace(&out)
}

fn push_text(node: ElementRef<'_>, exclude: &[Selector], out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(element) = ElementRef::wrap(child) else {
                    continue;
                };
                if element.value().name() == "br" {
                    out.push(' ');
                    continue;
                }
                if exclude.iter().any(|sel| sel.matches(&element)) {
                    continue;
                }
                push_text(element, exclude, out);
            }
            _ => {}
        }
    }
}

/// Parses a rating out of free text by keeping only ASCII digits and `.`.
///
/// `"4.5"` → `4.5`, `"評価 5"` → `5.0`, `"星なし"` → `None`. No range check.
pub(crate) fn parse_rating_text(text: &str) -> Option<f64> {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if kept.is_empty() {
        return None;
    }
    kept.parse::<f64>().ok()
}

/// Reads a star count from a class name of `node` or its descendants that
/// starts with `prefix`: `star-4` → `4.0`, `star-4-5` / `star-4_5` → `4.5`.
pub(crate) fn rating_from_class(node: ElementRef<'_>, prefix: &str) -> Option<f64> {
    node.descendants()
        .filter_map(ElementRef::wrap)
        .flat_map(|el| el.value().classes())
        .find_map(|class| {
            let suffix = class.strip_prefix(prefix)?;
            let normalized: String = suffix
                .chars()
                .map(|c| if c == '-' || c == '_' { '.' } else { c })
                .collect();
            if normalized.is_empty() || !normalized.starts_with(|c: char| c.is_ascii_digit()) {
                return None;
            }
            normalized.parse::<f64>().ok()
        })
}

/// Decodes the rating node per the layout's rule.
pub(crate) fn decode_rating(node: ElementRef<'_>, rule: &RatingRule) -> Option<f64> {
    match rule {
        RatingRule::Text => parse_rating_text(&node.text().collect::<String>()),
        RatingRule::ClassSuffix { prefix } => rating_from_class(node, prefix),
    }
}

/// Resolves an `href` against the page it appeared on.
///
/// Fragment-only and `javascript:` links are not followable and yield `None`.
pub(crate) fn resolve_link(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.to_ascii_lowercase().starts_with("javascript:")
    {
        return None;
    }

    let resolved = match base {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}
