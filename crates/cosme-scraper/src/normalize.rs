//! Reviewer-profile normalization: free text → [`NormalizedProfile`].
//!
//! Normalization is total. Any input, including `""`, yields all three
//! attributes, each either a recognized label or [`UNKNOWN`].

use std::sync::LazyLock;

use cosme_core::{NormalizedProfile, ProfileFormat, Separator, UNKNOWN};
use regex::Regex;

/// Gender labels the site displays.
pub const GENDER_LABELS: &[&str] = &["女性", "男性"];

/// Skin-type labels the site displays.
pub const SKIN_TYPE_LABELS: &[&str] = &[
    "乾燥肌",
    "脂性肌",
    "普通肌",
    "混合肌",
    "敏感肌",
    "アトピー肌",
];

static AGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\s*(?:代|歳)(?:前半|後半)?").expect("valid age regex")
});

static AGE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\s*(?:代|歳)(?:前半|後半)?$").expect("valid age token regex")
});

static GENDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&alternation(GENDER_LABELS)).expect("valid gender regex"));

static SKIN_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&alternation(SKIN_TYPE_LABELS)).expect("valid skin type regex"));

fn alternation(labels: &[&str]) -> String {
    labels
        .iter()
        .map(|l| regex::escape(l))
        .collect::<Vec<_>>()
        .join("|")
}

/// Decomposes `raw` into age bracket, gender and skin type.
#[must_use]
pub fn normalize_profile(raw: &str, format: ProfileFormat) -> NormalizedProfile {
    match format {
        ProfileFormat::PatternCapture => capture(raw),
        ProfileFormat::DelimiterSplit { separator } => split(raw, separator),
    }
}

fn capture(raw: &str) -> NormalizedProfile {
    let found = |re: &Regex| re.find(raw).map(|m| m.as_str().to_owned());

    NormalizedProfile {
        age_bracket: found(&AGE_RE).map_or_else(unknown, |age| canonical_age(&age)),
        gender: found(&GENDER_RE).unwrap_or_else(unknown),
        skin_type: found(&SKIN_TYPE_RE).unwrap_or_else(unknown),
    }
}

fn split(raw: &str, separator: Separator) -> NormalizedProfile {
    let fields: Vec<&str> = match separator {
        Separator::MiddleDot => raw
            .split('・')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect(),
        Separator::Whitespace => raw.split_whitespace().collect(),
    };
    let field = |i: usize| fields.get(i).copied();

    NormalizedProfile {
        age_bracket: field(0)
            .filter(|t| AGE_TOKEN_RE.is_match(t))
            .map_or_else(unknown, canonical_age),
        gender: field(1)
            .filter(|t| GENDER_LABELS.contains(t))
            .map_or_else(unknown, str::to_owned),
        skin_type: field(2)
            .filter(|t| SKIN_TYPE_LABELS.contains(t))
            .map_or_else(unknown, str::to_owned),
    }
}

/// Drops inner whitespace and folds full-width digits: `"３０ 代"` → `"30代"`.
fn canonical_age(token: &str) -> String {
    token
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '０'..='９' => {
                char::from_u32(u32::from(c) - u32::from('０') + u32::from('0')).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

fn unknown() -> String {
    UNKNOWN.to_owned()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
