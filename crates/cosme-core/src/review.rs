use serde::{Deserialize, Serialize};

/// Sentinel used for any profile attribute that could not be recognized.
pub const UNKNOWN: &str = "unknown";

/// One review as scraped from a listing page, before profile normalization.
///
/// All four fields are always present. Missing markup degrades a field to
/// `None` (rating) or an empty string (everything else).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    /// Score as shown by the site. Integer or decimal depending on the layout.
    pub rating: Option<f64>,
    /// Free-text reviewer description, e.g. `"30代前半 女性 乾燥肌"`.
    pub raw_profile: String,
    /// Review text; the full text when a detail page was fetched.
    pub body_text: String,
    /// Date exactly as displayed, e.g. `"2024/05/12 12:30:00"`.
    pub posted_at: String,
}

/// Reviewer attributes decomposed out of [`ReviewEntry::raw_profile`].
///
/// Every field holds either a recognized label or [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedProfile {
    pub age_bracket: String,
    pub gender: String,
    pub skin_type: String,
}

impl NormalizedProfile {
    /// A profile with every attribute set to [`UNKNOWN`].
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            age_bracket: UNKNOWN.to_owned(),
            gender: UNKNOWN.to_owned(),
            skin_type: UNKNOWN.to_owned(),
        }
    }

    /// Returns `true` when no attribute was recognized.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.age_bracket == UNKNOWN && self.gender == UNKNOWN && self.skin_type == UNKNOWN
    }
}

impl Default for NormalizedProfile {
    fn default() -> Self {
        Self::unknown()
    }
}

/// One row of the assembled dataset. The column set is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRow {
    pub rating: Option<f64>,
    pub age_bracket: String,
    pub gender: String,
    pub skin_type: String,
    pub body_text: String,
    pub posted_at: String,
}

impl ReviewRow {
    /// Combines a scraped entry with its normalized profile.
    #[must_use]
    pub fn new(entry: ReviewEntry, profile: NormalizedProfile) -> Self {
        Self {
            rating: entry.rating,
            age_bracket: profile.age_bracket,
            gender: profile.gender,
            skin_type: profile.skin_type,
            body_text: entry.body_text,
            posted_at: entry.posted_at,
        }
    }
}

/// The tabular result of one collection run, in page then document order.
///
/// Immutable once built: rows are only reachable through shared references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    layout: String,
    rows: Vec<ReviewRow>,
}

impl Dataset {
    #[must_use]
    pub fn new(layout: impl Into<String>, rows: Vec<ReviewRow>) -> Self {
        Self {
            layout: layout.into(),
            rows,
        }
    }

    /// Name of the layout the rows were scraped with.
    #[must_use]
    pub fn layout(&self) -> &str {
        &self.layout
    }

    #[must_use]
    pub fn rows(&self) -> &[ReviewRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ratings of rows that have one, in row order.
    pub fn ratings(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(|r| r.rating)
    }
}
