//! Headline metrics and per-segment rating aggregates.

use std::collections::BTreeMap;

use cosme_core::{Dataset, ReviewRow};
use serde::Serialize;

/// Ratings at or above this count as positive.
pub const POSITIVE_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Rows in the dataset.
    pub count: usize,
    /// Rows with a rating.
    pub rated: usize,
    /// Mean over rated rows; `None` when nothing is rated.
    pub mean_rating: Option<f64>,
    /// Share of rated rows with a rating of at least [`POSITIVE_THRESHOLD`].
    pub positive_rate: Option<f64>,
}

/// Reviewer attribute to group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Age,
    SkinType,
    Gender,
}

impl Segment {
    fn label(self, row: &ReviewRow) -> &str {
        match self {
            Self::Age => &row.age_bracket,
            Self::SkinType => &row.skin_type,
            Self::Gender => &row.gender,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentStat {
    pub label: String,
    /// Rows in the segment, rated or not.
    pub count: usize,
    pub mean_rating: Option<f64>,
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(dataset: &Dataset) -> Summary {
    let ratings: Vec<f64> = dataset.ratings().collect();
    let positive = ratings.iter().filter(|&&r| r >= POSITIVE_THRESHOLD).count();

    Summary {
        count: dataset.len(),
        rated: ratings.len(),
        mean_rating: mean(&ratings),
        positive_rate: (!ratings.is_empty()).then(|| positive as f64 / ratings.len() as f64),
    }
}

/// Count and mean rating per label of `segment`, sorted by label.
///
/// The `"unknown"` bucket is reported like any other label.
#[must_use]
pub fn segment_stats(dataset: &Dataset, segment: Segment) -> Vec<SegmentStat> {
    let mut groups: BTreeMap<&str, (usize, Vec<f64>)> = BTreeMap::new();
    for row in dataset.rows() {
        let (count, ratings) = groups.entry(segment.label(row)).or_default();
        *count += 1;
        ratings.extend(row.rating);
    }

    groups
        .into_iter()
        .map(|(label, (count, ratings))| SegmentStat {
            label: label.to_owned(),
            count,
            mean_rating: mean(&ratings),
        })
        .collect()
}
