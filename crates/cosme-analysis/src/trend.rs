//! Monthly rating trend from the displayed post dates.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use cosme_core::Dataset;
use serde::Serialize;

use crate::summary::mean;

/// Date layouts the site has displayed. Trailing text (a time of day, a
/// "購入品" badge) after the date is ignored.
const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d", "%Y.%m.%d", "%Y年%m月%d日"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub month: u32,
    /// Rows posted in the month, rated or not.
    pub count: usize,
    pub mean_rating: Option<f64>,
}

impl TrendPoint {
    /// `"YYYY-MM"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Parses the calendar date at the start of a displayed post date.
#[must_use]
pub fn parse_posted_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_and_remainder(raw, fmt).ok())
        .map(|(date, _)| date)
}

/// Count and mean rating per calendar month, oldest first.
///
/// Rows whose date does not parse are left out.
#[must_use]
pub fn rating_trend(dataset: &Dataset) -> Vec<TrendPoint> {
    let mut months: BTreeMap<(i32, u32), (usize, Vec<f64>)> = BTreeMap::new();
    let mut skipped = 0usize;

    for row in dataset.rows() {
        let Some(date) = parse_posted_date(&row.posted_at) else {
            skipped += 1;
            continue;
        };
        let (count, ratings) = months.entry((date.year(), date.month())).or_default();
        *count += 1;
        ratings.extend(row.rating);
    }

    if skipped > 0 {
        tracing::debug!(skipped, "rows without a parseable post date left out of trend");
    }

    months
        .into_iter()
        .map(|((year, month), (count, ratings))| TrendPoint {
            year,
            month,
            count,
            mean_rating: mean(&ratings),
        })
        .collect()
}
