//! Descriptive analytics and export for an assembled review dataset.
//!
//! Everything here is a pure function of a [`cosme_core::Dataset`]: rating
//! aggregates by segment, sentiment distribution, cluster cross-tabulation,
//! the monthly rating trend, and CSV/JSON export.

pub mod cluster;
pub mod error;
pub mod export;
pub mod sentiment;
pub mod summary;
pub mod trend;

pub use cluster::{cluster_crosstab, ClusterCrosstab, SentimentBandClusterer, TextClusterer};
pub use error::ExportError;
pub use export::{export_to_path, write_csv, write_json, ExportFormat, CSV_HEADERS};
pub use sentiment::{
    histogram, lexicon_score, score_rows, Histogram, LexiconScorer, SentimentScorer,
    HISTOGRAM_BINS,
};
pub use summary::{segment_stats, summarize, Segment, SegmentStat, Summary, POSITIVE_THRESHOLD};
pub use trend::{parse_posted_date, rating_trend, TrendPoint};
