//! Text clustering seam and the age × cluster cross-tabulation.

use std::collections::BTreeMap;

use cosme_core::Dataset;
use serde::Serialize;

use crate::sentiment::SentimentScorer;

/// Assigns each text a cluster id in `0..cluster_count()`.
pub trait TextClusterer {
    fn cluster_count(&self) -> usize;

    /// One label per input text, in input order.
    fn cluster(&self, texts: &[&str]) -> Vec<usize>;
}

/// Groups texts into negative (0), neutral (1) and positive (2) polarity bands.
#[derive(Debug, Clone)]
pub struct SentimentBandClusterer<S> {
    scorer: S,
    /// Scores strictly inside `(-threshold, threshold)` are neutral.
    threshold: f32,
}

impl<S: SentimentScorer> SentimentBandClusterer<S> {
    pub fn new(scorer: S, threshold: f32) -> Self {
        Self {
            scorer,
            threshold: threshold.abs(),
        }
    }
}

impl<S: SentimentScorer> TextClusterer for SentimentBandClusterer<S> {
    fn cluster_count(&self) -> usize {
        3
    }

    fn cluster(&self, texts: &[&str]) -> Vec<usize> {
        texts
            .iter()
            .map(|text| {
                let score = self.scorer.score(text);
                if score <= -self.threshold {
                    0
                } else if score >= self.threshold {
                    2
                } else {
                    1
                }
            })
            .collect()
    }
}

/// Row counts per (age bracket, cluster).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterCrosstab {
    pub clusters: usize,
    /// Age bracket → count per cluster id. Sorted by age bracket.
    pub counts: BTreeMap<String, Vec<usize>>,
}

impl ClusterCrosstab {
    #[must_use]
    pub fn get(&self, age_bracket: &str, cluster: usize) -> usize {
        self.counts
            .get(age_bracket)
            .and_then(|row| row.get(cluster))
            .copied()
            .unwrap_or(0)
    }
}

/// Clusters every row's body text with `clusterer` and cross-tabulates the
/// labels against age bracket.
///
/// Labels outside `0..cluster_count()` are dropped with a warning.
pub fn cluster_crosstab<C: TextClusterer + ?Sized>(
    dataset: &Dataset,
    clusterer: &C,
) -> ClusterCrosstab {
    let clusters = clusterer.cluster_count();
    let texts: Vec<&str> = dataset.rows().iter().map(|r| r.body_text.as_str()).collect();
    let labels = clusterer.cluster(&texts);
    if labels.len() != texts.len() {
        tracing::warn!(
            rows = texts.len(),
            labels = labels.len(),
            "clusterer returned a label count that does not match the rows"
        );
    }

    let mut counts: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (row, label) in dataset.rows().iter().zip(labels) {
        if label >= clusters {
            tracing::warn!(label, clusters, "cluster label out of range, skipping row");
            continue;
        }
        counts
            .entry(row.age_bracket.clone())
            .or_insert_with(|| vec![0; clusters])[label] += 1;
    }

    ClusterCrosstab { clusters, counts }
}
