//! Review-text polarity and its distribution.

use std::sync::LazyLock;

use cosme_core::Dataset;
use serde::Serialize;

/// Number of equal-width bins over `[-1.0, 1.0]`.
pub const HISTOGRAM_BINS: usize = 20;

/// Scores a text's polarity in `[-1.0, 1.0]`.
pub trait SentimentScorer {
    fn score(&self, text: &str) -> f32;
}

/// Word weights for cosmetics reviews.
///
/// Keys are lowercase. Values in `(0.0, 1.0]` are positive, in `[-1.0, 0.0)`
/// are negative. The final score is clamped to `[-1.0, 1.0]`.
const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("良い", 0.3),
    ("よい", 0.3),
    ("いい", 0.2),
    ("好き", 0.4),
    ("大好き", 0.5),
    ("最高", 0.5),
    ("満足", 0.4),
    ("リピート", 0.4),
    ("しっとり", 0.3),
    ("潤い", 0.3),
    ("うるおい", 0.3),
    ("さっぱり", 0.2),
    ("なめらか", 0.3),
    ("おすすめ", 0.4),
    ("お気に入り", 0.4),
    ("優秀", 0.4),
    ("使いやすい", 0.3),
    ("good", 0.3),
    ("great", 0.4),
    ("love", 0.5),
    // Negative signals
    ("良くない", -0.4),
    ("よくない", -0.4),
    ("好きじゃない", -0.4),
    ("合わない", -0.5),
    ("合わなかった", -0.5),
    ("残念", -0.5),
    ("微妙", -0.3),
    ("肌荒れ", -0.6),
    ("かぶれ", -0.6),
    ("ヒリヒリ", -0.5),
    ("かゆ", -0.4),
    ("乾燥する", -0.4),
    ("べたつく", -0.3),
    ("ベタベタ", -0.3),
    ("苦手", -0.4),
    ("リピートなし", -0.5),
    ("bad", -0.4),
    ("worst", -0.6),
];

/// Lexicon entries ordered longest first, so `"好きじゃない"` wins over
/// `"好き"` at the same position.
static BY_LENGTH: LazyLock<Vec<(&'static str, f32)>> = LazyLock::new(|| {
    let mut entries = LEXICON.to_vec();
    entries.sort_by_key(|(word, _)| std::cmp::Reverse(word.len()));
    entries
});

/// Score a text string using the lexicon.
///
/// Scans the lowercased text left to right, taking the longest lexicon entry
/// at each position and summing weights. Clamped to `[-1.0, 1.0]`; `0.0` for
/// empty or unknown text. Works without word boundaries, so Japanese text
/// needs no tokenizer.
#[must_use]
pub fn lexicon_score(text: &str) -> f32 {
    let lower = text.to_lowercase();
    let mut rest = lower.as_str();
    let mut score = 0.0_f32;

    while let Some(c) = rest.chars().next() {
        match BY_LENGTH.iter().find(|(word, _)| rest.starts_with(word)) {
            Some(&(word, weight)) => {
                score += weight;
                rest = &rest[word.len()..];
            }
            None => rest = &rest[c.len_utf8()..],
        }
    }
    score.clamp(-1.0, 1.0)
}

/// [`SentimentScorer`] backed by [`lexicon_score`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f32 {
        lexicon_score(text)
    }
}

/// One score per row's body text, in row order.
pub fn score_rows<S: SentimentScorer + ?Sized>(dataset: &Dataset, scorer: &S) -> Vec<f32> {
    dataset
        .rows()
        .iter()
        .map(|row| scorer.score(&row.body_text))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub lower: f32,
    pub upper: f32,
    /// Count per bin, lowest bin first.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Width of one bin.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bin_width(&self) -> f32 {
        if self.counts.is_empty() {
            0.0
        } else {
            (self.upper - self.lower) / self.counts.len() as f32
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Bins `scores` into `bins` equal bins over `[-1.0, 1.0]`.
///
/// Out-of-range scores go to the nearest edge bin; `1.0` lands in the last bin.
/// NaN scores are skipped.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn histogram(scores: &[f32], bins: usize) -> Histogram {
    let (lower, upper) = (-1.0_f32, 1.0_f32);
    let mut counts = vec![0usize; bins];
    if bins == 0 {
        return Histogram {
            lower,
            upper,
            counts,
        };
    }

    let span = upper - lower;
    for &score in scores.iter().filter(|s| !s.is_nan()) {
        let index = ((score.clamp(lower, upper) - lower) * bins as f32 / span).floor() as usize;
        counts[index.min(bins - 1)] += 1;
    }

    Histogram {
        lower,
        upper,
        counts,
    }
}
