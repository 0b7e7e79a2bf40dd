//! Plain-text analysis summary printed after a collection run.

use cosme_analysis::{
    cluster_crosstab, histogram, rating_trend, score_rows, segment_stats, summarize,
    LexiconScorer, Segment, SegmentStat, SentimentBandClusterer, HISTOGRAM_BINS,
};
use cosme_core::Dataset;

const BAR_WIDTH: usize = 40;
const NEUTRAL_BAND: f32 = 0.1;

pub(crate) fn print_report(dataset: &Dataset) {
    let summary = summarize(dataset);
    println!();
    println!("== summary ==");
    println!("reviews:        {}", summary.count);
    println!("mean rating:    {}", fmt_mean(summary.mean_rating));
    println!(
        "positive rate:  {}",
        summary
            .positive_rate
            .map_or_else(|| "-".to_owned(), |r| format!("{:.1}%", r * 100.0))
    );

    print_segments("by age", &segment_stats(dataset, Segment::Age));
    print_segments("by skin type", &segment_stats(dataset, Segment::SkinType));
    print_segments("by gender", &segment_stats(dataset, Segment::Gender));

    let scores = score_rows(dataset, &LexiconScorer);
    let hist = histogram(&scores, HISTOGRAM_BINS);
    let peak = hist.counts.iter().copied().max().unwrap_or(0);
    println!();
    println!("== sentiment ==");
    for (i, count) in hist.counts.iter().enumerate() {
        let from = bin_edge(hist.lower, hist.bin_width(), i);
        println!("{from:+.1} {:<BAR_WIDTH$} {count}", bar(*count, peak));
    }

    let table = cluster_crosstab(dataset, &SentimentBandClusterer::new(LexiconScorer, NEUTRAL_BAND));
    println!();
    println!("== age x sentiment band (negative / neutral / positive) ==");
    for (age, counts) in &table.counts {
        let cells: Vec<String> = counts.iter().map(ToString::to_string).collect();
        println!("{age:<12} {}", cells.join(" / "));
    }

    let trend = rating_trend(dataset);
    if !trend.is_empty() {
        println!();
        println!("== monthly rating ==");
        for point in &trend {
            println!(
                "{}  {:>4} reviews  mean {}",
                point.label(),
                point.count,
                fmt_mean(point.mean_rating)
            );
        }
    }
}

fn print_segments(title: &str, stats: &[SegmentStat]) {
    println!();
    println!("== {title} ==");
    for stat in stats {
        println!(
            "{:<12} {:>4} reviews  mean {}",
            stat.label,
            stat.count,
            fmt_mean(stat.mean_rating)
        );
    }
}

fn fmt_mean(mean: Option<f64>) -> String {
    mean.map_or_else(|| "-".to_owned(), |m| format!("{m:.2}"))
}

#[allow(clippy::cast_precision_loss)]
fn bin_edge(lower: f32, width: f32, index: usize) -> f32 {
    lower + width * index as f32
}

fn bar(count: usize, peak: usize) -> String {
    if peak == 0 {
        return String::new();
    }
    "#".repeat(count * BAR_WIDTH / peak)
}
