//! Score distribution over fixed-width bins across the published range

use super::scorer::{ScoredWallet, MAX_CREDIT_SCORE};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramBin {
    /// Inclusive lower edge
    pub lower: u32,
    /// Exclusive upper edge, except for the last bin which includes 1000
    pub upper: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreHistogram {
    pub bin_width: f64,
    pub total: usize,
    pub bins: Vec<HistogramBin>,
}

impl ScoreHistogram {
    /// Bucket credit scores into `bins` equal-width bins over [0, 1000].
    /// `bins` is clamped to at least one.
    pub fn from_scores(scores: &[ScoredWallet], bins: usize) -> Self {
        let bins = bins.max(1);
        let range = MAX_CREDIT_SCORE as f64;
        let bin_width = range / bins as f64;

        let mut out: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: (i as f64 * bin_width).round() as u32,
                upper: ((i + 1) as f64 * bin_width).round() as u32,
                count: 0,
            })
            .collect();

        for scored in scores {
            let idx = ((scored.credit_score as f64 / bin_width).floor() as usize).min(bins - 1);
            out[idx].count += 1;
        }

        Self {
            bin_width,
            total: scores.len(),
            bins: out,
        }
    }

    /// Text bar chart, one line per bin
    pub fn render(&self, width: usize) -> Vec<String> {
        let peak = self.bins.iter().map(|b| b.count).max().unwrap_or(0);
        let label_width = MAX_CREDIT_SCORE.to_string().len();

        self.bins
            .iter()
            .map(|bin| {
                let bar_len = if peak == 0 {
                    0
                } else {
                    (bin.count * width + peak - 1) / peak
                };
                format!(
                    "{:>w$}-{:<w$} | {:<bar$} {}",
                    bin.lower,
                    bin.upper,
                    "#".repeat(bar_len),
                    bin.count,
                    w = label_width,
                    bar = width
                )
            })
            .collect()
    }
}
