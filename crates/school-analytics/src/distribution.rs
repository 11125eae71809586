//! Grade distribution over fixed bands.

use serde::{Deserialize, Serialize};

use crate::cohort::Cohort;
use crate::stats::round2;

/// Band labels with their exclusive upper bounds; the last band closes at 100.
const BANDS: [(&str, f64); 5] = [
    ("<60", 60.0),
    ("60-69", 70.0),
    ("70-79", 80.0),
    ("80-89", 90.0),
    ("90-100", f64::INFINITY),
];

/// Count of scores falling in one band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBucket {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Index of the band a score percentage falls in.
fn band_of(score_pct: f64) -> usize {
    BANDS
        .iter()
        .position(|(_, upper)| score_pct < *upper)
        .unwrap_or(BANDS.len() - 1)
}

/// Bucket every present score; bands are always emitted, empty or not.
#[must_use]
pub fn grade_distribution(cohort: &Cohort) -> Vec<GradeBucket> {
    let mut counts = [0usize; BANDS.len()];
    let mut total = 0usize;
    for score in cohort.submissions().iter().filter_map(|s| s.score_pct) {
        counts[band_of(score)] += 1;
        total += 1;
    }

    let denominator = total.max(1) as f64;
    BANDS
        .iter()
        .zip(counts)
        .map(|((label, _), count)| GradeBucket {
            label: (*label).to_string(),
            count,
            percentage: round2(count as f64 * 100.0 / denominator),
        })
        .collect()
}
