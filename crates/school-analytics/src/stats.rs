//! Descriptive statistics shared by every report section.

use statrs::statistics::Statistics;

/// Minimum score percentage that counts as a pass.
pub const PASS_MARK: f64 = 50.0;

/// `part / whole` as a percentage in `[0, 100]`; zero when `whole` is zero.
#[must_use]
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 * 100.0 / whole as f64).clamp(0.0, 100.0)
}

/// Round to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Collects present score percentages for one group.
#[derive(Debug, Clone, Default)]
pub struct ScoreAccumulator {
    scores: Vec<f64>,
}

impl ScoreAccumulator {
    pub fn push(&mut self, score_pct: Option<f64>) {
        if let Some(score) = score_pct {
            self.scores.push(score);
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Unrounded mean, `None` when nothing was scored.
    pub fn mean(&self) -> Option<f64> {
        if self.scores.is_empty() {
            None
        } else {
            Some(self.scores.iter().mean())
        }
    }

    /// Rounded mean, zero when nothing was scored.
    pub fn average(&self) -> f64 {
        round2(self.mean().unwrap_or(0.0))
    }

    /// Rounded share of scores at or above the pass mark.
    pub fn pass_rate(&self) -> f64 {
        let passed = self.scores.iter().filter(|s| **s >= PASS_MARK).count();
        round2(percentage(passed, self.scores.len()))
    }

    /// Rounded population standard deviation, zero when undefined.
    pub fn std_dev(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let sd = self.scores.iter().population_std_dev();
        if sd.is_finite() { round2(sd) } else { 0.0 }
    }
}

impl FromIterator<Option<f64>> for ScoreAccumulator {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        let mut acc = Self::default();
        for score in iter {
            acc.push(score);
        }
        acc
    }
}
