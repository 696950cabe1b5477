//! Participation balance domain service.
//!
//! Scores how evenly speaking time was shared among participant-role members
//! of a session, using the coefficient of variation of their times:
//!
//! ```text
//! score = clamp(100 - (std_dev / mean * 100), 0, 100)
//! ```
//!
//! The population standard deviation is used. Inputs are seconds and must be
//! finite and non-negative; callers validate at the boundary.

use crate::domain::value_objects::{BalanceLabel, BalanceReport, BalanceThresholds};

/// Mean and spread of a set of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dispersion {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
}

/// Domain service for participation statistics.
pub struct ParticipationBalance;

impl ParticipationBalance {
    /// Population mean, variance and standard deviation.
    ///
    /// Returns `None` for an empty slice.
    pub fn dispersion(times: &[f64]) -> Option<Dispersion> {
        if times.is_empty() {
            return None;
        }
        debug_assert!(
            times.iter().all(|t| t.is_finite() && *t >= 0.0),
            "participation times must be finite and non-negative"
        );

        let count = times.len() as f64;
        let mean = times.iter().sum::<f64>() / count;
        let variance = times.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / count;

        Some(Dispersion {
            mean,
            variance,
            std_dev: variance.sqrt(),
        })
    }

    /// Balance score in `[0, 100]`.
    ///
    /// Returns `None` when there is nothing to score: no samples, or nobody
    /// has spoken yet (mean of zero).
    pub fn score(times: &[f64]) -> Option<f64> {
        let d = Self::dispersion(times)?;
        if d.mean <= 0.0 {
            return None;
        }
        let score = 100.0 - (d.std_dev / d.mean * 100.0);
        Some(score.clamp(0.0, 100.0))
    }

    /// Band a score falls in.
    pub fn classify(score: f64, thresholds: &BalanceThresholds) -> BalanceLabel {
        if score >= thresholds.excellent() {
            BalanceLabel::Excellent
        } else if score >= thresholds.fair() {
            BalanceLabel::Fair
        } else {
            BalanceLabel::Poor
        }
    }

    /// Full balance evaluation: score, band, advisory and summary statistics.
    pub fn evaluate(times: &[f64], thresholds: &BalanceThresholds) -> BalanceReport {
        let Some(d) = Self::dispersion(times) else {
            return BalanceReport::no_data(0);
        };
        let Some(score) = Self::score(times) else {
            return BalanceReport::no_data(times.len());
        };

        let label = Self::classify(score, thresholds);
        BalanceReport {
            score: Some(score),
            label,
            advisory: label.advisory(),
            sample_size: times.len(),
            mean_seconds: Some(d.mean),
            std_dev_seconds: Some(d.std_dev),
        }
    }

    /// A member's time as a whole percentage of the session length, for
    /// progress bars. Rounds half away from zero and caps at 100. A zero-length
    /// session yields 0.
    pub fn share_of_session(participation_seconds: u64, duration_minutes: u32) -> u8 {
        let total = u64::from(duration_minutes) * 60;
        if total == 0 {
            return 0;
        }
        let percent = (participation_seconds as f64 / total as f64 * 100.0).round();
        percent.min(100.0) as u8
    }
}
