//! Participation balance value types.

use serde::{Deserialize, Serialize};

/// Message reported when there is nothing to score.
pub const NO_DATA_MESSAGE: &str = "No data available";

/// Qualitative band for a balance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceLabel {
    Excellent,
    Fair,
    Poor,
    NoData,
}

impl BalanceLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::NoData => "No data",
        }
    }

    /// Advisory shown to the moderator, if any.
    pub fn advisory(&self) -> Option<&'static str> {
        match self {
            Self::Excellent => None,
            Self::Fair => Some("Participation could be more balanced"),
            Self::Poor => Some("Some participants are dominating the conversation"),
            Self::NoData => Some(NO_DATA_MESSAGE),
        }
    }
}

impl std::fmt::Display for BalanceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Invalid threshold configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("balance thresholds must satisfy 0 <= fair ({fair}) < excellent ({excellent}) <= 100")]
pub struct ThresholdError {
    pub fair: f64,
    pub excellent: f64,
}

/// Lower bounds of the Excellent and Fair bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceThresholds {
    excellent: f64,
    fair: f64,
}

impl BalanceThresholds {
    pub fn new(excellent: f64, fair: f64) -> Result<Self, ThresholdError> {
        let valid = fair.is_finite()
            && excellent.is_finite()
            && 0.0 <= fair
            && fair < excellent
            && excellent <= 100.0;
        if !valid {
            return Err(ThresholdError { fair, excellent });
        }
        Ok(Self { excellent, fair })
    }

    pub fn excellent(&self) -> f64 {
        self.excellent
    }

    pub fn fair(&self) -> f64 {
        self.fair
    }
}

impl Default for BalanceThresholds {
    fn default() -> Self {
        Self {
            excellent: 80.0,
            fair: 60.0,
        }
    }
}

/// Outcome of a balance evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReport {
    /// Score in `[0, 100]`; `None` when there is no data.
    pub score: Option<f64>,
    pub label: BalanceLabel,
    pub advisory: Option<&'static str>,
    /// Number of participant-role samples that went into the score.
    pub sample_size: usize,
    pub mean_seconds: Option<f64>,
    pub std_dev_seconds: Option<f64>,
}

impl BalanceReport {
    pub fn no_data(sample_size: usize) -> Self {
        Self {
            score: None,
            label: BalanceLabel::NoData,
            advisory: BalanceLabel::NoData.advisory(),
            sample_size,
            mean_seconds: None,
            std_dev_seconds: None,
        }
    }

    /// Score rounded to a whole percent, as displayed.
    pub fn rounded_score(&self) -> Option<u8> {
        self.score.map(|s| s.round() as u8)
    }

    pub fn has_data(&self) -> bool {
        self.score.is_some()
    }
}
