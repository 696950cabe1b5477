//! Evaluator feedback entity and repository trait.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// Lowest allowed rating.
pub const MIN_RATING: u8 = 1;
/// Highest allowed rating.
pub const MAX_RATING: u8 = 10;

/// Per-category ratings on a 1-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    pub communication: u8,
    pub confidence: u8,
    pub logic: u8,
    pub engagement: u8,
}

impl Ratings {
    fn all(&self) -> [u8; 4] {
        [self.communication, self.confidence, self.logic, self.engagement]
    }

    pub fn is_valid(&self) -> bool {
        self.all()
            .iter()
            .all(|r| (MIN_RATING..=MAX_RATING).contains(r))
    }

    /// Mean of the four categories, rounded to one decimal.
    pub fn overall(&self) -> f64 {
        let total: u32 = self.all().iter().map(|&r| u32::from(r)).sum();
        one_decimal(f64::from(total) / 4.0)
    }

    pub fn level(&self) -> PerformanceLevel {
        PerformanceLevel::from_score(self.overall())
    }
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Performance band for an overall score on the 1-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    Excellent,
    VeryGood,
    Good,
    Average,
    NeedsImprovement,
}

impl PerformanceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            Self::Excellent
        } else if score >= 7.5 {
            Self::VeryGood
        } else if score >= 6.0 {
            Self::Good
        } else if score >= 5.0 {
            Self::Average
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl std::fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Feedback an evaluator gives a participant for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub session_id: Uuid,
    pub evaluator_id: Uuid,
    pub participant_id: Uuid,
    pub ratings: Ratings,
    pub comments: String,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn overall(&self) -> f64 {
        self.ratings.overall()
    }

    pub fn level(&self) -> PerformanceLevel {
        self.ratings.level()
    }
}

/// Mean rating per category, rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryAverages {
    pub communication: f64,
    pub confidence: f64,
    pub logic: f64,
    pub engagement: f64,
}

/// Everything one participant has been rated on, folded together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackSummary {
    pub feedback_count: usize,
    /// Distinct sessions the feedback came from
    pub session_count: usize,
    pub averages: Option<CategoryAverages>,
    /// Mean of the per-feedback overall scores
    pub overall: Option<f64>,
    pub level: Option<PerformanceLevel>,
}

impl FeedbackSummary {
    pub fn from_feedback(feedback: &[Feedback]) -> Self {
        if feedback.is_empty() {
            return Self {
                feedback_count: 0,
                session_count: 0,
                averages: None,
                overall: None,
                level: None,
            };
        }

        let count = feedback.len() as f64;
        let mean = |pick: fn(&Ratings) -> u8| {
            let total: f64 = feedback.iter().map(|f| f64::from(pick(&f.ratings))).sum();
            one_decimal(total / count)
        };
        let averages = CategoryAverages {
            communication: mean(|r| r.communication),
            confidence: mean(|r| r.confidence),
            logic: mean(|r| r.logic),
            engagement: mean(|r| r.engagement),
        };
        let overall = one_decimal(feedback.iter().map(Feedback::overall).sum::<f64>() / count);
        let sessions: HashSet<Uuid> = feedback.iter().map(|f| f.session_id).collect();

        Self {
            feedback_count: feedback.len(),
            session_count: sessions.len(),
            averages: Some(averages),
            overall: Some(overall),
            level: Some(PerformanceLevel::from_score(overall)),
        }
    }
}

/// Repository trait for feedback.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Store feedback. Fails with `Conflict` on a repeated
    /// (session, evaluator, participant) triple.
    async fn create(&self, feedback: &Feedback) -> Result<Feedback, AppError>;

    async fn list_by_session(&self, session_id: Uuid) -> Result<Vec<Feedback>, AppError>;

    async fn list_by_evaluator(&self, evaluator_id: Uuid) -> Result<Vec<Feedback>, AppError>;

    async fn list_by_participant(&self, participant_id: Uuid) -> Result<Vec<Feedback>, AppError>;
}
