//! Feedback Repository Implementation
//!
//! In-memory implementation of the FeedbackRepository trait.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{Feedback, FeedbackRepository};
use crate::shared::error::AppError;

/// (session, evaluator, participant)
type FeedbackKey = (Uuid, Uuid, Uuid);

/// In-memory feedback store.
#[derive(Default)]
pub struct InMemoryFeedbackRepository {
    feedback: DashMap<FeedbackKey, Feedback>,
}

impl InMemoryFeedbackRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect(&self, keep: impl Fn(&Feedback) -> bool) -> Vec<Feedback> {
        let mut found: Vec<Feedback> = self
            .feedback
            .iter()
            .filter(|f| keep(f.value()))
            .map(|f| f.value().clone())
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        found
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn create(&self, feedback: &Feedback) -> Result<Feedback, AppError> {
        let key = (
            feedback.session_id,
            feedback.evaluator_id,
            feedback.participant_id,
        );
        match self.feedback.entry(key) {
            Entry::Occupied(_) => Err(AppError::Conflict(
                "Feedback already submitted for this participant".into(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(feedback.clone());
                Ok(feedback.clone())
            }
        }
    }

    async fn list_by_session(&self, session_id: Uuid) -> Result<Vec<Feedback>, AppError> {
        Ok(self.collect(|f| f.session_id == session_id))
    }

    async fn list_by_evaluator(&self, evaluator_id: Uuid) -> Result<Vec<Feedback>, AppError> {
        Ok(self.collect(|f| f.evaluator_id == evaluator_id))
    }

    async fn list_by_participant(&self, participant_id: Uuid) -> Result<Vec<Feedback>, AppError> {
        Ok(self.collect(|f| f.participant_id == participant_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Ratings;
    use chrono::Utc;

    fn feedback(session_id: Uuid, evaluator_id: Uuid, participant_id: Uuid) -> Feedback {
        Feedback {
            id: Uuid::new_v4(),
            session_id,
            evaluator_id,
            participant_id,
            ratings: Ratings {
                communication: 7,
                confidence: 6,
                logic: 8,
                engagement: 9,
            },
            comments: "Clear structure".into(),
            strengths: None,
            improvements: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_one_feedback_per_triple() {
        let repo = InMemoryFeedbackRepository::new();
        let (s, e, p) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        repo.create(&feedback(s, e, p)).await.unwrap();
        let err = repo.create(&feedback(s, e, p)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        repo.create(&feedback(s, e, Uuid::new_v4())).await.unwrap();
        assert_eq!(repo.list_by_session(s).await.unwrap().len(), 2);
        assert_eq!(repo.list_by_evaluator(e).await.unwrap().len(), 2);
        assert_eq!(repo.list_by_participant(p).await.unwrap().len(), 1);
    }
}
