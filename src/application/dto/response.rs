//! Response DTOs
//!
//! Data structures for API response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::application::services::{MemberReport, ParticipationReport, UserDto};
use crate::domain::{
    BalanceLabel, BalanceReport, ChatMessage, Feedback, PerformanceLevel, Ratings, Session,
    SessionKind, SessionStatus, UserRole,
};

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn from_dto(dto: UserDto, include_email: bool) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            email: if include_email { Some(dto.email) } else { None },
            role: dto.role,
            avatar_url: dto.avatar_url,
            created_at: dto.created_at,
        }
    }
}

/// Seat in a session
#[derive(Debug, Serialize)]
pub struct SessionMemberResponse {
    pub user_id: Uuid,
    pub role: UserRole,
    pub joined_at: DateTime<Utc>,
}

/// Session response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub topic: Option<String>,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub duration_minutes: u32,
    pub start_time: DateTime<Utc>,
    pub status: SessionStatus,
    pub moderator_id: Uuid,
    pub max_participants: u32,
    pub participant_count: usize,
    pub members: Vec<SessionMemberResponse>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        let participant_count = session.participant_count();
        Self {
            id: session.id,
            title: session.title,
            description: session.description,
            topic: session.topic,
            kind: session.kind,
            duration_minutes: session.duration_minutes,
            start_time: session.start_time,
            status: session.status,
            moderator_id: session.moderator_id,
            max_participants: session.max_participants,
            participant_count,
            members: session
                .members
                .into_iter()
                .map(|m| SessionMemberResponse {
                    user_id: m.user_id,
                    role: m.role,
                    joined_at: m.joined_at,
                })
                .collect(),
            started_at: session.started_at,
            ended_at: session.ended_at,
            created_at: session.created_at,
        }
    }
}

/// Chat message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub sender_role: UserRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessage> for MessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id,
            session_id: message.session_id,
            sender_id: message.sender_id,
            sender_name: message.sender_name,
            sender_role: message.sender_role,
            content: message.content,
            created_at: message.created_at,
        }
    }
}

/// Balance summary as displayed
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Score rounded to one decimal
    pub score: Option<f64>,
    /// Score rounded to a whole percent
    pub display_score: Option<u8>,
    pub label: BalanceLabel,
    pub advisory: Option<&'static str>,
    pub sample_size: usize,
    pub mean_seconds: Option<f64>,
    pub std_dev_seconds: Option<f64>,
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl From<BalanceReport> for BalanceResponse {
    fn from(report: BalanceReport) -> Self {
        Self {
            score: report.score.map(one_decimal),
            display_score: report.rounded_score(),
            label: report.label,
            advisory: report.advisory,
            sample_size: report.sample_size,
            mean_seconds: report.mean_seconds.map(one_decimal),
            std_dev_seconds: report.std_dev_seconds.map(one_decimal),
        }
    }
}

/// Participation table and balance
#[derive(Debug, Serialize)]
pub struct ParticipationResponse {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub duration_minutes: u32,
    pub members: Vec<MemberReport>,
    pub balance: BalanceResponse,
}

impl From<ParticipationReport> for ParticipationResponse {
    fn from(report: ParticipationReport) -> Self {
        Self {
            session_id: report.session_id,
            status: report.status,
            duration_minutes: report.duration_minutes,
            members: report.members,
            balance: BalanceResponse::from(report.balance),
        }
    }
}

/// Feedback response
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub evaluator_id: Uuid,
    pub participant_id: Uuid,
    pub ratings: Ratings,
    pub overall: f64,
    pub level: PerformanceLevel,
    pub comments: String,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Feedback> for FeedbackResponse {
    fn from(feedback: Feedback) -> Self {
        Self {
            overall: feedback.overall(),
            level: feedback.level(),
            id: feedback.id,
            session_id: feedback.session_id,
            evaluator_id: feedback.evaluator_id,
            participant_id: feedback.participant_id,
            ratings: feedback.ratings,
            comments: feedback.comments,
            strengths: feedback.strengths,
            improvements: feedback.improvements,
            created_at: feedback.created_at,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_response_rounding() {
        let report = BalanceReport {
            score: Some(47.0345),
            label: BalanceLabel::Poor,
            advisory: BalanceLabel::Poor.advisory(),
            sample_size: 4,
            mean_seconds: Some(115.0),
            std_dev_seconds: Some(60.9303),
        };
        let response = BalanceResponse::from(report);
        assert_eq!(response.score, Some(47.0));
        assert_eq!(response.display_score, Some(47));
        assert_eq!(response.std_dev_seconds, Some(60.9));
    }

    #[test]
    fn test_no_data_serializes_sentinel() {
        let json = serde_json::to_value(BalanceResponse::from(BalanceReport::no_data(0))).unwrap();
        assert_eq!(json["label"], "no_data");
        assert_eq!(json["advisory"], "No data available");
        assert!(json["score"].is_null());
    }
}
