//! Request DTOs
//!
//! Data structures for API request bodies.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::application::services::{CreateSessionDto, RegisterUserDto, SubmitFeedbackDto};
use crate::domain::{Ratings, SessionKind, UserRole};

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 64, message = "Name must be 2-64 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[serde(default)]
    pub role: UserRole,
}

impl From<RegisterRequest> for RegisterUserDto {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role,
        }
    }
}

/// Login request. The role must match the account.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[serde(default)]
    pub role: UserRole,
}

/// Create session request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 200, message = "Topic must be at most 200 characters"))]
    pub topic: Option<String>,

    #[serde(default, rename = "type")]
    pub kind: SessionKind,

    #[validate(range(min = 1, max = 240, message = "Duration must be 1-240 minutes"))]
    pub duration_minutes: u32,

    pub start_time: Option<DateTime<Utc>>,

    #[validate(range(min = 1, max = 50, message = "Max participants must be 1-50"))]
    pub max_participants: Option<u32>,
}

impl From<CreateSessionRequest> for CreateSessionDto {
    fn from(req: CreateSessionRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            topic: req.topic,
            kind: req.kind,
            duration_minutes: req.duration_minutes,
            start_time: req.start_time,
            max_participants: req.max_participants,
        }
    }
}

/// Session list query parameters
#[derive(Debug, Default, Deserialize)]
pub struct SessionQueryParams {
    pub status: Option<String>,
}

/// Send message request
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}

/// Per-category ratings
#[derive(Debug, Deserialize, Validate)]
pub struct RatingsRequest {
    #[validate(range(min = 1, max = 10, message = "Ratings must be 1-10"))]
    pub communication: u8,

    #[validate(range(min = 1, max = 10, message = "Ratings must be 1-10"))]
    pub confidence: u8,

    #[validate(range(min = 1, max = 10, message = "Ratings must be 1-10"))]
    pub logic: u8,

    #[validate(range(min = 1, max = 10, message = "Ratings must be 1-10"))]
    pub engagement: u8,
}

/// Submit feedback request
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitFeedbackRequest {
    pub participant_id: Uuid,

    #[validate(nested)]
    pub ratings: RatingsRequest,

    #[validate(length(min = 1, max = 2000, message = "Comments must be 1-2000 characters"))]
    pub comments: String,

    #[validate(length(max = 1000, message = "Strengths must be at most 1000 characters"))]
    pub strengths: Option<String>,

    #[validate(length(max = 1000, message = "Improvements must be at most 1000 characters"))]
    pub improvements: Option<String>,
}

impl From<SubmitFeedbackRequest> for SubmitFeedbackDto {
    fn from(req: SubmitFeedbackRequest) -> Self {
        Self {
            participant_id: req.participant_id,
            ratings: Ratings {
                communication: req.ratings.communication,
                confidence: req.ratings.confidence,
                logic: req.ratings.logic,
                engagement: req.ratings.engagement,
            },
            comments: req.comments,
            strengths: req.strengths,
            improvements: req.improvements,
        }
    }
}
