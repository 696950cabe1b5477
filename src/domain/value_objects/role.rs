//! Platform roles.

use serde::{Deserialize, Serialize};

/// Role a user plays on the platform and inside a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Moderator,
    #[default]
    Participant,
    Evaluator,
}

impl UserRole {
    /// Parse from the wire representation. Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moderator" => Some(Self::Moderator),
            "participant" => Some(Self::Participant),
            "evaluator" => Some(Self::Evaluator),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Moderator => "moderator",
            Self::Participant => "participant",
            Self::Evaluator => "evaluator",
        }
    }

    /// Whether this role counts towards participation balance.
    pub fn is_scored(&self) -> bool {
        matches!(self, Self::Participant)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
