//! Repository Implementations
//!
//! In-memory implementations of domain repository traits, backed by
//! `DashMap` so they can be shared across handlers without an outer lock.
//!
//! ## Available Repositories
//!
//! - **InMemoryUserRepository** - User accounts, unique by email
//! - **InMemorySessionRepository** - Discussion sessions
//! - **InMemoryMessageRepository** - Chat history per session
//! - **InMemoryFeedbackRepository** - Evaluator feedback
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use speakspace::infrastructure::repositories::{
//!     InMemorySessionRepository, InMemoryUserRepository,
//! };
//!
//! let users = Arc::new(InMemoryUserRepository::new());
//! let sessions = Arc::new(InMemorySessionRepository::new());
//! ```

pub mod feedback_repository;
pub mod message_repository;
pub mod session_repository;
pub mod user_repository;

pub use feedback_repository::InMemoryFeedbackRepository;
pub use message_repository::InMemoryMessageRepository;
pub use session_repository::InMemorySessionRepository;
pub use user_repository::InMemoryUserRepository;
