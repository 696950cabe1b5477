//! # Domain Layer
//!
//! The domain layer contains the core logic of SpeakSpace. It is independent
//! of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Users, sessions, chat messages, feedback
//! - **value_objects**: Roles and balance types
//! - **services**: Participation balance, activity tracking, countdowns
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - Services are pure and take time as an argument

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
