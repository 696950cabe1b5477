//! # SpeakSpace Library
//!
//! Participation tracking for group discussion and interview practice:
//! - RESTful HTTP API for users, sessions, chat and feedback
//! - Live participation tracking driven by explicit events
//! - Participation balance scoring (coefficient of variation)
//! - Session countdowns with pause and resume
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core entities, balance scoring, tracker and countdown
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: In-memory stores, scheduler and metrics
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! speakspace/
//! +-- config/         Configuration management
//! +-- domain/         Domain entities, value objects, and services
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Repositories, trackers, scheduler, metrics
//! +-- presentation/   HTTP routes, handlers and middleware
//! +-- shared/         Common utilities (errors, clock, validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
