//! Infrastructure Layer
//!
//! Contains implementations for the domain's outward-facing needs:
//! - In-memory repositories backed by `DashMap`
//! - Live participation trackers
//! - Session countdown scheduler
//! - Prometheus metrics

pub mod cache;
pub mod metrics;
pub mod repositories;
pub mod scheduler;
