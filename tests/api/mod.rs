//! REST API endpoint tests

mod auth_tests;
mod feedback_tests;
mod health_tests;
mod participation_tests;
mod session_tests;
