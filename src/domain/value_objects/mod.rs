//! # Value Objects
//!
//! Immutable value types used across the domain layer.

mod balance;
mod role;

pub use balance::{
    BalanceLabel, BalanceReport, BalanceThresholds, ThresholdError, NO_DATA_MESSAGE,
};
pub use role::UserRole;
