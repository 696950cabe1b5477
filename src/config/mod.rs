//! # Configuration Module
//!
//! Server, CORS, participation, balance and timer settings. Sources, lowest
//! precedence first:
//! - Configuration files (config/default.toml, config/{RUN_ENV}.toml)
//! - .env files (via dotenvy) and environment variables prefixed with APP__
//! - SERVER_HOST / SERVER_PORT
//!
//! ## Usage
//!
//! ```rust,ignore
//! use speakspace::config::Settings;
//!
//! let settings = Settings::load()?;
//! let thresholds = settings.balance.thresholds()?;
//! let tick = settings.timer.tick_interval();
//! ```

mod settings;

pub use settings::*;
