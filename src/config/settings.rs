//! Application settings and configuration structures.

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::entities::DEFAULT_MAX_PARTICIPANTS;
use crate::domain::services::DEFAULT_MESSAGE_BONUS_SECONDS;
use crate::domain::value_objects::BalanceThresholds;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Participation accounting
    pub participation: ParticipationSettings,

    /// Balance band thresholds
    pub balance: BalanceSettings,

    /// Session countdown polling
    pub timer: TimerSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins
    pub allowed_origins: Vec<String>,
}

/// Participation accounting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ParticipationSettings {
    /// Seconds credited for each chat message
    pub message_bonus_seconds: u32,

    /// Default cap on participant-role members of a new session
    pub max_participants: u32,
}

/// Balance band thresholds, as scores in `[0, 100]`.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceSettings {
    pub excellent_threshold: f64,
    pub fair_threshold: f64,
}

/// Countdown polling configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TimerSettings {
    /// How often live countdowns are checked, in milliseconds
    pub tick_interval_ms: u64,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the balance thresholds or tick interval are out of range.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("cors.allowed_origins", vec!["http://localhost:5173"])?
            .set_default(
                "participation.message_bonus_seconds",
                i64::from(DEFAULT_MESSAGE_BONUS_SECONDS),
            )?
            .set_default(
                "participation.max_participants",
                i64::from(DEFAULT_MAX_PARTICIPANTS),
            )?
            .set_default("balance.excellent_threshold", 80.0)?
            .set_default("balance.fair_threshold", 60.0)?
            .set_default("timer.tick_interval_ms", 1000_i64)?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                settings.validate()?;
                Ok(settings)
            })
    }

    /// Reject values the rest of the application cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.balance.thresholds()?;
        if !(1..=50).contains(&self.participation.max_participants) {
            return Err(ConfigError::Message(format!(
                "participation.max_participants must be between 1 and 50, got {}",
                self.participation.max_participants
            )));
        }
        if self.timer.tick_interval_ms == 0 {
            return Err(ConfigError::Message(
                "timer.tick_interval_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".into(),
                port: 3000,
            },
            cors: CorsSettings {
                allowed_origins: vec!["http://localhost:5173".into()],
            },
            participation: ParticipationSettings {
                message_bonus_seconds: DEFAULT_MESSAGE_BONUS_SECONDS,
                max_participants: DEFAULT_MAX_PARTICIPANTS,
            },
            balance: BalanceSettings {
                excellent_threshold: 80.0,
                fair_threshold: 60.0,
            },
            timer: TimerSettings {
                tick_interval_ms: 1000,
            },
            environment: "development".into(),
        }
    }
}

impl BalanceSettings {
    /// Validated thresholds.
    pub fn thresholds(&self) -> Result<BalanceThresholds, ConfigError> {
        BalanceThresholds::new(self.excellent_threshold, self.fair_threshold)
            .map_err(|e| ConfigError::Message(e.to_string()))
    }
}

impl TimerSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
