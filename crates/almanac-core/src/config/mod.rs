use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{DEFAULT_LOG_LEVEL, MAX_SUPPORTED_YEAR};
use crate::error::set_errors_are_fatal;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub errors: ErrorConfig,
    pub recurrence: RecurrenceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorConfig {
    /// Whether reported errors abort instead of being recorded.
    pub fatal: bool,
}

/// What to do with a BY-rule part that is illegal for the rule's frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByRulePolicy {
    /// Treat the rule as malformed.
    #[default]
    Reject,
    /// Log a warning and discard the offending part.
    Drop,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecurrenceConfig {
    pub illegal_by_rule: ByRulePolicy,
    /// Iteration stops once a candidate passes this year.
    pub max_year: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            errors: ErrorConfig { fatal: false },
            recurrence: RecurrenceConfig::default(),
            logging: LoggingConfig {
                level: DEFAULT_LOG_LEVEL.to_string(),
            },
        }
    }
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            illegal_by_rule: ByRulePolicy::Reject,
            max_year: MAX_SUPPORTED_YEAR,
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional
    /// `config.toml` into a `Settings`.
    ///
    /// Environment variables use the `ALMANAC_` prefix and `__` between
    /// nesting levels, e.g. `ALMANAC_RECURRENCE__ILLEGAL_BY_RULE=drop`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("errors.fatal", false)?
            .set_default("recurrence.illegal_by_rule", "reject")?
            .set_default("recurrence.max_year", i64::from(MAX_SUPPORTED_YEAR))?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            // Env file
            .add_source(
                config::Environment::with_prefix("ALMANAC")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(config::Case::Snake)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Pushes the error policy into the process-wide switch.
    pub fn apply(&self) {
        set_errors_are_fatal(self.errors.fatal);
        tracing::debug!(
            fatal = self.errors.fatal,
            illegal_by_rule = ?self.recurrence.illegal_by_rule,
            max_year = self.recurrence.max_year,
            "Settings applied"
        );
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
