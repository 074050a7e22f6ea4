use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_MAX_WINDOW_DAYS, DEFAULT_ORGANIZER_DOMAIN, DEFAULT_PAST_EVENT_MARGIN_MINUTES,
    DEFAULT_PRODUCT_ID, DEFAULT_TIMEZONE,
};


#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub scheduler: SchedulerConfig,
    pub calendar: CalendarConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Zone used when a capture agent does not report one.
    pub default_timezone: String,
    /// Widest schedule window, in days, accepted for expansion.
    pub max_window_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_timezone: DEFAULT_TIMEZONE.to_string(),
            max_window_days: DEFAULT_MAX_WINDOW_DAYS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    pub product_id: String,
    pub organizer_domain: String,
    /// Events that ended longer ago than this are left out of exports.
    pub past_event_margin_minutes: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            organizer_domain: DEFAULT_ORGANIZER_DOMAIN.to_string(),
            past_event_margin_minutes: DEFAULT_PAST_EVENT_MARGIN_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from an optional `kairos.toml` and `KAIROS__*` environment variables.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Self::builder()?
            .add_source(config::File::with_name("kairos").required(false))
            .add_source(
                config::Environment::with_prefix("KAIROS")
                    .prefix_separator("__")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("scheduler.default_timezone", DEFAULT_TIMEZONE)?
            .set_default(
                "scheduler.max_window_days",
                i64::from(DEFAULT_MAX_WINDOW_DAYS),
            )?
            .set_default("calendar.product_id", DEFAULT_PRODUCT_ID)?
            .set_default("calendar.organizer_domain", DEFAULT_ORGANIZER_DOMAIN)?
            .set_default(
                "calendar.past_event_margin_minutes",
                i64::from(DEFAULT_PAST_EVENT_MARGIN_MINUTES),
            )?
            .set_default("logging.level", "info")?)
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
