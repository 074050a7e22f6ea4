use chrono::{DateTime, Utc};
use thiserror::Error;

use kairos_rfc::error::RfcError;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    RfcError(#[from] RfcError),

    #[error(transparent)]
    CoreError(#[from] kairos_core::error::CoreError),

    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Window ending {end} is too close to the supported date range limit")]
    WindowOutOfRange { end: DateTime<Utc> },

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Window spans {days} days, limit is {max_days}")]
    WindowTooLarge { days: i64, max_days: u32 },

    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(#[source] RfcError),

    #[error("Unknown timezone: {0}")]
    UnknownTimeZone(String),

    #[error("Series lookup failed: {0}")]
    SeriesLookup(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
