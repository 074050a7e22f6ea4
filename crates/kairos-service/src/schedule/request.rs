use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A multi-event schedule as submitted by a client.
///
/// `rrule` carries UTC hour, minute and weekdays. `timezone` is the zone
/// reported by the capture agent, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Event length in milliseconds.
    pub duration_ms: i64,
    pub rrule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}
