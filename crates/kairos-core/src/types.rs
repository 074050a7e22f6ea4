use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One concrete occurrence of a schedule as a half-open `[start, end)` interval in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    /// ## Summary
    /// Creates a period, rejecting an end that lies before the start.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` if `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> CoreResult<Self> {
        if end < start {
            return Err(CoreError::InvalidInput(format!(
                "period end {end} is before start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}",
            self.start.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.end.to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_period_rejects_inverted_bounds() {
        let start = Utc.with_ymd_and_hms(2016, 3, 25, 13, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2016, 3, 25, 12, 0, 0).unwrap();

        assert!(matches!(
            Period::new(start, end),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_period_is_half_open() {
        let start = Utc.with_ymd_and_hms(2016, 3, 25, 13, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2016, 3, 25, 13, 5, 0).unwrap();
        let period = Period::new(start, end).unwrap();

        assert!(period.contains(start));
        assert!(!period.contains(end));
        assert_eq!(period.duration(), TimeDelta::minutes(5));
    }

    #[test]
    fn test_period_display_and_json() {
        let start = Utc.with_ymd_and_hms(2016, 3, 25, 13, 0, 0).unwrap();
        let period = Period::new(start, start + TimeDelta::milliseconds(1500)).unwrap();

        assert_eq!(
            period.to_string(),
            "2016-03-25T13:00:00.000Z/2016-03-25T13:00:01.500Z"
        );

        let json = serde_json::to_string(&period).unwrap();
        let decoded: Period = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, period);
    }
}
