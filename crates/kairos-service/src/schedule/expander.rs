//! Validating front end for [`expand_periods`].

use chrono::{DateTime, TimeDelta, Utc};

use kairos_core::config::SchedulerConfig;
use kairos_core::types::Period;
use kairos_rfc::rfc::recur::RecurrenceRule;
use kairos_rfc::rfc::timezone::{TimeZoneResolver, Zone};

use super::{ScheduleRequest, expand_periods};
use crate::error::{ServiceError, ServiceResult};

/// Room left around a window for local-time alignment and DST shifts.
const RANGE_MARGIN_DAYS: i64 = 2;

/// Checks schedule input before handing it to the pure expansion.
#[derive(Debug, Clone)]
pub struct PeriodExpander {
    default_timezone: String,
    max_window_days: u32,
}

impl PeriodExpander {
    #[must_use]
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            default_timezone: config.default_timezone.clone(),
            max_window_days: config.max_window_days,
        }
    }

    /// ## Summary
    /// Expands a parsed rule over a window after validating the inputs.
    ///
    /// ## Errors
    /// Returns `ServiceError::InvalidWindow` if `window_start` is after
    /// `window_end`, `ServiceError::InvalidDuration` for a negative duration
    /// and `ServiceError::WindowTooLarge` when the window spans more days
    /// than configured.
    pub fn expand(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        duration: TimeDelta,
        rule: &RecurrenceRule,
        zone: Zone,
    ) -> ServiceResult<Vec<Period>> {
        if window_start > window_end {
            return Err(ServiceError::InvalidWindow {
                start: window_start,
                end: window_end,
            });
        }
        if duration < TimeDelta::zero() {
            return Err(ServiceError::InvalidDuration(format!(
                "{} ms is negative",
                duration.num_milliseconds()
            )));
        }

        // The search runs a full duration past the window end.
        let days = match (window_end - window_start).checked_add(&duration) {
            Some(span) => span.num_days(),
            None => i64::MAX,
        };
        if days > i64::from(self.max_window_days) {
            return Err(ServiceError::WindowTooLarge {
                days,
                max_days: self.max_window_days,
            });
        }

        let margin = TimeDelta::days(RANGE_MARGIN_DAYS);
        let in_range = window_start.checked_sub_signed(margin).is_some()
            && duration
                .checked_add(&margin)
                .and_then(|reach| window_end.checked_add_signed(reach))
                .is_some();
        if !in_range {
            return Err(ServiceError::WindowOutOfRange { end: window_end });
        }

        let periods = expand_periods(window_start, window_end, duration, rule, zone);

        tracing::info!(
            %window_start,
            %window_end,
            zone = %zone,
            rule = %rule,
            count = periods.len(),
            "Calculated schedule periods"
        );

        Ok(periods)
    }

    /// ## Summary
    /// Parses, resolves and expands a client schedule request.
    ///
    /// Requests without a timezone use the configured default zone.
    ///
    /// ## Errors
    /// Returns `ServiceError::InvalidRule` if the RRULE does not parse,
    /// `ServiceError::UnknownTimeZone` if the zone cannot be resolved,
    /// `ServiceError::InvalidDuration` if the duration is out of range, and
    /// any error from [`PeriodExpander::expand`].
    pub fn expand_request(
        &self,
        request: &ScheduleRequest,
        resolver: &mut TimeZoneResolver,
    ) -> ServiceResult<Vec<Period>> {
        let rule = RecurrenceRule::parse(&request.rrule).map_err(ServiceError::InvalidRule)?;

        let tzid = match request.timezone.as_deref().map(str::trim) {
            Some(tzid) if !tzid.is_empty() => tzid,
            _ => {
                tracing::debug!(
                    default_timezone = %self.default_timezone,
                    "No agent timezone given, using the default"
                );
                self.default_timezone.as_str()
            }
        };
        let zone = resolver.resolve(tzid).map_err(|err| {
            tracing::warn!(tzid, error = %err, "Unable to resolve schedule timezone");
            ServiceError::UnknownTimeZone(tzid.to_string())
        })?;

        let duration = TimeDelta::try_milliseconds(request.duration_ms).ok_or_else(|| {
            ServiceError::InvalidDuration(format!("{} ms is out of range", request.duration_ms))
        })?;

        self.expand(request.start, request.end, duration, &rule, zone)
    }
}
