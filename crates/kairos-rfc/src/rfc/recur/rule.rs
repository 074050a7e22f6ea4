//! Validated weekly recurrence rule (RFC 5545 §3.3.10 subset).

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use rrule::{Frequency, NWeekday, RRule, Unvalidated};

use super::WeekdaySet;
use crate::error::{RfcError, RfcResult};
use crate::rfc::timezone::{LocalDateTime, Zone};

/// A weekly rule firing on a set of weekdays at one hour and minute.
///
/// Hour, minute and weekdays are UTC values. Rules built from a local time
/// go through [`RecurrenceRule::from_local`], which does the conversion once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecurrenceRule {
    weekdays: WeekdaySet,
    hour: u8,
    minute: u8,
}

impl RecurrenceRule {
    /// ## Summary
    /// Creates a rule from UTC weekdays, hour and minute.
    ///
    /// ## Errors
    /// Returns `RfcError::ValidationError` if the weekday set is empty, the
    /// hour is above 23 or the minute is above 59.
    pub fn new(weekdays: WeekdaySet, hour: u8, minute: u8) -> RfcResult<Self> {
        if weekdays.is_empty() {
            return Err(RfcError::ValidationError(
                "BYDAY must name at least one weekday".to_string(),
            ));
        }
        if hour > 23 {
            return Err(RfcError::ValidationError(format!(
                "BYHOUR {hour} out of range 0-23"
            )));
        }
        if minute > 59 {
            return Err(RfcError::ValidationError(format!(
                "BYMINUTE {minute} out of range 0-59"
            )));
        }
        Ok(Self {
            weekdays,
            hour,
            minute,
        })
    }

    /// ## Summary
    /// Parses RRULE text such as `FREQ=WEEKLY;BYDAY=MO,FR;BYHOUR=9;BYMINUTE=30`.
    ///
    /// An `RRULE:` prefix is accepted. Grammar is checked by the `rrule`
    /// crate; the result must then be a plain weekly rule with a single
    /// hour and minute.
    ///
    /// ## Errors
    /// Returns `RfcError::ParseError` for malformed text,
    /// `RfcError::UnsupportedRule` for rule parts outside the weekly subset,
    /// and `RfcError::ValidationError` for missing or out-of-range values.
    pub fn parse(text: &str) -> RfcResult<Self> {
        let trimmed = text.trim();
        let body = trimmed.strip_prefix("RRULE:").unwrap_or(trimmed);

        let rrule = body
            .parse::<RRule<Unvalidated>>()
            .map_err(|err| RfcError::ParseError(err.to_string()))?;

        if !matches!(rrule.get_freq(), Frequency::Weekly) {
            return Err(RfcError::UnsupportedRule(format!(
                "FREQ={} (only WEEKLY is supported)",
                rrule.get_freq()
            )));
        }
        if rrule.get_interval() != 1 {
            return Err(RfcError::UnsupportedRule(format!(
                "INTERVAL={}",
                rrule.get_interval()
            )));
        }
        if rrule.get_count().is_some() || rrule.get_until().is_some() {
            return Err(RfcError::UnsupportedRule(
                "COUNT and UNTIL are not supported".to_string(),
            ));
        }

        let weekdays = rrule
            .get_by_weekday()
            .iter()
            .map(|day| match day {
                NWeekday::Every(weekday) => Ok(*weekday),
                NWeekday::Nth(n, weekday) => Err(RfcError::UnsupportedRule(format!(
                    "ordinal weekday {n}{weekday}"
                ))),
            })
            .collect::<RfcResult<WeekdaySet>>()?;

        let hour = single_value(rrule.get_by_hour(), "BYHOUR")?;
        let minute = single_value(rrule.get_by_minute(), "BYMINUTE")?;

        Self::new(weekdays, hour, minute)
    }

    /// ## Summary
    /// Builds a rule from a local wall-clock time in `zone`.
    ///
    /// The time on `reference_date` is converted to UTC once. If that moves
    /// it onto another UTC date, the weekdays move with it: Monday 00:05 in
    /// Berlin becomes Sunday 23:05 UTC.
    ///
    /// ## Errors
    /// Returns `RfcError::ValidationError` if the weekday set is empty.
    pub fn from_local(
        weekdays: WeekdaySet,
        local_time: NaiveTime,
        zone: Zone,
        reference_date: NaiveDate,
    ) -> RfcResult<Self> {
        let instant = zone.resolve_local(LocalDateTime::from_parts(reference_date, local_time));
        let day_offset = (instant.date_naive() - reference_date).num_days();

        tracing::debug!(
            zone = %zone,
            %local_time,
            utc = %instant,
            day_offset,
            "Converted local rule time to UTC"
        );

        Self::new(
            weekdays.shifted(day_offset),
            clock_field(instant.hour()),
            clock_field(instant.minute()),
        )
    }

    #[must_use]
    pub const fn weekdays(&self) -> WeekdaySet {
        self.weekdays
    }

    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }
}

fn single_value(values: &[u8], part: &str) -> RfcResult<u8> {
    match values {
        [value] => Ok(*value),
        [] => Err(RfcError::ValidationError(format!("{part} is required"))),
        _ => Err(RfcError::UnsupportedRule(format!(
            "{part} must have exactly one value"
        ))),
    }
}

/// Hours and minutes from chrono always fit in a byte.
fn clock_field(value: u32) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

impl FromStr for RecurrenceRule {
    type Err = RfcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FREQ=WEEKLY;BYDAY={};BYHOUR={};BYMINUTE={}",
            self.weekdays, self.hour, self.minute
        )
    }
}
