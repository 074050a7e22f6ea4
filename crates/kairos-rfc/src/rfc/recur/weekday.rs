//! BYDAY weekday sets (RFC 5545 §3.3.10).

use chrono::Weekday;

use crate::error::{RfcError, RfcResult};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Returns the two-letter iCalendar code for a weekday.
#[must_use]
pub const fn ical_weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// Parses a two-letter iCalendar weekday code (case-insensitive).
#[must_use]
pub fn parse_ical_weekday(code: &str) -> Option<Weekday> {
    WEEK.into_iter()
        .find(|weekday| ical_weekday_code(*weekday).eq_ignore_ascii_case(code.trim()))
}

/// A set of weekdays, iterated Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self(0b111_1111);

    const fn bit(weekday: Weekday) -> u8 {
        1 << weekday.num_days_from_monday()
    }

    #[must_use]
    pub const fn contains(self, weekday: Weekday) -> bool {
        self.0 & Self::bit(weekday) != 0
    }

    pub fn insert(&mut self, weekday: Weekday) {
        self.0 |= Self::bit(weekday);
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        WEEK.into_iter().filter(move |weekday| self.contains(*weekday))
    }

    /// ## Summary
    /// Moves every weekday by `days` (negative moves backwards).
    ///
    /// Used when a local wall-clock time falls on a different UTC date.
    #[must_use]
    pub fn shifted(self, days: i64) -> Self {
        let steps = days.rem_euclid(7);
        self.iter()
            .map(|weekday| (0..steps).fold(weekday, |day, _| day.succ()))
            .collect()
    }

    /// ## Summary
    /// Parses a comma-separated BYDAY list such as `MO,WE,FR`.
    ///
    /// ## Errors
    /// Returns `RfcError::ParseError` for an unknown code, and
    /// `RfcError::ValidationError` if the list is empty.
    pub fn parse_ical(list: &str) -> RfcResult<Self> {
        let set = list
            .split(',')
            .filter(|code| !code.trim().is_empty())
            .map(|code| {
                parse_ical_weekday(code)
                    .ok_or_else(|| RfcError::ParseError(format!("unknown weekday '{code}'")))
            })
            .collect::<RfcResult<Self>>()?;

        if set.is_empty() {
            return Err(RfcError::ValidationError("weekday list is empty".to_string()));
        }
        Ok(set)
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for weekday in iter {
            set.insert(weekday);
        }
        set
    }
}

impl std::fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let codes: Vec<&str> = self.iter().map(ical_weekday_code).collect();
        f.write_str(&codes.join(","))
    }
}
