//! Zone rules queried per instant, and the wall-clock type they convert to.

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone,
    Timelike, Utc,
};
use chrono_tz::{OffsetComponents, Tz};

use super::ConversionError;

/// A wall-clock date and time with no zone attached.
///
/// Only a [`Zone`] can turn it into an instant, which keeps local and UTC
/// values from being swapped for one another by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDateTime(NaiveDateTime);

impl LocalDateTime {
    #[must_use]
    pub const fn new(naive: NaiveDateTime) -> Self {
        Self(naive)
    }

    #[must_use]
    pub fn from_parts(date: NaiveDate, time: NaiveTime) -> Self {
        Self(date.and_time(time))
    }

    #[must_use]
    pub const fn naive(self) -> NaiveDateTime {
        self.0
    }

    #[must_use]
    pub fn date(self) -> NaiveDate {
        self.0.date()
    }

    #[must_use]
    pub fn time(self) -> NaiveTime {
        self.0.time()
    }

    #[must_use]
    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    #[must_use]
    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    /// Keeps the time of day, replacing the calendar date.
    #[must_use]
    pub fn with_date(self, date: NaiveDate) -> Self {
        Self(date.and_time(self.0.time()))
    }
}

impl std::fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }
}

/// Timezone rules for one IANA zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Zone(Tz);

impl Zone {
    pub const UTC: Self = Self(Tz::UTC);

    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self(tz)
    }

    #[must_use]
    pub const fn tz(self) -> Tz {
        self.0
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.0.name()
    }

    /// Total UTC offset in effect at `instant`.
    #[must_use]
    pub fn offset_at(self, instant: DateTime<Utc>) -> chrono::FixedOffset {
        self.0.offset_from_utc_datetime(&instant.naive_utc()).fix()
    }

    /// Daylight-saving shift in effect at `instant`, zero outside DST.
    ///
    /// Read from the zone's rules for that instant; not every zone saves a
    /// full hour.
    #[must_use]
    pub fn dst_savings_at(self, instant: DateTime<Utc>) -> TimeDelta {
        self.0
            .offset_from_utc_datetime(&instant.naive_utc())
            .dst_offset()
    }

    #[must_use]
    pub fn is_dst_at(self, instant: DateTime<Utc>) -> bool {
        !self.dst_savings_at(instant).is_zero()
    }

    #[must_use]
    pub fn localize(self, instant: DateTime<Utc>) -> LocalDateTime {
        LocalDateTime(instant.with_timezone(&self.0).naive_local())
    }

    /// ## Summary
    /// Converts a wall-clock value to an instant, never failing.
    ///
    /// A time skipped by a forward transition is read with the offset in
    /// effect before the gap, so it lands after the transition by the size of
    /// the gap. A time repeated by a backward transition resolves to its
    /// later, standard-time instant.
    #[must_use]
    pub fn resolve_local(self, local: LocalDateTime) -> DateTime<Utc> {
        match self.0.from_local_datetime(&local.0) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(_earlier, later) => later.with_timezone(&Utc),
            LocalResult::None => {
                let before_gap = self
                    .0
                    .offset_from_utc_datetime(&(local.0 - TimeDelta::days(1)))
                    .fix();
                let offset = TimeDelta::seconds(i64::from(before_gap.local_minus_utc()));
                (local.0 - offset).and_utc()
            }
        }
    }

    /// ## Summary
    /// Converts a wall-clock value to an instant, rejecting times inside a DST gap.
    ///
    /// Repeated times resolve to the first occurrence.
    ///
    /// ## Errors
    /// Returns `ConversionError::NonExistentTime` if `local` falls in a gap.
    pub fn resolve_local_strict(
        self,
        local: LocalDateTime,
    ) -> Result<DateTime<Utc>, ConversionError> {
        match self.0.from_local_datetime(&local.0) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
            LocalResult::None => Err(ConversionError::NonExistentTime(format!(
                "{local} in timezone {}",
                self.name()
            ))),
        }
    }
}

impl From<Tz> for Zone {
    fn from(tz: Tz) -> Self {
        Self(tz)
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> LocalDateTime {
        LocalDateTime::new(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, 0)
                .unwrap(),
        )
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_dst_state_for_berlin() {
        let berlin = Zone::new(Tz::Europe__Berlin);

        assert!(!berlin.is_dst_at(utc(2016, 3, 27, 0, 59)));
        assert!(berlin.is_dst_at(utc(2016, 3, 27, 1, 0)));
        assert_eq!(berlin.dst_savings_at(utc(2016, 7, 1, 12, 0)), TimeDelta::hours(1));
        assert_eq!(berlin.offset_at(utc(2016, 7, 1, 12, 0)).local_minus_utc(), 7200);
    }

    #[test]
    fn test_savings_read_from_zone() {
        let lord_howe = Zone::new(Tz::Australia__Lord_Howe);

        assert_eq!(
            lord_howe.dst_savings_at(utc(2017, 1, 15, 0, 0)),
            TimeDelta::minutes(30)
        );
        assert!(!lord_howe.is_dst_at(utc(2017, 7, 15, 0, 0)));
    }

    #[test]
    fn test_zone_without_dst() {
        let tokyo = Zone::new(Tz::Asia__Tokyo);

        assert!(!tokyo.is_dst_at(utc(2016, 1, 1, 0, 0)));
        assert!(!tokyo.is_dst_at(utc(2016, 7, 1, 0, 0)));
    }

    #[test]
    fn test_localize_and_back() {
        let tokyo = Zone::new(Tz::Asia__Tokyo);
        let instant = utc(2016, 3, 25, 13, 0);

        let wall = tokyo.localize(instant);
        assert_eq!(wall, local(2016, 3, 25, 22, 0));
        assert_eq!(tokyo.resolve_local(wall), instant);
    }

    #[test]
    fn test_resolve_local_in_gap_moves_forward() {
        let berlin = Zone::new(Tz::Europe__Berlin);

        // 02:30 does not exist on 2016-03-27; read with CET it is 01:30 UTC, i.e. 03:30 CEST.
        let resolved = berlin.resolve_local(local(2016, 3, 27, 2, 30));
        assert_eq!(resolved, utc(2016, 3, 27, 1, 30));
        assert_eq!(berlin.localize(resolved), local(2016, 3, 27, 3, 30));
    }

    #[test]
    fn test_resolve_local_in_fold_prefers_standard_time() {
        let berlin = Zone::new(Tz::Europe__Berlin);

        let resolved = berlin.resolve_local(local(2016, 10, 30, 2, 30));
        assert_eq!(resolved, utc(2016, 10, 30, 1, 30));
    }

    #[test]
    fn test_resolve_local_strict() {
        let berlin = Zone::new(Tz::Europe__Berlin);

        assert!(matches!(
            berlin.resolve_local_strict(local(2016, 3, 27, 2, 30)),
            Err(ConversionError::NonExistentTime(_))
        ));
        assert_eq!(
            berlin
                .resolve_local_strict(local(2016, 10, 30, 2, 30))
                .unwrap(),
            utc(2016, 10, 30, 0, 30)
        );
    }
}
