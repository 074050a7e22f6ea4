//! Period expansion for weekly schedules (pure, no I/O).
//!
//! Rules carry UTC hour, minute and weekdays, so candidates are generated on
//! the UTC calendar and then moved by the zone's daylight-saving shift until
//! each one lands on the same local wall-clock time as the window start.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Timelike, Utc};

use kairos_core::constants::MILLIS_PER_DAY;
use kairos_core::types::Period;
use kairos_rfc::rfc::recur::RecurrenceRule;
use kairos_rfc::rfc::timezone::Zone;

/// ## Summary
/// Expands `rule` into concrete periods between `window_start` and `window_end`.
///
/// Occurrences keep the local wall-clock time of `window_start` in `zone`
/// across DST transitions. The search runs to the local time of
/// `window_start` on the local date of `window_end`, plus `duration`.
/// Each period lasts `duration` reduced modulo one day.
///
/// Output is ascending with strictly increasing starts. An inverted window
/// yields no periods; other input validation is the caller's job.
#[must_use]
pub fn expand_periods(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    duration: TimeDelta,
    rule: &RecurrenceRule,
    zone: Zone,
) -> Vec<Period> {
    if window_start > window_end {
        tracing::debug!(%window_start, %window_end, "Inverted window, nothing to expand");
        return Vec::new();
    }

    let anchor = window_start;
    let search_end = search_end(anchor, window_end, duration, zone);
    let length = duration_within_day(duration);

    let anchor_dst = zone.is_dst_at(anchor);
    let anchor_savings = zone.dst_savings_at(anchor);

    tracing::debug!(
        %anchor,
        %search_end,
        zone = %zone,
        anchor_dst,
        rule = %rule,
        "Expanding schedule"
    );

    let mut periods: Vec<Period> = Vec::new();
    for candidate in candidates(anchor, search_end, rule) {
        let Some(start) = correct_for_dst(candidate, zone, anchor_dst, anchor_savings) else {
            tracing::warn!(%candidate, "Occurrence shifted out of the supported date range");
            continue;
        };
        push_advancing(&mut periods, start, length);
    }

    tracing::debug!(count = periods.len(), "Expanded schedule");
    periods
}

/// Appends a period at `start` unless it fails to advance past the last one,
/// or its end is not representable.
fn push_advancing(periods: &mut Vec<Period>, start: DateTime<Utc>, length: TimeDelta) {
    if periods.last().is_some_and(|previous| start <= previous.start) {
        tracing::debug!(%start, "Dropping occurrence that does not advance");
        return;
    }
    let Some(end) = start.checked_add_signed(length) else {
        tracing::warn!(%start, "Occurrence ends past the supported date range");
        return;
    };
    periods.push(Period { start, end });
}

/// Local time of `anchor` on the local date of `window_end`, plus the full duration.
fn search_end(
    anchor: DateTime<Utc>,
    window_end: DateTime<Utc>,
    duration: TimeDelta,
    zone: Zone,
) -> DateTime<Utc> {
    let end_date = zone.localize(window_end).date();
    let aligned = zone.resolve_local(zone.localize(anchor).with_date(end_date));
    aligned
        .checked_add_signed(duration)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Period length: whole days are dropped, so a 25 hour duration yields 1 hour periods.
fn duration_within_day(duration: TimeDelta) -> TimeDelta {
    TimeDelta::milliseconds(duration.num_milliseconds() % MILLIS_PER_DAY)
}

/// Rule matches on the UTC calendar from the anchor's date to `search_end`'s
/// date, at most one per day, bounded by `[anchor, search_end]`.
fn candidates(
    anchor: DateTime<Utc>,
    search_end: DateTime<Utc>,
    rule: &RecurrenceRule,
) -> impl Iterator<Item = DateTime<Utc>> {
    let time = NaiveTime::from_hms_nano_opt(
        u32::from(rule.hour()),
        u32::from(rule.minute()),
        anchor.second(),
        anchor.nanosecond(),
    );
    let weekdays = rule.weekdays();
    let last_date = search_end.date_naive();

    days_between(anchor.date_naive(), last_date)
        .filter(move |date| weekdays.contains(date.weekday()))
        .filter_map(move |date| time.map(|time| date.and_time(time).and_utc()))
        .filter(move |candidate| anchor <= *candidate && *candidate <= search_end)
}

fn days_between(first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    first.iter_days().take_while(move |date| *date <= last)
}

/// ## Summary
/// Shifts a UTC candidate so it shares the anchor's local wall-clock time.
///
/// The anchor fixes which side of the DST boundary the rule's UTC time was
/// computed for. Candidates on the other side move by the savings: forward
/// by the anchor's savings when leaving DST, back by the candidate's savings
/// when entering it.
fn correct_for_dst(
    candidate: DateTime<Utc>,
    zone: Zone,
    anchor_dst: bool,
    anchor_savings: TimeDelta,
) -> Option<DateTime<Utc>> {
    match (anchor_dst, zone.is_dst_at(candidate)) {
        (true, false) => {
            tracing::info!(
                %candidate,
                savings_minutes = anchor_savings.num_minutes(),
                "Adjusting occurrence forward for end of daylight saving time"
            );
            candidate.checked_add_signed(anchor_savings)
        }
        (false, true) => {
            let savings = zone.dst_savings_at(candidate);
            tracing::info!(
                %candidate,
                savings_minutes = savings.num_minutes(),
                "Adjusting occurrence back for daylight saving time"
            );
            candidate.checked_sub_signed(savings)
        }
        _ => Some(candidate),
    }
}
