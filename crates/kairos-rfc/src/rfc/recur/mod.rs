//! Weekly recurrence rules as produced by the scheduling UI.

mod rule;
mod weekday;

pub use rule::RecurrenceRule;
pub use weekday::{WeekdaySet, ical_weekday_code, parse_ical_weekday};
