//! RFC 5545 building blocks for schedule expansion: recurrence rules,
//! timezone resolution and iCalendar output.

pub mod ical;
pub mod recur;
pub mod timezone;
