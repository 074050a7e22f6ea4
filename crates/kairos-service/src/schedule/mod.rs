//! Schedule expansion: turning a recurring schedule into concrete periods.

mod expand;
mod expander;
mod request;
mod titles;

pub use expand::expand_periods;
pub use expander::PeriodExpander;
pub use request::ScheduleRequest;
pub use titles::numbered_titles;
