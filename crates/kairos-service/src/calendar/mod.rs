//! iCalendar export of scheduled recordings for capture agents.

mod event;
mod generator;
mod series;

pub use event::ScheduledEvent;
pub use generator::CalendarGenerator;
pub use series::{Series, SeriesCache, SeriesCatalog};
