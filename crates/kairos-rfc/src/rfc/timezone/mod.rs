//! Timezone resolution and DST queries for schedule expansion.
//!
//! Wall-clock values ([`LocalDateTime`]) and absolute instants
//! (`chrono::DateTime<Utc>`) are kept as separate types; a [`Zone`] is the
//! only way to move between them.

mod resolver;
mod zone;

pub use resolver::{ConversionError, TimeZoneResolver};
pub use zone::{LocalDateTime, Zone};
