//! iCalendar core models (RFC 5545).
//!
//! Properties keep their typed value; text escaping, date formatting and
//! base64 encoding happen only when serializing.

mod component;
mod property;

pub use component::{Component, ComponentKind, ICalendar};
pub use property::{Parameter, Property, Value};
