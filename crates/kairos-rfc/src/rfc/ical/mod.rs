//! Minimal iCalendar model and writer (RFC 5545).
//!
//! Only the parts needed to publish scheduled events are modelled; there is
//! no parser.

pub mod build;
pub mod core;
