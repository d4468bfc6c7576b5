//! Repository layer — entity-scoped database operations.
//!
//! One sub-module per entity; all public functions are re-exported here.

mod appointment;
mod client;
mod finance;
mod health_declaration;
mod personal_event;

use chrono::NaiveDateTime;

pub use appointment::*;
pub use client::*;
pub use finance::*;
pub use health_declaration::*;
pub use personal_event::*;

/// Storage format for timestamps.
pub(crate) const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
/// Storage format for dates.
pub(crate) const DATE_FMT: &str = "%Y-%m-%d";

/// Parse a stored timestamp, tolerating the ISO `T` separator.
pub(crate) fn parse_datetime(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, DATETIME_FMT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .unwrap_or_default()
}
