//! Utility modules for wire-format scalars.

pub mod datetime;
pub mod duration;

pub use datetime::{format_datetime_rfc3339, parse_datetime_rfc3339, DateTimeParseError};
pub use duration::{format_duration_iso8601, parse_duration_iso8601, DurationParseError, DurationParts};
