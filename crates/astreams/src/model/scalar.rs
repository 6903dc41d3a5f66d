//! Typed scalar values.

use std::fmt;

use crate::util::{
    format_datetime_rfc3339, format_duration_iso8601, parse_datetime_rfc3339,
    parse_duration_iso8601, DateTimeParseError, DurationParseError, DurationParts,
};

/// An `xsd:dateTime` instant with the offset it was written in.
///
/// Two values naming the same instant in different offsets are not equal:
/// the offset is part of what round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateTime {
    epoch_micros: i64,
    offset_min: i16,
}

impl DateTime {
    /// Creates a date-time from microseconds since the Unix epoch (UTC) and
    /// a display offset in minutes.
    pub fn from_epoch_micros(epoch_micros: i64, offset_min: i16) -> Self {
        Self { epoch_micros, offset_min }
    }

    /// Parses an RFC 3339 date-time.
    pub fn parse(s: &str) -> Result<Self, DateTimeParseError> {
        let (epoch_micros, offset_min) = parse_datetime_rfc3339(s)?;
        Ok(Self { epoch_micros, offset_min })
    }

    pub fn epoch_micros(&self) -> i64 {
        self.epoch_micros
    }

    pub fn offset_min(&self) -> i16 {
        self.offset_min
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_datetime_rfc3339(self.epoch_micros, self.offset_min))
    }
}

/// An `xsd:duration`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Duration(DurationParts);

impl Duration {
    pub fn new(parts: DurationParts) -> Self {
        Self(parts)
    }

    /// A duration of whole seconds, e.g. `PT90S`.
    pub fn from_secs(secs: u64) -> Self {
        Self(DurationParts {
            second_micros: secs.saturating_mul(1_000_000),
            ..DurationParts::default()
        })
    }

    /// Parses an ISO 8601 duration.
    pub fn parse(s: &str) -> Result<Self, DurationParseError> {
        parse_duration_iso8601(s).map(Self)
    }

    pub fn parts(&self) -> &DurationParts {
        &self.0
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration_iso8601(&self.0))
    }
}

/// A decoded scalar value.
///
/// String-shaped kinds keep separate variants so a value remembers which
/// representation it was decoded as (or built for).
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// `xsd:float`.
    Float(f64),
    /// `xsd:string`.
    String(String),
    /// `rdf:langString` in the property's default language.
    LangString(String),
    /// `xsd:dateTime`.
    DateTime(DateTime),
    /// `xsd:duration`.
    Duration(Duration),
    /// RFC 2045 media type.
    MimeType(String),
    /// BCP 47 language tag.
    LanguageTag(String),
    /// `xsd:nonNegativeInteger`.
    NonNegativeInteger(u64),
    /// `xsd:boolean`.
    Boolean(bool),
    /// A token from an enumerated domain.
    Enumerated(String),
}

impl Scalar {
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text of any string-shaped scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s)
            | Scalar::LangString(s)
            | Scalar::MimeType(s)
            | Scalar::LanguageTag(s)
            | Scalar::Enumerated(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime> {
        match self {
            Scalar::DateTime(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<&Duration> {
        match self {
            Scalar::Duration(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Scalar::NonNegativeInteger(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Boolean(v)
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Scalar::NonNegativeInteger(v)
    }
}

impl From<DateTime> for Scalar {
    fn from(v: DateTime) -> Self {
        Scalar::DateTime(v)
    }
}

impl From<Duration> for Scalar {
    fn from(v: Duration) -> Self {
        Scalar::Duration(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::String(v)
    }
}
