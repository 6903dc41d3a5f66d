//! RFC 3339 date-time parsing and formatting.
//!
//! Converts between `xsd:dateTime` wire strings and the internal representation:
//! microseconds since the Unix epoch (`epoch_micros`, UTC) plus the original
//! offset in minutes, so a value re-formats with the offset it was written in.

const MICROSECONDS_PER_SECOND: i64 = 1_000_000;
const MICROSECONDS_PER_MINUTE: i64 = 60 * MICROSECONDS_PER_SECOND;
const MICROSECONDS_PER_HOUR: i64 = 60 * MICROSECONDS_PER_MINUTE;
const MICROSECONDS_PER_DAY: i64 = 24 * MICROSECONDS_PER_HOUR;

/// Error type for RFC 3339 parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DateTimeParseError {
    pub message: String,
}

impl DateTimeParseError {
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Parses a run of ASCII digits. Signs and whitespace are rejected.
pub(crate) fn parse_digits(s: &str) -> Option<i64> {
    if s.is_empty() || s.len() > 18 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parses a timezone offset string (Z, +HH:MM, -HH:MM) and returns offset in minutes.
fn parse_timezone_offset(offset: &str) -> Result<i16, DateTimeParseError> {
    if offset == "Z" || offset == "z" {
        return Ok(0);
    }

    let invalid = || DateTimeParseError::new(format!("invalid timezone offset: {offset}"));

    if offset.len() != 6 || offset.as_bytes()[3] != b':' {
        return Err(invalid());
    }

    let sign = match offset.as_bytes()[0] {
        b'+' => 1i16,
        b'-' => -1i16,
        _ => return Err(invalid()),
    };

    let hours = parse_digits(&offset[1..3]).ok_or_else(invalid)? as i16;
    let minutes = parse_digits(&offset[4..6]).ok_or_else(invalid)? as i16;

    // 24:00 is the only hour-24 offset allowed
    if hours > 24 || (hours == 24 && minutes != 0) || minutes > 59 {
        return Err(invalid());
    }

    Ok(sign * (hours * 60 + minutes))
}

/// Formats an offset in minutes as a timezone string (Z, +HH:MM, -HH:MM).
fn format_timezone_offset(offset_min: i16) -> String {
    if offset_min == 0 {
        return "Z".to_string();
    }

    let sign = if offset_min >= 0 { '+' } else { '-' };
    let abs_offset = offset_min.unsigned_abs();
    format!("{}{:02}:{:02}", sign, abs_offset / 60, abs_offset % 60)
}

/// Parses fractional seconds and returns microseconds (truncated past 6 digits).
fn parse_fractional_seconds(frac: &str) -> Result<i64, DateTimeParseError> {
    if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateTimeParseError::new(format!("invalid fractional seconds: .{frac}")));
    }
    let mut padded: String = frac.chars().take(6).collect();
    while padded.len() < 6 {
        padded.push('0');
    }
    Ok(padded.parse().unwrap_or(0))
}

/// Formats microseconds as fractional seconds string, omitting if zero.
pub(crate) fn format_fractional_seconds(us: i64) -> String {
    if us == 0 {
        return String::new();
    }
    let digits = format!("{us:06}");
    format!(".{}", digits.trim_end_matches('0'))
}

/// Returns true if the given year is a leap year.
fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Returns the number of days in a given month (1-indexed).
fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Calculates days since Unix epoch for a given civil date (Howard Hinnant's algorithm).
fn date_to_days(year: i32, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year } as i64;
    let m = if month <= 2 { month as i64 + 9 } else { month as i64 - 3 };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let doy = (153 * m + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;

    era * 146_097 + doe - 719_468
}

/// Converts days since Unix epoch to (year, month, day).
fn days_to_date(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;

    (if m <= 2 { y + 1 } else { y }, m, d)
}

/// Parses an RFC 3339 date-time and returns microseconds since Unix epoch
/// and the offset in minutes.
///
/// Accepted shape: `YYYY-MM-DDTHH:MM[:SS[.fraction]][Z|+HH:MM|-HH:MM]`.
/// Seconds may be omitted and a missing offset is read as UTC.
pub fn parse_datetime_rfc3339(s: &str) -> Result<(i64, i16), DateTimeParseError> {
    let invalid = || DateTimeParseError::new(format!("invalid RFC 3339 date-time: {s}"));

    // Byte slicing below relies on every char being one byte
    if !s.is_ascii() || s.len() < 16 {
        return Err(invalid());
    }
    let bytes = s.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' || !matches!(bytes[10], b'T' | b't' | b' ') {
        return Err(invalid());
    }

    let year = parse_digits(&s[..4]).ok_or_else(invalid)? as i32;
    let month = parse_digits(&s[5..7]).ok_or_else(invalid)? as u32;
    let day = parse_digits(&s[8..10]).ok_or_else(invalid)? as u32;

    if !(1..=12).contains(&month) {
        return Err(DateTimeParseError::new(format!("invalid month in date-time: {s}")));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(DateTimeParseError::new(format!("invalid day in date-time: {s}")));
    }

    let time = &s[11..];
    if time.as_bytes()[2] != b':' {
        return Err(invalid());
    }
    let hours = parse_digits(&time[..2]).ok_or_else(invalid)?;
    let minutes = parse_digits(&time[3..5]).ok_or_else(invalid)?;

    let mut rest = &time[5..];
    let mut seconds = 0;
    if let Some(after_colon) = rest.strip_prefix(':') {
        if after_colon.len() < 2 {
            return Err(invalid());
        }
        seconds = parse_digits(&after_colon[..2]).ok_or_else(invalid)?;
        rest = &after_colon[2..];
    }

    if hours > 23 {
        return Err(DateTimeParseError::new(format!("invalid hours in date-time: {s}")));
    }
    if minutes > 59 {
        return Err(DateTimeParseError::new(format!("invalid minutes in date-time: {s}")));
    }
    if seconds > 59 {
        return Err(DateTimeParseError::new(format!("invalid seconds in date-time: {s}")));
    }

    let mut microseconds = 0;
    if let Some(after_dot) = rest.strip_prefix('.') {
        let frac_end = after_dot
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after_dot.len());
        microseconds = parse_fractional_seconds(&after_dot[..frac_end])?;
        rest = &after_dot[frac_end..];
    }

    let offset_min = if rest.is_empty() { 0 } else { parse_timezone_offset(rest)? };

    let local_micros = date_to_days(year, month, day) * MICROSECONDS_PER_DAY
        + hours * MICROSECONDS_PER_HOUR
        + minutes * MICROSECONDS_PER_MINUTE
        + seconds * MICROSECONDS_PER_SECOND
        + microseconds;

    // local time = UTC + offset, so UTC = local - offset
    Ok((local_micros - offset_min as i64 * MICROSECONDS_PER_MINUTE, offset_min))
}

/// Formats microseconds since Unix epoch as an RFC 3339 date-time string.
pub fn format_datetime_rfc3339(epoch_micros: i64, offset_min: i16) -> String {
    let local_us = epoch_micros + offset_min as i64 * MICROSECONDS_PER_MINUTE;

    let days = local_us.div_euclid(MICROSECONDS_PER_DAY);
    let time_micros = local_us.rem_euclid(MICROSECONDS_PER_DAY);
    let (year, month, day) = days_to_date(days);

    let hours = time_micros / MICROSECONDS_PER_HOUR;
    let minutes = time_micros % MICROSECONDS_PER_HOUR / MICROSECONDS_PER_MINUTE;
    let seconds = time_micros % MICROSECONDS_PER_MINUTE / MICROSECONDS_PER_SECOND;
    let microseconds = time_micros % MICROSECONDS_PER_SECOND;

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}{}",
        year,
        month,
        day,
        hours,
        minutes,
        seconds,
        format_fractional_seconds(microseconds),
        format_timezone_offset(offset_min)
    )
}
