//! ISO 8601 duration parsing and formatting (`xsd:duration`).
//!
//! Durations keep their calendar components separate: `P1M` is not a fixed
//! number of seconds, so nothing is normalized across unit boundaries.

use super::datetime::{format_fractional_seconds, parse_digits};

/// Error type for ISO 8601 duration parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DurationParseError {
    pub message: String,
}

/// Calendar and clock components of a duration, as written on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DurationParts {
    pub negative: bool,
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    /// Seconds including the fractional part, in microseconds.
    pub second_micros: u64,
}

/// Parses `[-]PnYnMnWnDTnHnMn[.f]S`.
///
/// At least one component is required and `T` must be followed by a
/// clock component. Only the seconds component may carry a fraction.
pub fn parse_duration_iso8601(s: &str) -> Result<DurationParts, DurationParseError> {
    let invalid = || DurationParseError {
        message: format!("invalid ISO 8601 duration: {s}"),
    };

    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let body = body.strip_prefix('P').ok_or_else(invalid)?;
    if body.is_empty() || !body.is_ascii() {
        return Err(invalid());
    }

    let (date_part, time_part) = match body.split_once('T') {
        Some((_, "")) => return Err(invalid()),
        Some((date, time)) => (date, Some(time)),
        None => (body, None),
    };

    let mut parts = DurationParts { negative, ..DurationParts::default() };

    // Designators must appear in this order, each at most once
    let mut date_order = ['Y', 'M', 'W', 'D'].iter();
    for (number, designator) in components(date_part).ok_or_else(invalid)? {
        if number.contains('.') {
            return Err(invalid());
        }
        if !date_order.any(|d| *d == designator) {
            return Err(invalid());
        }
        let value = parse_component(number).ok_or_else(invalid)?;
        match designator {
            'Y' => parts.years = value,
            'M' => parts.months = value,
            'W' => parts.weeks = value,
            _ => parts.days = value,
        }
    }

    if let Some(time_part) = time_part {
        let mut time_order = ['H', 'M', 'S'].iter();
        for (number, designator) in components(time_part).ok_or_else(invalid)? {
            if !time_order.any(|d| *d == designator) {
                return Err(invalid());
            }
            if designator == 'S' {
                parts.second_micros = parse_seconds(number).ok_or_else(invalid)?;
                continue;
            }
            if number.contains('.') {
                return Err(invalid());
            }
            let value = parse_component(number).ok_or_else(invalid)?;
            if designator == 'H' {
                parts.hours = value;
            } else {
                parts.minutes = value;
            }
        }
    }

    Ok(parts)
}

/// Splits `3Y4M` into `[("3", 'Y'), ("4", 'M')]`. Returns None on a dangling number.
fn components(s: &str) -> Option<Vec<(&str, char)>> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() || c == '.' {
            continue;
        }
        if i == start {
            return None;
        }
        out.push((&s[start..i], c));
        start = i + c.len_utf8();
    }
    (start == s.len()).then_some(out)
}

fn parse_component(number: &str) -> Option<u32> {
    u32::try_from(parse_digits(number)?).ok()
}

fn parse_seconds(number: &str) -> Option<u64> {
    let (whole, frac) = match number.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (number, None),
    };
    let whole = u64::try_from(parse_digits(whole)?).ok()?;
    let micros = match frac {
        None => 0,
        Some(frac) => {
            let mut padded: String = frac.chars().take(6).collect();
            if padded.is_empty() || !padded.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            while padded.len() < 6 {
                padded.push('0');
            }
            padded.parse::<u64>().ok()?
        }
    };
    whole.checked_mul(1_000_000)?.checked_add(micros)
}

/// Formats duration parts canonically; an all-zero duration is `PT0S`.
pub fn format_duration_iso8601(parts: &DurationParts) -> String {
    let mut out = String::new();
    if parts.negative {
        out.push('-');
    }
    out.push('P');

    for (value, designator) in [
        (parts.years, 'Y'),
        (parts.months, 'M'),
        (parts.weeks, 'W'),
        (parts.days, 'D'),
    ] {
        if value != 0 {
            out.push_str(&format!("{value}{designator}"));
        }
    }

    let has_clock = parts.hours != 0 || parts.minutes != 0 || parts.second_micros != 0;
    if has_clock {
        out.push('T');
        if parts.hours != 0 {
            out.push_str(&format!("{}H", parts.hours));
        }
        if parts.minutes != 0 {
            out.push_str(&format!("{}M", parts.minutes));
        }
        if parts.second_micros != 0 {
            let whole = parts.second_micros / 1_000_000;
            let frac = (parts.second_micros % 1_000_000) as i64;
            out.push_str(&format!("{}{}S", whole, format_fractional_seconds(frac)));
        }
    } else if out.ends_with('P') {
        out.push_str("T0S");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_basic() {
        let parts = parse_duration_iso8601("P1Y2M3DT4H5M6S").unwrap();
        assert_eq!(parts.years, 1);
        assert_eq!(parts.months, 2);
        assert_eq!(parts.days, 3);
        assert_eq!(parts.hours, 4);
        assert_eq!(parts.minutes, 5);
        assert_eq!(parts.second_micros, 6_000_000);
        assert!(!parts.negative);
    }

    #[test]
    fn test_parse_duration_month_versus_minute() {
        let months = parse_duration_iso8601("P5M").unwrap();
        let minutes = parse_duration_iso8601("PT5M").unwrap();
        assert_eq!(months.months, 5);
        assert_eq!(months.minutes, 0);
        assert_eq!(minutes.minutes, 5);
        assert_eq!(minutes.months, 0);
    }

    #[test]
    fn test_parse_duration_fractional_and_negative() {
        let parts = parse_duration_iso8601("-PT1.5S").unwrap();
        assert!(parts.negative);
        assert_eq!(parts.second_micros, 1_500_000);
    }

    #[test]
    fn test_duration_roundtrip() {
        for s in ["P1D", "PT2H", "P1Y2M3DT4H5M6S", "-P3W", "PT0.25S", "PT0S"] {
            let parts = parse_duration_iso8601(s).unwrap();
            assert_eq!(format_duration_iso8601(&parts), s);
        }
    }

    #[test]
    fn test_invalid_durations() {
        for s in ["", "P", "PT", "1D", "P1H", "PT1D", "P1.5D", "P1M1Y", "P1D1D", "PTS", "P-1D", "P1DT"] {
            assert!(parse_duration_iso8601(s).is_err(), "{s} should be rejected");
        }
    }
}
