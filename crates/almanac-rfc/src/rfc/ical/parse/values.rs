//! Value type parsers for iCalendar (RFC 5545 §3.3).
//!
//! Parsers here return errors without reporting them; the public
//! `FromStr` impls and [`crate::rfc::ical::core::Value::parse`] report.
#![expect(
    clippy::map_err_ignore,
    reason = "Inner errors are replaced by one carrying the whole token"
)]

use almanac_core::error::{ErrorKind, last_error, restore_error, suppress};

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::ical::core::{Duration, Period, Time, Zone, days_in_month};

/// Reads an unsigned run of ASCII digits.
fn digits(s: &str, from: usize, to: usize) -> Option<i32> {
    let part = s.get(from..to)?;
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn check_date(year: i32, month: i32, day: i32, position: usize) -> ParseResult<()> {
    if !(1..=12).contains(&month) || day < 1 || day > days_in_month(month, year) {
        return Err(ParseError::new(ParseErrorKind::InvalidDate, position));
    }
    Ok(())
}

fn check_clock(hour: i32, minute: i32, second: i32, position: usize) -> ParseResult<()> {
    if hour > 23 || minute > 59 || second > 60 {
        return Err(ParseError::new(ParseErrorKind::InvalidTime, position));
    }
    Ok(())
}

/// Parses a DATE value (RFC 5545 §3.3.4), basic `YYYYMMDD` or extended
/// `YYYY-MM-DD`.
///
/// ## Errors
/// Returns an error if the string has another shape or an impossible day.
pub fn parse_date(s: &str) -> ParseResult<Time> {
    let invalid = || ParseError::new(ParseErrorKind::InvalidDate, 0).with_context(s);
    let (year, month, day) = match s.len() {
        8 => (digits(s, 0, 4), digits(s, 4, 6), digits(s, 6, 8)),
        10 if s.as_bytes()[4] == b'-' && s.as_bytes()[7] == b'-' => {
            (digits(s, 0, 4), digits(s, 5, 7), digits(s, 8, 10))
        }
        _ => return Err(invalid()),
    };
    let (Some(year), Some(month), Some(day)) = (year, month, day) else {
        return Err(invalid());
    };
    check_date(year, month, day, 0).map_err(|e| e.with_context(s))?;
    Ok(Time::date(year, month, day))
}

/// Parses a DATE or DATE-TIME value (RFC 5545 §3.3.5).
///
/// Accepted shapes: `YYYYMMDD`, `YYYY-MM-DD`, `YYYYMMDDTHHMMSS[Z]` and
/// `YYYY-MM-DDTHH:MM:SS[.fff][Z]`. A trailing `Z` anchors the time in UTC;
/// otherwise it is floating. Fractional seconds are dropped.
///
/// ## Errors
/// Returns an error for any other shape or an out-of-range field.
pub fn parse_date_time(s: &str) -> ParseResult<Time> {
    if matches!(s.len(), 8 | 10) {
        return parse_date(s);
    }
    let invalid = |position: usize| {
        ParseError::new(ParseErrorKind::InvalidDateTime, position).with_context(s)
    };

    let (date_len, extended) = match s.find('T') {
        Some(8) => (8, false),
        Some(10) => (10, true),
        Some(other) => return Err(invalid(other)),
        None => return Err(invalid(0)),
    };
    let mut time = parse_date(&s[..date_len]).map_err(|e| e.with_context(s))?;
    let clock = &s[date_len + 1..];
    let (clock, utc) = clock
        .strip_suffix('Z')
        .map_or((clock, false), |stripped| (stripped, true));

    let fields = if extended {
        let body = match clock.len() {
            8 => clock,
            12 if clock.as_bytes()[8] == b'.' && digits(clock, 9, 12).is_some() => &clock[..8],
            _ => return Err(invalid(date_len + 1)),
        };
        if body.as_bytes()[2] != b':' || body.as_bytes()[5] != b':' {
            return Err(invalid(date_len + 1));
        }
        (digits(body, 0, 2), digits(body, 3, 5), digits(body, 6, 8))
    } else {
        if clock.len() != 6 {
            return Err(invalid(date_len + 1));
        }
        (digits(clock, 0, 2), digits(clock, 2, 4), digits(clock, 4, 6))
    };
    let (Some(hour), Some(minute), Some(second)) = fields else {
        return Err(invalid(date_len + 1));
    };
    check_clock(hour, minute, second, date_len + 1).map_err(|e| e.with_context(s))?;

    time.is_date = false;
    time.hour = hour;
    time.minute = minute;
    time.second = second;
    if utc {
        time.zone = Zone::Utc;
    }
    Ok(time)
}

/// Parses a TIME value (RFC 5545 §3.3.12), `HHMMSS[Z]`. The date fields of
/// the result are zero.
///
/// ## Errors
/// Returns an error if the string is not a valid 6-digit time.
pub fn parse_time(s: &str) -> ParseResult<Time> {
    let invalid = || ParseError::new(ParseErrorKind::InvalidTime, 0).with_context(s);
    let (clock, utc) = s
        .strip_suffix('Z')
        .map_or((s, false), |stripped| (stripped, true));
    if clock.len() != 6 {
        return Err(invalid());
    }
    let (Some(hour), Some(minute), Some(second)) =
        (digits(clock, 0, 2), digits(clock, 2, 4), digits(clock, 4, 6))
    else {
        return Err(invalid());
    };
    check_clock(hour, minute, second, 0).map_err(|e| e.with_context(s))?;

    let mut time = Time::date_time(0, 0, 0, hour, minute, second);
    if utc {
        time.zone = Zone::Utc;
    }
    Ok(time)
}

/// Parses a UTC-OFFSET value (RFC 5545 §3.3.14), `(+|-)HHMM[SS]`, into
/// seconds east of UTC.
///
/// ## Errors
/// Returns an error if the string is not a valid UTC offset format.
pub fn parse_utc_offset(s: &str) -> ParseResult<i32> {
    let invalid = || ParseError::new(ParseErrorKind::InvalidUtcOffset, 0).with_context(s);
    let sign = match s.as_bytes().first() {
        Some(b'+') => 1,
        Some(b'-') => -1,
        _ => return Err(invalid()),
    };
    let seconds = match s.len() {
        5 => Some(0),
        7 => digits(s, 5, 7),
        _ => None,
    };
    let (Some(hours), Some(minutes), Some(seconds)) = (digits(s, 1, 3), digits(s, 3, 5), seconds)
    else {
        return Err(invalid());
    };
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(invalid());
    }
    Ok(sign * (hours * 3600 + minutes * 60 + seconds))
}

/// Parses a DURATION value (RFC 5545 §3.3.6).
///
/// Format: `[+|-]P[nW][nD][T[nH][nM][nS]]`. Units must appear in that
/// order, at most once each, each preceded by a numeral; clock units
/// require the `T`.
///
/// ## Errors
/// Returns an error on any deviation from the grammar.
pub fn parse_duration(s: &str) -> ParseResult<Duration> {
    let invalid =
        |position: usize| ParseError::new(ParseErrorKind::InvalidDuration, position).with_context(s);

    let mut duration = Duration::zero();
    let mut signed = false;
    let mut seen_p = false;
    let mut in_time = false;
    let mut number: Option<u32> = None;
    let mut last_unit: Option<u8> = None;

    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {
                signed = true;
                duration.negative = c == '-';
            }
            'P' if !seen_p && (i == 0 || (i == 1 && signed)) => seen_p = true,
            '0'..='9' if seen_p => {
                let digit = c.to_digit(10).unwrap_or_default();
                let value = number
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(digit))
                    .ok_or_else(|| invalid(i))?;
                number = Some(value);
            }
            'T' if seen_p && !in_time && number.is_none() => in_time = true,
            'W' | 'D' | 'H' | 'M' | 'S' => {
                let Some(value) = number.take() else {
                    return Err(invalid(i));
                };
                let rank = match (c, in_time) {
                    ('W', false) => 0,
                    ('D', false) => 1,
                    ('H', true) => 2,
                    ('M', true) => 3,
                    ('S', true) => 4,
                    _ => return Err(invalid(i)),
                };
                if last_unit.is_some_and(|previous| previous >= rank) {
                    return Err(invalid(i));
                }
                last_unit = Some(rank);
                match rank {
                    0 => duration.weeks = value,
                    1 => duration.days = value,
                    2 => duration.hours = value,
                    3 => duration.minutes = value,
                    _ => duration.seconds = value,
                }
            }
            _ => return Err(invalid(i)),
        }
    }

    let dangling_time = in_time && last_unit.is_none_or(|unit| unit < 2);
    if !seen_p || number.is_some() || last_unit.is_none() || dangling_time {
        return Err(invalid(s.len()));
    }
    Ok(duration)
}

/// Parses a PERIOD value (RFC 5545 §3.3.9).
///
/// Format: `start/end` or `start/duration`. The end is first tried as a
/// date-time with malformed-data reports made non-fatal, then as a
/// duration.
///
/// ## Errors
/// Returns an error if either side is malformed, the start is null or the
/// duration is zero.
pub fn parse_period(s: &str) -> ParseResult<Period> {
    let invalid =
        |position: usize| ParseError::new(ParseErrorKind::InvalidPeriod, position).with_context(s);
    let slash = s.find('/').ok_or_else(|| invalid(0))?;
    let start = parse_date_time(&s[..slash]).map_err(|_| invalid(0))?;
    if start.is_null() {
        return Err(invalid(0));
    }
    let rest = &s[slash + 1..];

    let previous = last_error();
    let end = {
        let _guard = suppress(ErrorKind::MalformedData);
        rest.parse::<Time>()
    };
    restore_error(previous);
    if let Ok(end) = end {
        return Ok(Period::explicit(start, end));
    }

    let duration = parse_duration(rest).map_err(|_| invalid(slash + 1))?;
    if duration.is_zero() {
        return Err(invalid(slash + 1));
    }
    Ok(Period::with_duration(start, duration))
}

/// Parses a BOOLEAN value (RFC 5545 §3.3.2).
///
/// ## Errors
/// Returns an error if the string is not "TRUE" or "FALSE".
pub fn parse_boolean(s: &str) -> ParseResult<bool> {
    match s.to_ascii_uppercase().as_str() {
        "TRUE" => Ok(true),
        "FALSE" => Ok(false),
        _ => Err(ParseError::new(ParseErrorKind::InvalidBoolean, 0).with_context(s)),
    }
}

/// Parses an INTEGER value (RFC 5545 §3.3.8).
///
/// ## Errors
/// Returns an error if the string is not a valid integer.
pub fn parse_integer(s: &str) -> ParseResult<i32> {
    s.trim()
        .parse()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidInteger, 0).with_context(s))
}

/// Parses a FLOAT value (RFC 5545 §3.3.7).
///
/// ## Errors
/// Returns an error if the string is not a valid floating-point number.
pub fn parse_float(s: &str) -> ParseResult<f64> {
    s.trim()
        .parse()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidFloat, 0).with_context(s))
}

/// Parses a GEO value (RFC 5545 §3.8.1.6), `latitude;longitude`.
///
/// ## Errors
/// Returns an error unless both halves are floats.
pub fn parse_geo(s: &str) -> ParseResult<(f64, f64)> {
    let invalid = || ParseError::new(ParseErrorKind::InvalidGeo, 0).with_context(s);
    let (lat, lon) = s.split_once(';').ok_or_else(invalid)?;
    let lat = parse_float(lat).map_err(|_| invalid())?;
    let lon = parse_float(lon).map_err(|_| invalid())?;
    Ok((lat, lon))
}

/// Unescapes text values (RFC 5545 §3.3.11).
///
/// Escape sequences: \\ \, \; \n \N
#[must_use]
pub fn unescape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n' | 'N') => result.push('\n'),
                Some(',') => result.push(','),
                Some(';') => result.push(';'),
                Some('\\') | None => result.push('\\'),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}
