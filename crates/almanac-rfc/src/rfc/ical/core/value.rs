//! Typed property values (RFC 5545 §3.3).

use std::cmp::Ordering;
use std::fmt;

use super::{Duration, Method, Period, Recurrence, RecurOptions, Status, Time, ValueKind};
use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::build::escape_text;
use crate::rfc::ical::parse::{ParseError, ParseErrorKind, recur, values};

/// A property value. The variant is its kind and never changes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Base64 text, kept encoded.
    Binary(String),
    Boolean(bool),
    CalAddress(String),
    Date(Time),
    DateTime(Time),
    Duration(Duration),
    Float(f64),
    Geo { lat: f64, lon: f64 },
    Integer(i32),
    Period(Period),
    Recur(Box<Recurrence>),
    Text(String),
    /// Clock only; the date fields are zero.
    Time(Time),
    Uri(String),
    /// Seconds east of UTC.
    UtcOffset(i32),
    Method(Method),
    Status(Status),
    /// Inline binary or a URI, kept as written.
    Attach(String),
    /// Either a DATE or a DATE-TIME.
    DateTimeDate(Time),
    /// A DATE-TIME (start only) or a PERIOD.
    DateTimePeriod(Period),
    Query(String),
    String(String),
    X(String),
}

fn mismatch(expected: ValueKind, found: ValueKind) -> RfcError {
    RfcError::usage(format!("value is {found}, not {expected}")).report()
}

macro_rules! copy_accessors {
    ($($get:ident, $set:ident, $variant:ident, $ty:ty;)*) => {
        $(
            #[doc = concat!("Returns the ", stringify!($variant), " payload.")]
            ///
            /// ## Errors
            /// Returns a usage error when the value has another kind.
            pub fn $get(&self) -> RfcResult<$ty> {
                match self {
                    Self::$variant(v) => Ok(*v),
                    other => Err(mismatch(ValueKind::$variant, other.kind())),
                }
            }

            #[doc = concat!("Replaces the ", stringify!($variant), " payload.")]
            ///
            /// ## Errors
            /// Returns a usage error when the value has another kind.
            pub fn $set(&mut self, value: $ty) -> RfcResult<()> {
                match self {
                    Self::$variant(v) => {
                        *v = value;
                        Ok(())
                    }
                    other => Err(mismatch(ValueKind::$variant, other.kind())),
                }
            }
        )*
    };
}

macro_rules! text_accessors {
    ($($get:ident, $set:ident, $variant:ident;)*) => {
        $(
            #[doc = concat!("Returns the ", stringify!($variant), " text.")]
            ///
            /// ## Errors
            /// Returns a usage error when the value has another kind.
            pub fn $get(&self) -> RfcResult<&str> {
                match self {
                    Self::$variant(v) => Ok(v),
                    other => Err(mismatch(ValueKind::$variant, other.kind())),
                }
            }

            #[doc = concat!("Replaces the ", stringify!($variant), " text.")]
            ///
            /// ## Errors
            /// Returns a usage error when the value has another kind.
            pub fn $set(&mut self, value: impl Into<String>) -> RfcResult<()> {
                match self {
                    Self::$variant(v) => {
                        *v = value.into();
                        Ok(())
                    }
                    other => Err(mismatch(ValueKind::$variant, other.kind())),
                }
            }
        )*
    };
}

impl Value {
    /// ## Summary
    /// Parses `token` as a value of `kind`.
    ///
    /// ## Errors
    /// Returns a malformed-data error, reported to the diagnostic sink,
    /// when `token` is not valid for `kind`.
    pub fn parse(kind: ValueKind, token: &str) -> RfcResult<Self> {
        Self::parse_raw(kind, token).map_err(|e| RfcError::from(e).report())
    }

    fn parse_raw(kind: ValueKind, token: &str) -> Result<Self, ParseError> {
        let wrong_shape = |k: ParseErrorKind| ParseError::new(k, 0).with_context(token);
        Ok(match kind {
            ValueKind::Binary => Self::Binary(token.to_string()),
            ValueKind::Boolean => Self::Boolean(values::parse_boolean(token)?),
            ValueKind::CalAddress => Self::CalAddress(token.to_string()),
            ValueKind::Date => {
                let t = values::parse_date_time(token)?;
                if !t.is_date {
                    return Err(wrong_shape(ParseErrorKind::InvalidDate));
                }
                Self::Date(t)
            }
            ValueKind::DateTime => {
                let t = values::parse_date_time(token)?;
                if t.is_date {
                    return Err(wrong_shape(ParseErrorKind::InvalidDateTime));
                }
                Self::DateTime(t)
            }
            ValueKind::DateTimeDate => Self::DateTimeDate(values::parse_date_time(token)?),
            ValueKind::DateTimePeriod => {
                if token.contains('/') {
                    Self::DateTimePeriod(values::parse_period(token)?)
                } else {
                    let start = values::parse_date_time(token)?;
                    Self::DateTimePeriod(Period::with_duration(start, Duration::zero()))
                }
            }
            ValueKind::Duration => Self::Duration(values::parse_duration(token)?),
            ValueKind::Float => Self::Float(values::parse_float(token)?),
            ValueKind::Geo => {
                let (lat, lon) = values::parse_geo(token)?;
                Self::Geo { lat, lon }
            }
            ValueKind::Integer => Self::Integer(values::parse_integer(token)?),
            ValueKind::Period => Self::Period(values::parse_period(token)?),
            ValueKind::Recur => Self::Recur(Box::new(recur::parse_recurrence(
                token,
                &RecurOptions::default(),
            )?)),
            ValueKind::Text => Self::Text(values::unescape_text(token)),
            ValueKind::Time => Self::Time(values::parse_time(token)?),
            ValueKind::Uri => Self::Uri(token.to_string()),
            ValueKind::UtcOffset => Self::UtcOffset(values::parse_utc_offset(token)?),
            ValueKind::Method => match Method::from_token(token) {
                Method::None if token.trim_start_matches(' ') != "NONE" => {
                    return Err(wrong_shape(ParseErrorKind::InvalidEnumeration));
                }
                method => Self::Method(method),
            },
            ValueKind::Status => match Status::from_token(token) {
                Status::None if token.trim_start_matches(' ') != "NONE" => {
                    return Err(wrong_shape(ParseErrorKind::InvalidEnumeration));
                }
                status => Self::Status(status),
            },
            ValueKind::Attach => Self::Attach(token.to_string()),
            ValueKind::Query => Self::Query(token.to_string()),
            ValueKind::String => Self::String(token.to_string()),
            ValueKind::X => Self::X(token.to_string()),
        })
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Binary(_) => ValueKind::Binary,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::CalAddress(_) => ValueKind::CalAddress,
            Self::Date(_) => ValueKind::Date,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Duration(_) => ValueKind::Duration,
            Self::Float(_) => ValueKind::Float,
            Self::Geo { .. } => ValueKind::Geo,
            Self::Integer(_) => ValueKind::Integer,
            Self::Period(_) => ValueKind::Period,
            Self::Recur(_) => ValueKind::Recur,
            Self::Text(_) => ValueKind::Text,
            Self::Time(_) => ValueKind::Time,
            Self::Uri(_) => ValueKind::Uri,
            Self::UtcOffset(_) => ValueKind::UtcOffset,
            Self::Method(_) => ValueKind::Method,
            Self::Status(_) => ValueKind::Status,
            Self::Attach(_) => ValueKind::Attach,
            Self::DateTimeDate(_) => ValueKind::DateTimeDate,
            Self::DateTimePeriod(_) => ValueKind::DateTimePeriod,
            Self::Query(_) => ValueKind::Query,
            Self::String(_) => ValueKind::String,
            Self::X(_) => ValueKind::X,
        }
    }

    /// ## Summary
    /// Orders two values of the same kind. Returns `None` when the kinds
    /// differ, a float is NaN, or the kind has no order and the values
    /// differ.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Binary(a), Self::Binary(b))
            | (Self::CalAddress(a), Self::CalAddress(b))
            | (Self::Text(a), Self::Text(b))
            | (Self::Uri(a), Self::Uri(b))
            | (Self::Attach(a), Self::Attach(b))
            | (Self::Query(a), Self::Query(b))
            | (Self::String(a), Self::String(b))
            | (Self::X(a), Self::X(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b))
            | (Self::DateTime(a), Self::DateTime(b))
            | (Self::DateTimeDate(a), Self::DateTimeDate(b))
            | (Self::Time(a), Self::Time(b)) => Some(a.compare(b)),
            (Self::DateTimePeriod(a), Self::DateTimePeriod(b)) => Some(a.start.compare(&b.start)),
            (Self::Duration(a), Self::Duration(b)) => Some(a.as_seconds().cmp(&b.as_seconds())),
            (Self::Integer(a), Self::Integer(b)) | (Self::UtcOffset(a), Self::UtcOffset(b)) => {
                Some(a.cmp(b))
            }
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Geo { lat: a, lon: x }, Self::Geo { lat: b, lon: y }) => {
                match a.partial_cmp(b)? {
                    Ordering::Equal => x.partial_cmp(y),
                    order => Some(order),
                }
            }
            _ if self.kind() == other.kind() && self == other => Some(Ordering::Equal),
            _ => None,
        }
    }

    copy_accessors! {
        as_boolean, set_boolean, Boolean, bool;
        as_date, set_date, Date, Time;
        as_date_time, set_date_time, DateTime, Time;
        as_duration, set_duration, Duration, Duration;
        as_float, set_float, Float, f64;
        as_integer, set_integer, Integer, i32;
        as_period, set_period, Period, Period;
        as_time, set_time, Time, Time;
        as_utc_offset, set_utc_offset, UtcOffset, i32;
        as_method, set_method, Method, Method;
        as_status, set_status, Status, Status;
    }

    text_accessors! {
        as_text, set_text, Text;
        as_uri, set_uri, Uri;
        as_cal_address, set_cal_address, CalAddress;
        as_binary, set_binary, Binary;
        as_query, set_query, Query;
        as_x, set_x, X;
    }

    /// ## Errors
    /// Returns a usage error when the value is not a RECUR.
    pub fn as_recur(&self) -> RfcResult<&Recurrence> {
        match self {
            Self::Recur(rule) => Ok(rule),
            other => Err(mismatch(ValueKind::Recur, other.kind())),
        }
    }

    /// ## Errors
    /// Returns a usage error when the value is not a RECUR.
    pub fn set_recur(&mut self, rule: Recurrence) -> RfcResult<()> {
        match self {
            Self::Recur(current) => {
                **current = rule;
                Ok(())
            }
            other => Err(mismatch(ValueKind::Recur, other.kind())),
        }
    }

    /// ## Errors
    /// Returns a usage error when the value is not a GEO.
    pub fn as_geo(&self) -> RfcResult<(f64, f64)> {
        match self {
            Self::Geo { lat, lon } => Ok((*lat, *lon)),
            other => Err(mismatch(ValueKind::Geo, other.kind())),
        }
    }
}

fn write_utc_offset(f: &mut fmt::Formatter<'_>, seconds: i32) -> fmt::Result {
    let sign = if seconds < 0 { '-' } else { '+' };
    let magnitude = seconds.unsigned_abs();
    write!(f, "{sign}{:02}{:02}", magnitude / 3600, magnitude % 3600 / 60)?;
    if magnitude % 60 != 0 {
        write!(f, "{:02}", magnitude % 60)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary(s)
            | Self::CalAddress(s)
            | Self::Uri(s)
            | Self::Attach(s)
            | Self::Query(s)
            | Self::String(s)
            | Self::X(s) => f.write_str(s),
            Self::Text(s) => f.write_str(&escape_text(s)),
            Self::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Self::Date(t) | Self::DateTime(t) | Self::DateTimeDate(t) => write!(f, "{t}"),
            Self::DateTimePeriod(p) if p.end.is_null() && p.duration.is_zero() => {
                write!(f, "{}", p.start)
            }
            Self::Period(p) | Self::DateTimePeriod(p) => write!(f, "{p}"),
            Self::Duration(d) => write!(f, "{d}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Geo { lat, lon } => write!(f, "{lat};{lon}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Recur(rule) => write!(f, "{rule}"),
            Self::Time(t) => {
                write!(f, "{:02}{:02}{:02}", t.hour, t.minute, t.second)?;
                if t.is_utc() {
                    f.write_str("Z")?;
                }
                Ok(())
            }
            Self::UtcOffset(seconds) => write_utc_offset(f, *seconds),
            Self::Method(m) => f.write_str(m.as_str()),
            Self::Status(s) => f.write_str(s.as_str()),
        }
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
