//! PERIOD values (RFC 5545 §3.3.9).

use std::fmt;
use std::str::FromStr;

use super::{Duration, Time};
use crate::error::RfcResult;
use crate::rfc::ical::parse::{ParseError, values};

/// A span given by its start and either an explicit end or a duration.
///
/// Exactly one of `end` and `duration` is live; the other holds its null
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Period {
    pub start: Time,
    pub end: Time,
    pub duration: Duration,
}

impl Period {
    #[must_use]
    pub const fn null_period() -> Self {
        Self {
            start: Time::null_time(),
            end: Time::null_time(),
            duration: Duration::zero(),
        }
    }

    #[must_use]
    pub const fn explicit(start: Time, end: Time) -> Self {
        Self {
            start,
            end,
            duration: Duration::zero(),
        }
    }

    #[must_use]
    pub const fn with_duration(start: Time, duration: Duration) -> Self {
        Self {
            start,
            end: Time::null_time(),
            duration,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.start.is_null()
    }

    /// Returns whether the start is valid and an end or a duration is set.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.start.is_valid() && (self.end.is_valid() || !self.duration.is_zero())
    }

    /// ## Summary
    /// Returns the explicit end, or the start advanced by the duration.
    ///
    /// ## Errors
    /// Fails when the duration has a clock part and the start is a date.
    pub fn end_time(&self) -> RfcResult<Time> {
        if self.end.is_null() {
            self.start.add(&self.duration)
        } else {
            Ok(self.end)
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.end.is_null() {
            write!(f, "{}/{}", self.start, self.duration)
        } else {
            write!(f, "{}/{}", self.start, self.end)
        }
    }
}

impl FromStr for Period {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        values::parse_period(s).map_err(ParseError::report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_live_side_only() {
        let p: Period = "20240101T090000Z/PT1H".parse().unwrap();
        assert_eq!(p.to_string(), "20240101T090000Z/PT1H");
        let p: Period = "20240101T090000Z/20240101T100000Z".parse().unwrap();
        assert_eq!(p.to_string(), "20240101T090000Z/20240101T100000Z");
    }

    #[test]
    fn end_time_from_duration() {
        let p: Period = "20240101T233000Z/PT1H".parse().unwrap();
        assert_eq!(p.end_time().unwrap().to_string(), "20240102T003000Z");
    }

    #[test]
    fn validity() {
        assert!(Period::null_period().is_null());
        assert!(!Period::null_period().is_valid());
        let p: Period = "20240101T090000Z/P1D".parse().unwrap();
        assert!(p.is_valid());
    }
}
