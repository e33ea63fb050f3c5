//! DURATION values (RFC 5545 §3.3.6).

use std::fmt;
use std::str::FromStr;

use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::parse::{ParseError, values};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;

/// A signed span of nominal time.
///
/// Components are stored as written; [`Duration::normalized`] folds a
/// seconds-only value into larger units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Duration {
    pub negative: bool,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Duration {
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            negative: false,
            weeks: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    #[must_use]
    pub const fn weeks(weeks: u32) -> Self {
        Self {
            weeks,
            ..Self::zero()
        }
    }

    #[must_use]
    pub const fn days(days: u32) -> Self {
        Self {
            days,
            ..Self::zero()
        }
    }

    #[must_use]
    pub const fn hours(hours: u32) -> Self {
        Self {
            hours,
            ..Self::zero()
        }
    }

    #[must_use]
    pub const fn minutes(minutes: u32) -> Self {
        Self {
            minutes,
            ..Self::zero()
        }
    }

    #[must_use]
    pub const fn seconds(seconds: u32) -> Self {
        Self {
            seconds,
            ..Self::zero()
        }
    }

    #[must_use]
    pub const fn negate(mut self) -> Self {
        self.negative = !self.negative;
        self
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.weeks == 0 && self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    /// The longest duration the fields can hold.
    #[must_use]
    pub const fn longest() -> Self {
        Self {
            negative: false,
            weeks: u32::MAX,
            days: 6,
            hours: 23,
            minutes: 59,
            seconds: 59,
        }
    }

    /// ## Summary
    /// Builds a duration of `n` seconds. The magnitude stays in the seconds
    /// field unless it does not fit, in which case it is split into weeks,
    /// days, hours, minutes and seconds. Magnitudes beyond
    /// [`Duration::longest`] saturate; see [`Duration::try_from_seconds`].
    #[must_use]
    pub fn from_seconds(n: i64) -> Self {
        let mut d = exact(n.unsigned_abs()).unwrap_or_else(Self::longest);
        d.negative = n < 0;
        d
    }

    /// ## Summary
    /// Builds a duration of exactly `n` seconds.
    ///
    /// ## Errors
    /// Returns a bad-argument error when `n` is longer than
    /// [`Duration::longest`].
    pub fn try_from_seconds(n: i64) -> RfcResult<Self> {
        let Some(mut d) = exact(n.unsigned_abs()) else {
            return Err(RfcError::BadArg(format!("{n} seconds does not fit in a duration")).report());
        };
        d.negative = n < 0;
        Ok(d)
    }

    /// ## Summary
    /// Total length in seconds, counting a day as 86400 seconds.
    #[must_use]
    pub fn as_seconds(&self) -> i64 {
        let total = u64::from(self.weeks) * WEEK
            + u64::from(self.days) * DAY
            + u64::from(self.hours) * HOUR
            + u64::from(self.minutes) * MINUTE
            + u64::from(self.seconds);
        let total = i64::try_from(total).unwrap_or(i64::MAX);
        if self.negative { -total } else { total }
    }

    /// ## Summary
    /// Returns an equivalent duration spread over weeks (when the length is
    /// a whole number of weeks) or days, hours, minutes and seconds.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let Some(mut d) = split(self.as_seconds().unsigned_abs()) else {
            return *self;
        };
        d.negative = self.negative && !d.is_zero();
        d
    }

    pub(crate) const fn has_clock(&self) -> bool {
        self.hours != 0 || self.minutes != 0 || self.seconds != 0
    }
}

/// `magnitude` seconds, kept in the seconds field when it fits.
fn exact(magnitude: u64) -> Option<Duration> {
    match u32::try_from(magnitude) {
        Ok(seconds) => Some(Duration::seconds(seconds)),
        Err(_) => split(magnitude),
    }
}

/// Spreads `magnitude` seconds over the fields. Days spill into weeks only
/// when they overflow; `None` when even the weeks overflow.
fn split(magnitude: u64) -> Option<Duration> {
    if magnitude != 0 && magnitude % WEEK == 0 {
        return u32::try_from(magnitude / WEEK).ok().map(Duration::weeks);
    }
    let days = magnitude / DAY;
    let (weeks, days) = match u32::try_from(days) {
        Ok(days) => (0, days),
        Err(_) => (u32::try_from(days / 7).ok()?, u32::try_from(days % 7).ok()?),
    };
    Some(Duration {
        negative: false,
        weeks,
        days,
        hours: u32::try_from(magnitude % DAY / HOUR).ok()?,
        minutes: u32::try_from(magnitude % HOUR / MINUTE).ok()?,
        seconds: u32::try_from(magnitude % MINUTE).ok()?,
    })
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        if self.weeks > 0 {
            write!(f, "{}W", self.weeks)?;
        }
        if self.days > 0 {
            write!(f, "{}D", self.days)?;
        }
        if self.has_clock() {
            f.write_str("T")?;
            if self.hours > 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes > 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds > 0 {
                write!(f, "{}S", self.seconds)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        values::parse_duration(s).map_err(ParseError::report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_round_trip_keeps_sign() {
        for n in [0, 1, -1, 59, -3600, 86_400, 1_209_600, -31_536_000, i64::from(u32::MAX) + 7] {
            assert_eq!(Duration::from_seconds(n).as_seconds(), n, "n = {n}");
        }
    }

    #[test]
    fn large_magnitudes_round_trip() {
        for n in [400_000_000_000_000, -400_000_000_000_000, 370_000_000_000_001] {
            let d = Duration::from_seconds(n);
            assert_eq!(d.as_seconds(), n, "n = {n}");
            assert_eq!(Duration::try_from_seconds(n).unwrap(), d);
        }
        let d = Duration::from_seconds(400_000_000_000_000);
        assert!(d.weeks > 0 && d.days < 7);
        assert_eq!(
            Duration::from_seconds(400_000_000_000_000).normalized(),
            d
        );
    }

    #[test_log::test]
    fn unrepresentable_magnitudes_are_rejected() {
        almanac_core::error::clear_error();
        assert!(Duration::try_from_seconds(i64::MAX).is_err());
        assert!(Duration::try_from_seconds(i64::MIN).is_err());
        assert_eq!(
            almanac_core::error::last_error(),
            Some(almanac_core::error::ErrorKind::BadArg)
        );
        almanac_core::error::clear_error();

        let saturated = Duration::from_seconds(i64::MIN);
        assert!(saturated.negative);
        assert_eq!(saturated.weeks, u32::MAX);
        assert_eq!(Duration::longest().as_seconds(), i64::from(u32::MAX) * 604_800 + 604_799);
    }

    #[test]
    fn zero_renders_pt0s() {
        assert_eq!(Duration::zero().to_string(), "PT0S");
        assert_eq!(Duration::from_seconds(0).to_string(), "PT0S");
    }

    #[test]
    fn renders_components_in_order() {
        let d = Duration {
            negative: true,
            weeks: 0,
            days: 1,
            hours: 2,
            minutes: 0,
            seconds: 30,
        };
        assert_eq!(d.to_string(), "-P1DT2H30S");
        assert_eq!(Duration::weeks(3).to_string(), "P3W");
        assert_eq!(Duration::from_seconds(90).to_string(), "PT90S");
    }

    #[test]
    fn normalized_splits_seconds() {
        let d = Duration::from_seconds(-(86_400 + 3_661)).normalized();
        assert!(d.negative);
        assert_eq!((d.days, d.hours, d.minutes, d.seconds), (1, 1, 1, 1));
        assert_eq!(Duration::from_seconds(1_209_600).normalized(), Duration::weeks(2));
    }

    #[test]
    fn parses_through_from_str() {
        let d: Duration = "-P1DT2H".parse().unwrap();
        assert_eq!(d.as_seconds(), -(86_400 + 7_200));
        assert!("P1H".parse::<Duration>().is_err());
    }
}
