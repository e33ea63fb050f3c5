//! Calendar systems for RSCALE (RFC 7529).
//!
//! The iterator reaches month lengths, year lengths and weekdays through
//! [`CalendarBackend`] so that a non-Gregorian scale can be plugged in
//! without touching the expansion logic. Only the Gregorian scale ships.

use std::fmt;

use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::core::{
    Weekday, civil_from_days, days_from_civil, days_in_month, days_in_year, ordinal_of,
    weekday_of,
};

/// A date in the backend's own calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    pub year: i32,
    pub month: i32,
    /// Set for the leap month of a lunisolar year.
    pub leap_month: bool,
    pub day: i32,
}

impl CalendarDate {
    #[must_use]
    pub const fn new(year: i32, month: i32, day: i32) -> Self {
        Self {
            year,
            month,
            leap_month: false,
            day,
        }
    }
}

/// Calendar arithmetic needed by recurrence expansion.
pub trait CalendarBackend: Send + Sync + fmt::Debug {
    /// RSCALE name, upper case.
    fn scale(&self) -> &'static str;

    fn supports(&self, scale: &str) -> bool {
        self.scale().eq_ignore_ascii_case(scale)
    }

    fn months_in_year(&self, year: i32) -> i32;

    /// Length of a month, or `None` when the month does not occur in
    /// `year` (a leap month in a common year).
    fn days_in_month(&self, year: i32, month: i32, leap_month: bool) -> Option<i32>;

    fn days_in_year(&self, year: i32) -> i32;

    fn day_of_year(&self, date: CalendarDate) -> i32;

    /// Date on ordinal `doy` of `year`; ordinals outside the year roll
    /// into the neighbouring years.
    fn from_day_of_year(&self, year: i32, doy: i32) -> CalendarDate;

    fn weekday(&self, date: CalendarDate) -> Weekday;

    /// `(year, month, day)` in the Gregorian calendar.
    fn to_gregorian(&self, date: CalendarDate) -> (i32, i32, i32);

    fn from_gregorian(&self, year: i32, month: i32, day: i32) -> CalendarDate;

    /// Months elapsed since a fixed epoch, for month arithmetic.
    fn month_ordinal(&self, year: i32, month: i32, leap_month: bool) -> i64;

    /// Inverse of [`CalendarBackend::month_ordinal`]: `(year, month, leap)`.
    fn from_month_ordinal(&self, ordinal: i64) -> (i32, i32, bool);
}

/// The proleptic Gregorian calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct GregorianBackend;

impl CalendarBackend for GregorianBackend {
    fn scale(&self) -> &'static str {
        "GREGORIAN"
    }

    fn months_in_year(&self, _year: i32) -> i32 {
        12
    }

    fn days_in_month(&self, year: i32, month: i32, leap_month: bool) -> Option<i32> {
        (!leap_month && (1..=12).contains(&month)).then(|| days_in_month(month, year))
    }

    fn days_in_year(&self, year: i32) -> i32 {
        days_in_year(year)
    }

    fn day_of_year(&self, date: CalendarDate) -> i32 {
        ordinal_of(date.year, date.month, date.day)
    }

    fn from_day_of_year(&self, year: i32, doy: i32) -> CalendarDate {
        let (y, m, d) = civil_from_days(days_from_civil(year, 1, 1) + i64::from(doy) - 1);
        CalendarDate::new(y, m, d)
    }

    fn weekday(&self, date: CalendarDate) -> Weekday {
        Weekday::from_number(weekday_of(date.year, date.month, date.day))
    }

    fn to_gregorian(&self, date: CalendarDate) -> (i32, i32, i32) {
        (date.year, date.month, date.day)
    }

    fn from_gregorian(&self, year: i32, month: i32, day: i32) -> CalendarDate {
        CalendarDate::new(year, month, day)
    }

    fn month_ordinal(&self, year: i32, month: i32, _leap_month: bool) -> i64 {
        i64::from(year) * 12 + i64::from(month) - 1
    }

    fn from_month_ordinal(&self, ordinal: i64) -> (i32, i32, bool) {
        let year = i32::try_from(ordinal.div_euclid(12)).unwrap_or(i32::MAX);
        let month = i32::try_from(ordinal.rem_euclid(12)).unwrap_or(0) + 1;
        (year, month, false)
    }
}

static GREGORIAN: GregorianBackend = GregorianBackend;

static BACKENDS: &[&dyn CalendarBackend] = &[&GREGORIAN];

/// ## Summary
/// Returns the backend for an RSCALE name; `None` selects Gregorian.
///
/// ## Errors
/// Returns an unimplemented error for a scale no backend supports.
pub fn backend_for(rscale: Option<&str>) -> RfcResult<&'static dyn CalendarBackend> {
    let Some(scale) = rscale else {
        return Ok(&GREGORIAN);
    };
    BACKENDS
        .iter()
        .copied()
        .find(|backend| backend.supports(scale))
        .ok_or_else(|| {
            RfcError::Unimplemented(format!("calendar scale {scale} is not supported")).report()
        })
}

/// RSCALE names with a backend.
#[must_use]
pub fn supported_calendars() -> Vec<&'static str> {
    BACKENDS.iter().map(|backend| backend.scale()).collect()
}

#[cfg(test)]
mod tests {
    use almanac_core::error::{ErrorKind, clear_error, last_error};

    use super::*;

    #[test]
    fn gregorian_is_the_default() {
        assert_eq!(backend_for(None).unwrap().scale(), "GREGORIAN");
        assert_eq!(backend_for(Some("gregorian")).unwrap().scale(), "GREGORIAN");
        assert_eq!(supported_calendars(), ["GREGORIAN"]);
    }

    #[test_log::test]
    fn other_scales_are_unimplemented() {
        clear_error();
        let err = backend_for(Some("CHINESE")).unwrap_err();
        assert!(matches!(err, RfcError::Unimplemented(_)));
        assert_eq!(last_error(), Some(ErrorKind::Unimplemented));
        clear_error();
    }

    #[test]
    fn gregorian_fields() {
        let g = GregorianBackend;
        assert_eq!(g.days_in_month(2024, 2, false), Some(29));
        assert_eq!(g.days_in_month(2023, 2, false), Some(28));
        assert_eq!(g.days_in_month(2024, 5, true), None);
        assert_eq!(g.days_in_year(2100), 365);
        assert_eq!(g.day_of_year(CalendarDate::new(2024, 12, 31)), 366);
        assert_eq!(g.from_day_of_year(2024, 0), CalendarDate::new(2023, 12, 31));
        assert_eq!(g.from_day_of_year(2023, 366), CalendarDate::new(2024, 1, 1));
        assert_eq!(g.weekday(CalendarDate::new(2024, 2, 29)), Weekday::Thursday);
    }

    #[test]
    fn month_ordinals_round_trip() {
        let g = GregorianBackend;
        let ordinal = g.month_ordinal(2024, 12, false);
        assert_eq!(g.from_month_ordinal(ordinal), (2024, 12, false));
        assert_eq!(g.from_month_ordinal(ordinal + 1), (2025, 1, false));
        assert_eq!(g.from_month_ordinal(ordinal - 12), (2023, 12, false));
    }
}
