//! iCalendar DATE / DATE-TIME values and calendar arithmetic
//! (RFC 5545 §3.3.4, §3.3.5).
//!
//! All calendar math is proleptic Gregorian and done field by field;
//! `chrono-tz` is consulted only to translate between a zone's wall clock
//! and UTC.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, LocalResult, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;

use super::Duration;
use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::parse::{ParseError, ParseErrorKind, values};

const SECONDS_PER_DAY: i64 = 86_400;

/// Where a time is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// No zone: the same wall clock everywhere.
    #[default]
    Floating,
    Utc,
    Tz(Tz),
}

impl Zone {
    /// Resolves an IANA zone identifier; `UTC` maps to [`Zone::Utc`].
    #[must_use]
    pub fn from_tzid(tzid: &str) -> Option<Self> {
        if tzid.eq_ignore_ascii_case("UTC") || tzid == "Etc/UTC" {
            return Some(Self::Utc);
        }
        tzid.parse::<Tz>().ok().map(Self::Tz)
    }

    #[must_use]
    pub fn tzid(self) -> Option<&'static str> {
        match self {
            Self::Floating => None,
            Self::Utc => Some("UTC"),
            Self::Tz(tz) => Some(tz.name()),
        }
    }
}

/// Returns whether `year` has a February 29.
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[must_use]
pub const fn days_in_year(year: i32) -> i32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// ## Summary
/// Returns the length of `month` in `year`. Out-of-range months report 30
/// so that arithmetic on garbage input terminates.
#[must_use]
pub const fn days_in_month(month: i32, year: i32) -> i32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// Days since 1970-01-01 of a proleptic Gregorian date.
#[must_use]
pub fn days_from_civil(year: i32, month: i32, day: i32) -> i64 {
    let y = i64::from(year) - i64::from(month <= 2);
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = i64::from((month + 9) % 12);
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`days_from_civil`]: `(year, month, day)`.
#[must_use]
pub fn civil_from_days(days: i64) -> (i32, i32, i32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (narrow(year), narrow(month), narrow(day))
}

fn narrow(v: i64) -> i32 {
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}

/// Weekday of a date, 1 = Sunday .. 7 = Saturday.
#[must_use]
pub fn weekday_of(year: i32, month: i32, day: i32) -> i32 {
    // 1970-01-01 was a Thursday.
    narrow((days_from_civil(year, month, day) + 4).rem_euclid(7)) + 1
}

/// Ordinal day of a date, 1-based.
#[must_use]
pub fn ordinal_of(year: i32, month: i32, day: i32) -> i32 {
    narrow(days_from_civil(year, month, day) - days_from_civil(year, 1, 1)) + 1
}

fn local_to_utc(tz: Tz, local: i64) -> i64 {
    let Some(naive) = DateTime::from_timestamp(local, 0).map(|d| d.naive_utc()) else {
        return local;
    };
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.timestamp(),
        // Inside a gap: keep the offset in force just before it. A day
        // earlier is before the transition whatever side of UTC the zone is.
        LocalResult::None => {
            let before = naive.checked_sub_signed(TimeDelta::days(1)).unwrap_or(naive);
            let offset = tz.offset_from_utc_datetime(&before).fix().local_minus_utc();
            local - i64::from(offset)
        }
    }
}

fn utc_to_local(tz: Tz, utc: i64) -> i64 {
    let Some(dt) = DateTime::from_timestamp(utc, 0) else {
        return utc;
    };
    let offset = tz
        .offset_from_utc_datetime(&dt.naive_utc())
        .fix()
        .local_minus_utc();
    utc + i64::from(offset)
}

/// A calendar date or date-time.
///
/// Fields are plain integers so that arithmetic can overshoot and be
/// brought back with [`Time::normalize`]. When `is_date` is set the clock
/// fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Time {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    pub is_date: bool,
    pub zone: Zone,
}

impl Time {
    /// The all-zero sentinel.
    #[must_use]
    pub const fn null_time() -> Self {
        Self {
            year: 0,
            month: 0,
            day: 0,
            hour: 0,
            minute: 0,
            second: 0,
            is_date: false,
            zone: Zone::Floating,
        }
    }

    #[must_use]
    pub const fn null_date() -> Self {
        let mut t = Self::null_time();
        t.is_date = true;
        t
    }

    #[must_use]
    pub const fn date(year: i32, month: i32, day: i32) -> Self {
        Self {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            is_date: true,
            zone: Zone::Floating,
        }
    }

    #[must_use]
    pub const fn date_time(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            is_date: false,
            zone: Zone::Floating,
        }
    }

    #[must_use]
    pub const fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.year == 0
            && self.month == 0
            && self.day == 0
            && self.hour == 0
            && self.minute == 0
            && self.second == 0
    }

    #[must_use]
    pub const fn is_date(&self) -> bool {
        self.is_date
    }

    #[must_use]
    pub const fn is_utc(&self) -> bool {
        matches!(self.zone, Zone::Utc)
    }

    /// ## Summary
    /// Returns whether every field lies in its calendar range and the year
    /// is within 0..=3000.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        if self.year < 0 || self.year > 3000 {
            return false;
        }
        if self.month < 1 || self.month > 12 {
            return false;
        }
        if self.day < 1 || self.day > days_in_month(self.month, self.year) {
            return false;
        }
        self.is_date
            || (self.hour >= 0
                && self.hour <= 23
                && self.minute >= 0
                && self.minute <= 59
                && self.second >= 0
                && self.second <= 60)
    }

    /// Weekday, 1 = Sunday .. 7 = Saturday.
    #[must_use]
    pub fn day_of_week(&self) -> i32 {
        weekday_of(self.year, self.month, self.day)
    }

    #[must_use]
    pub fn day_of_year(&self) -> i32 {
        ordinal_of(self.year, self.month, self.day)
    }

    /// ## Summary
    /// Returns the day of the year on which the week containing this date
    /// starts, for weeks beginning on `first_dow` (1 = Sunday). May be
    /// zero or negative when that week began in the previous year.
    #[must_use]
    pub fn start_doy_week(&self, first_dow: i32) -> i32 {
        let delta = (self.day_of_week() - first_dow).rem_euclid(7);
        self.day_of_year() - delta
    }

    /// Sunday-based week of the year, 0 for days before the first Sunday.
    #[must_use]
    pub fn week_number(&self) -> i32 {
        (self.day_of_year() - (self.day_of_week() - 1)) / 7
    }

    /// ## Summary
    /// Builds the date on ordinal day `doy` of `year`. Ordinals outside
    /// the year roll into the neighbouring years.
    #[must_use]
    pub fn from_day_of_year(doy: i32, year: i32) -> Self {
        let days = days_from_civil(year, 1, 1) + i64::from(doy) - 1;
        let (y, m, d) = civil_from_days(days);
        Self::date(y, m, d)
    }

    pub(crate) fn wall_seconds(&self) -> i64 {
        let days = days_from_civil(self.year, self.month, self.day);
        let clock = if self.is_date {
            0
        } else {
            i64::from(self.hour) * 3600 + i64::from(self.minute) * 60 + i64::from(self.second)
        };
        days * SECONDS_PER_DAY + clock
    }

    pub(crate) fn from_wall_seconds(wall: i64, is_date: bool, zone: Zone) -> Self {
        let (year, month, day) = civil_from_days(wall.div_euclid(SECONDS_PER_DAY));
        let clock = wall.rem_euclid(SECONDS_PER_DAY);
        let mut t = Self::date(year, month, day).with_zone(zone);
        t.is_date = is_date;
        if !is_date {
            t.hour = narrow(clock / 3600);
            t.minute = narrow(clock % 3600 / 60);
            t.second = narrow(clock % 60);
        }
        t
    }

    /// ## Summary
    /// Converts to seconds since the Unix epoch. Floating times and dates
    /// are read as UTC; the null time converts to 0.
    #[must_use]
    pub fn to_epoch_seconds(&self) -> i64 {
        if self.is_null() {
            return 0;
        }
        let t = self.normalize();
        let wall = t.wall_seconds();
        match t.zone {
            Zone::Tz(tz) if !t.is_date => local_to_utc(tz, wall),
            _ => wall,
        }
    }

    /// Builds the time at epoch second `t`, expressed in `zone`.
    #[must_use]
    pub fn from_epoch_seconds(t: i64, is_date: bool, zone: Zone) -> Self {
        let wall = match zone {
            Zone::Tz(tz) => utc_to_local(tz, t),
            Zone::Floating | Zone::Utc => t,
        };
        Self::from_wall_seconds(wall, is_date, zone)
    }

    /// ## Summary
    /// Shifts the time by the given amounts, carrying each field into the
    /// next larger unit. Dates ignore the clock arguments.
    pub fn adjust(&mut self, days: i64, hours: i64, minutes: i64, seconds: i64) {
        let mut overflow_days = 0;
        if !self.is_date {
            let second = i64::from(self.second) + seconds;
            let minute = i64::from(self.minute) + minutes + second.div_euclid(60);
            let hour = i64::from(self.hour) + hours + minute.div_euclid(60);
            self.second = narrow(second.rem_euclid(60));
            self.minute = narrow(minute.rem_euclid(60));
            self.hour = narrow(hour.rem_euclid(24));
            overflow_days = hour.div_euclid(24);
        }

        let month0 = i64::from(self.month) - 1;
        self.year = narrow(i64::from(self.year) + month0.div_euclid(12));
        self.month = narrow(month0.rem_euclid(12)) + 1;

        let mut day = i64::from(self.day) + days + overflow_days;
        if day > 0 {
            loop {
                let length = i64::from(days_in_month(self.month, self.year));
                if day <= length {
                    break;
                }
                day -= length;
                self.month += 1;
                if self.month > 12 {
                    self.year += 1;
                    self.month = 1;
                }
            }
        } else {
            while day <= 0 {
                if self.month == 1 {
                    self.year -= 1;
                    self.month = 12;
                } else {
                    self.month -= 1;
                }
                day += i64::from(days_in_month(self.month, self.year));
            }
        }
        self.day = narrow(day);
    }

    /// ## Summary
    /// Returns the time with every field folded into range.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let mut t = *self;
        if !t.is_null() {
            t.adjust(0, 0, 0, 0);
        }
        t
    }

    /// ## Summary
    /// Orders two times. When both carry a zone and the zones differ, both
    /// are compared in UTC. A date sorts before a date-time on the same
    /// day.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        let (a, b) = if self.zone != other.zone
            && self.zone != Zone::Floating
            && other.zone != Zone::Floating
        {
            (self.convert_to_zone(Zone::Utc), other.convert_to_zone(Zone::Utc))
        } else {
            (*self, *other)
        };

        a.year
            .cmp(&b.year)
            .then(a.month.cmp(&b.month))
            .then(a.day.cmp(&b.day))
            .then_with(|| match (a.is_date, b.is_date) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => a
                    .hour
                    .cmp(&b.hour)
                    .then(a.minute.cmp(&b.minute))
                    .then(a.second.cmp(&b.second)),
            })
    }

    /// Orders two times by calendar day only, after aligning zones.
    #[must_use]
    pub fn compare_date_only(&self, other: &Self) -> Ordering {
        let (a, b) = if self.zone == other.zone {
            (*self, *other)
        } else {
            (self.convert_to_zone(Zone::Utc), other.convert_to_zone(Zone::Utc))
        };
        a.year
            .cmp(&b.year)
            .then(a.month.cmp(&b.month))
            .then(a.day.cmp(&b.day))
    }

    /// ## Summary
    /// Expresses this time in `zone`. Dates are returned unchanged;
    /// floating times and targets keep their wall clock and only change
    /// the zone.
    #[must_use]
    pub fn convert_to_zone(&self, zone: Zone) -> Self {
        if self.is_date || self.zone == zone {
            return *self;
        }
        if self.zone == Zone::Floating || zone == Zone::Floating {
            return self.with_zone(zone);
        }
        Self::from_epoch_seconds(self.to_epoch_seconds(), false, zone)
    }

    /// Replaces the zone without moving the wall clock.
    pub fn set_zone(&mut self, zone: Zone) {
        self.zone = zone;
    }

    fn zone_offset(&self) -> i64 {
        match self.zone {
            Zone::Tz(tz) if !self.is_date => {
                let wall = self.wall_seconds();
                wall - local_to_utc(tz, wall)
            }
            _ => 0,
        }
    }

    /// ## Summary
    /// Adds a duration. Days and weeks move the calendar date; the clock
    /// part is then applied as exact time, compensating for any offset
    /// change of the zone in between.
    ///
    /// ## Errors
    /// Returns a malformed-data error when the duration has a clock part
    /// and this time is a date.
    pub fn add(&self, duration: &Duration) -> RfcResult<Self> {
        let clock = i64::from(duration.hours) * 3600
            + i64::from(duration.minutes) * 60
            + i64::from(duration.seconds);
        if self.is_date && clock != 0 {
            return Err(RfcError::from(
                ParseError::new(ParseErrorKind::IncompatibleTimes, 0)
                    .with_context("cannot add a time duration to a date"),
            )
            .report());
        }

        let sign = if duration.negative { -1 } else { 1 };
        let days = i64::from(duration.days) + i64::from(duration.weeks) * 7;

        let mut t = *self;
        t.adjust(sign * days, 0, 0, 0);
        let day_offset = t.zone_offset();
        t.adjust(0, 0, 0, sign * clock);
        let shift = t.zone_offset() - day_offset;
        if shift != 0 {
            t.adjust(0, 0, 0, shift);
        }
        Ok(t)
    }

    /// ## Summary
    /// Returns `self - other`. Dates subtract to whole days; date-times to
    /// exact seconds.
    ///
    /// ## Errors
    /// Returns a malformed-data error when one operand is a date and the
    /// other a date-time.
    pub fn subtract(&self, other: &Self) -> RfcResult<Duration> {
        if self.is_date != other.is_date {
            return Err(RfcError::from(
                ParseError::new(ParseErrorKind::IncompatibleTimes, 0)
                    .with_context("cannot subtract a date and a date-time"),
            )
            .report());
        }
        let delta = self.to_epoch_seconds() - other.to_epoch_seconds();
        if self.is_date {
            let days = delta / SECONDS_PER_DAY;
            let mut d = Duration::days(u32::try_from(days.unsigned_abs()).unwrap_or(u32::MAX));
            d.negative = days < 0;
            return Ok(d);
        }
        Duration::try_from_seconds(delta)
    }

    /// ## Summary
    /// Renders the ISO 8601 extended form, `YYYY-MM-DD` or
    /// `YYYY-MM-DDTHH:MM:SS[Z]`.
    #[must_use]
    pub fn as_iso_string(&self) -> String {
        if self.is_date {
            format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
        } else {
            format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}",
                self.year,
                self.month,
                self.day,
                self.hour,
                self.minute,
                self.second,
                if self.is_utc() { "Z" } else { "" }
            )
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)?;
        if !self.is_date {
            write!(f, "T{:02}{:02}{:02}", self.hour, self.minute, self.second)?;
            if self.is_utc() {
                f.write_str("Z")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Time {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        values::parse_date_time(s).map_err(ParseError::report)
    }
}

/// A busy/free interval in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: i64,
    pub end: i64,
    pub is_busy: bool,
}

impl TimeSpan {
    /// ## Summary
    /// Builds the span covered by `start .. end`. A null end makes a
    /// date-time span empty and a date span last the whole day; date
    /// spans run to the last second of their final day.
    #[must_use]
    pub fn new(start: &Time, end: &Time, is_busy: bool) -> Self {
        let begin = start.to_epoch_seconds();
        if end.is_null() && !start.is_date {
            return Self {
                start: begin,
                end: begin,
                is_busy,
            };
        }
        let last = if end.is_null() { start } else { end };
        let mut finish = last.to_epoch_seconds();
        if start.is_date {
            finish += SECONDS_PER_DAY - 1;
        }
        Self {
            start: begin,
            end: finish,
            is_busy,
        }
    }

    /// Returns whether the spans share any instant, or are identical.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let inside = |t: i64, s: &Self| t > s.start && t < s.end;
        inside(self.start, other)
            || inside(self.end, other)
            || inside(other.start, self)
            || inside(other.end, self)
            || (self.start == other.start && self.end == other.end)
    }

    /// Returns whether this span starts within `container`.
    #[must_use]
    pub const fn contains(&self, container: &Self) -> bool {
        self.start >= container.start && self.start < container.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Time {
        s.parse().expect("valid time")
    }

    #[test]
    fn civil_round_trip() {
        for days in [-800_000, -1, 0, 1, 19_782, 2_932_896] {
            let (y, m, d) = civil_from_days(days);
            assert_eq!(days_from_civil(y, m, d), days);
        }
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(civil_from_days(19_723), (2024, 1, 1));
    }

    #[test]
    fn weekday_and_ordinal() {
        assert_eq!(Time::date(2024, 1, 1).day_of_week(), 2);
        assert_eq!(Time::date(2023, 12, 31).day_of_week(), 1);
        assert_eq!(Time::date(2024, 12, 31).day_of_year(), 366);
        assert_eq!(Time::date(2023, 3, 1).day_of_year(), 60);
    }

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
        assert_eq!(days_in_month(2, 2023), 28);
        assert_eq!(days_in_month(2, 2024), 29);
        assert_eq!(days_in_month(13, 2024), 30);
    }

    #[test]
    fn from_day_of_year_rolls_over() {
        assert_eq!(Time::from_day_of_year(60, 2024), Time::date(2024, 2, 29));
        assert_eq!(Time::from_day_of_year(0, 2024), Time::date(2023, 12, 31));
        assert_eq!(Time::from_day_of_year(367, 2024), Time::date(2025, 1, 1));
    }

    #[test]
    fn start_of_week() {
        // 2024-01-03 is a Wednesday; the Monday-based week began on doy 1.
        assert_eq!(Time::date(2024, 1, 3).start_doy_week(2), 1);
        // Sunday-based week began on 2023-12-31.
        assert_eq!(Time::date(2024, 1, 3).start_doy_week(1), 0);
    }

    #[test]
    fn normalize_carries_every_field() {
        let raw = Time::date_time(2023, 14, 35, 25, 61, 61);
        let n = raw.normalize();
        assert_eq!(n, Time::date_time(2024, 3, 7, 2, 2, 1));
        assert_eq!(n.normalize(), n);
    }

    #[test]
    fn normalize_negative_fields() {
        let raw = Time::date_time(2024, 1, 1, 0, 0, -1);
        assert_eq!(raw.normalize(), Time::date_time(2023, 12, 31, 23, 59, 59));
        let raw = Time::date_time(2024, 3, 0, 12, 0, 0);
        assert_eq!(raw.normalize(), Time::date_time(2024, 2, 29, 12, 0, 0));
    }

    #[test]
    fn leap_day_plus_a_year_of_seconds() {
        let leap = Time::date_time(2024, 2, 29, 0, 0, 0);
        let later = leap.add(&Duration::from_seconds(365 * 86_400)).expect("add");
        assert_eq!(later, Time::date_time(2025, 2, 28, 0, 0, 0));
        assert!(later.is_valid());
    }

    #[test]
    fn adding_clock_to_date_is_malformed() {
        let d = Time::date(2024, 1, 1);
        assert!(d.add(&Duration::hours(1)).is_err());
        assert_eq!(d.add(&Duration::days(3)).expect("add"), Time::date(2024, 1, 4));
    }

    #[test]
    fn add_across_dst_is_exact() {
        let ny = Zone::from_tzid("America/New_York").expect("zone");
        let start = Time::date_time(2024, 3, 10, 0, 0, 0).with_zone(ny);
        let later = start.add(&Duration::hours(3)).expect("add");
        assert_eq!(later.hour, 4);
        assert_eq!(later.to_epoch_seconds() - start.to_epoch_seconds(), 3 * 3600);
    }

    #[test]
    fn gap_times_use_the_offset_before_the_gap() {
        let gaps = [
            ("America/New_York", 3, 10),
            ("Europe/Paris", 3, 31),
            ("Australia/Sydney", 10, 6),
        ];
        for (tzid, month, day) in gaps {
            let zone = Zone::from_tzid(tzid).expect("zone");
            let gap = Time::date_time(2024, month, day, 2, 30, 0).with_zone(zone);
            let resolved = Time::from_epoch_seconds(gap.to_epoch_seconds(), false, zone);
            assert_eq!((resolved.hour, resolved.minute), (3, 30), "zone {tzid}");
        }
        let paris = Zone::from_tzid("Europe/Paris").expect("zone");
        let gap = Time::date_time(2024, 3, 31, 2, 30, 0).with_zone(paris);
        assert_eq!(gap.to_epoch_seconds(), 1_711_848_600);
    }

    #[test]
    fn subtract_kinds() {
        let a = t("20240305");
        let b = t("20240301");
        assert_eq!(a.subtract(&b).expect("dates").to_string(), "P4D");
        let x = t("20240101T120000Z");
        let y = t("20240101T100000Z");
        assert_eq!(x.subtract(&y).expect("times").as_seconds(), 7200);
        assert!(a.subtract(&x).is_err());
    }

    #[test]
    fn compare_date_before_date_time() {
        let date = t("20240101");
        let dt = t("20240101T000000");
        assert_eq!(date.compare(&dt), Ordering::Less);
        assert_eq!(dt.compare(&date), Ordering::Greater);
        assert_eq!(date.compare_date_only(&dt), Ordering::Equal);
    }

    #[test]
    fn compare_across_zones() {
        let paris = Zone::from_tzid("Europe/Paris").expect("zone");
        let local = Time::date_time(2024, 6, 1, 12, 0, 0).with_zone(paris);
        let utc = t("20240601T100000Z");
        assert_eq!(local.compare(&utc), Ordering::Equal);
        assert_eq!(local.convert_to_zone(Zone::Utc), utc);
    }

    #[test]
    fn epoch_round_trip() {
        let time = t("20240229T235959Z");
        let secs = time.to_epoch_seconds();
        assert_eq!(secs, 1_709_251_199);
        assert_eq!(Time::from_epoch_seconds(secs, false, Zone::Utc), time);
        assert_eq!(Time::null_time().to_epoch_seconds(), 0);
    }

    #[test]
    fn floating_converts_without_shift() {
        let floating = t("20240101T090000");
        let utc = floating.convert_to_zone(Zone::Utc);
        assert_eq!(utc.hour, 9);
        assert!(utc.is_utc());
    }

    #[test]
    fn null_and_valid() {
        assert!(Time::null_time().is_null());
        assert!(Time::null_date().is_null());
        assert!(!Time::null_time().is_valid());
        assert!(Time::date(2024, 2, 29).is_valid());
        assert!(!Time::date(2023, 2, 29).is_valid());
        assert!(!Time::date(3001, 1, 1).is_valid());
    }

    #[test]
    fn renders_basic_and_extended() {
        let time = t("2024-07-04T12:30:00Z");
        assert_eq!(time.to_string(), "20240704T123000Z");
        assert_eq!(time.as_iso_string(), "2024-07-04T12:30:00Z");
        assert_eq!(t("20240704").as_iso_string(), "2024-07-04");
    }

    #[test]
    fn spans() {
        let a = TimeSpan::new(&t("20240101T090000Z"), &t("20240101T100000Z"), true);
        let b = TimeSpan::new(&t("20240101T093000Z"), &t("20240101T110000Z"), true);
        let c = TimeSpan::new(&t("20240101T100000Z"), &t("20240101T110000Z"), false);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(b.contains(&a));
        assert!(!c.contains(&a));

        let day = TimeSpan::new(&t("20240101"), &Time::null_time(), true);
        assert_eq!(day.end - day.start, SECONDS_PER_DAY - 1);
        let instant = TimeSpan::new(&t("20240101T090000Z"), &Time::null_time(), true);
        assert_eq!(instant.start, instant.end);
    }

    #[test]
    fn zone_lookup() {
        assert_eq!(Zone::from_tzid("UTC"), Some(Zone::Utc));
        assert_eq!(
            Zone::from_tzid("Europe/Berlin").and_then(Zone::tzid),
            Some("Europe/Berlin")
        );
        assert_eq!(Zone::from_tzid("Mars/Olympus"), None);
    }
}
