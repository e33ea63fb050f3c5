//! RECUR values (RFC 5545 §3.3.10, RFC 7529).

use std::fmt;
use std::str::FromStr;

use almanac_core::config::{ByRulePolicy, RecurrenceConfig};
use almanac_core::constants::MAX_SUPPORTED_YEAR;

use super::Time;
use crate::rfc::ical::parse::{ParseError, recur};

/// Flag or-ed into a BYMONTH entry for an RFC 7529 leap month (`5L`).
pub const LEAP_MONTH: i16 = 0x1000;

/// Recurrence frequency, finest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Self; 7] = [
        Self::Secondly,
        Self::Minutely,
        Self::Hourly,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Yearly,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secondly => "SECONDLY",
            Self::Minutely => "MINUTELY",
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day of the week, numbered 1 = Sunday .. 7 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl Weekday {
    pub const ALL: [Self; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "SU",
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(token))
    }

    #[must_use]
    pub const fn number(self) -> i16 {
        self as i16
    }

    /// Maps 1..=7 to a weekday; other numbers wrap modulo 7.
    #[must_use]
    pub const fn from_number(n: i32) -> Self {
        match (n - 1).rem_euclid(7) {
            0 => Self::Sunday,
            1 => Self::Monday,
            2 => Self::Tuesday,
            3 => Self::Wednesday,
            4 => Self::Thursday,
            5 => Self::Friday,
            _ => Self::Saturday,
        }
    }
}

/// ## Summary
/// Packs a BYDAY entry as `sign * (weekday + 8 * |ordinal|)`. An ordinal of
/// zero means every such weekday.
#[must_use]
pub const fn encode_day(weekday: Weekday, ordinal: i16) -> i16 {
    let code = weekday.number() + 8 * ordinal.abs();
    if ordinal < 0 { -code } else { code }
}

/// Weekday part of a packed BYDAY entry.
#[must_use]
pub fn day_weekday(code: i16) -> Weekday {
    Weekday::from_number(i32::from(code.abs() % 8))
}

/// Signed ordinal part of a packed BYDAY entry, 0 when absent.
#[must_use]
pub const fn day_position(code: i16) -> i16 {
    let position = code.abs() / 8;
    if code < 0 { -position } else { position }
}

/// Month number of a BYMONTH entry, without the leap flag.
#[must_use]
pub const fn month_number(code: i16) -> i16 {
    code & !LEAP_MONTH
}

#[must_use]
pub const fn is_leap_month(code: i16) -> bool {
    code & LEAP_MONTH != 0
}

/// RFC 7529 handling of days and months that do not exist in a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Skip {
    #[default]
    Omit,
    Backward,
    Forward,
}

impl Skip {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Omit => "OMIT",
            Self::Backward => "BACKWARD",
            Self::Forward => "FORWARD",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        [Self::Omit, Self::Backward, Self::Forward]
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(token))
    }
}

/// The nine BY-rule parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByRule {
    Second,
    Minute,
    Hour,
    Day,
    MonthDay,
    YearDay,
    WeekNo,
    Month,
    SetPos,
}

impl ByRule {
    /// Canonical rendering order.
    pub const ALL: [Self; 9] = [
        Self::Second,
        Self::Minute,
        Self::Hour,
        Self::Day,
        Self::MonthDay,
        Self::YearDay,
        Self::WeekNo,
        Self::Month,
        Self::SetPos,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Second => "BYSECOND",
            Self::Minute => "BYMINUTE",
            Self::Hour => "BYHOUR",
            Self::Day => "BYDAY",
            Self::MonthDay => "BYMONTHDAY",
            Self::YearDay => "BYYEARDAY",
            Self::WeekNo => "BYWEEKNO",
            Self::Month => "BYMONTH",
            Self::SetPos => "BYSETPOS",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(token))
    }
}

/// A bounded list of BY-rule entries with an explicit length.
#[derive(Clone, Copy)]
pub struct ByList<const N: usize> {
    items: [i16; N],
    len: usize,
}

impl<const N: usize> ByList<N> {
    pub const CAPACITY: usize = N;

    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: [0; N],
            len: 0,
        }
    }

    /// ## Summary
    /// Appends `value`, returning `false` when the list is full.
    #[must_use]
    pub fn try_push(&mut self, value: i16) -> bool {
        if self.len == N {
            return false;
        }
        self.items[self.len] = value;
        self.len += 1;
        true
    }

    #[must_use]
    pub fn as_slice(&self) -> &[i16] {
        &self.items[..self.len]
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn contains(&self, value: i16) -> bool {
        self.as_slice().contains(&value)
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn sort_by_key<K: Ord>(&mut self, key: impl FnMut(&i16) -> K) {
        self.items[..self.len].sort_by_key(key);
    }
}

impl<const N: usize> Default for ByList<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PartialEq for ByList<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<const N: usize> Eq for ByList<N> {}

impl<const N: usize> fmt::Debug for ByList<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Parse-time options for recurrence rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurOptions {
    pub illegal_by_rule: ByRulePolicy,
    /// Expansion stops once a candidate passes this year.
    pub max_year: i32,
}

impl Default for RecurOptions {
    fn default() -> Self {
        Self {
            illegal_by_rule: ByRulePolicy::Reject,
            max_year: MAX_SUPPORTED_YEAR,
        }
    }
}

impl From<&RecurrenceConfig> for RecurOptions {
    fn from(config: &RecurrenceConfig) -> Self {
        Self {
            illegal_by_rule: config.illegal_by_rule,
            max_year: config.max_year.min(MAX_SUPPORTED_YEAR),
        }
    }
}

/// A parsed recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recurrence {
    pub freq: Frequency,
    /// Always at least 1.
    pub interval: u16,
    pub week_start: Weekday,
    pub rscale: Option<String>,
    pub skip: Skip,
    pub until: Option<Time>,
    pub count: Option<u32>,
    pub by_second: ByList<61>,
    pub by_minute: ByList<60>,
    pub by_hour: ByList<24>,
    /// Packed with [`encode_day`].
    pub by_day: ByList<385>,
    pub by_month_day: ByList<31>,
    pub by_year_day: ByList<385>,
    pub by_week_no: ByList<55>,
    /// May carry [`LEAP_MONTH`].
    pub by_month: ByList<13>,
    pub by_set_pos: ByList<385>,
}

impl Recurrence {
    #[must_use]
    pub fn new(freq: Frequency) -> Self {
        Self {
            freq,
            interval: 1,
            week_start: Weekday::Monday,
            rscale: None,
            skip: Skip::Omit,
            until: None,
            count: None,
            by_second: ByList::new(),
            by_minute: ByList::new(),
            by_hour: ByList::new(),
            by_day: ByList::new(),
            by_month_day: ByList::new(),
            by_year_day: ByList::new(),
            by_week_no: ByList::new(),
            by_month: ByList::new(),
            by_set_pos: ByList::new(),
        }
    }

    /// ## Summary
    /// Parses `text` with the given options.
    ///
    /// ## Errors
    /// Returns a parse error for malformed rules and, under the `Reject`
    /// policy, for BY-rules illegal with the frequency.
    pub fn parse_with(text: &str, options: &RecurOptions) -> Result<Self, ParseError> {
        recur::parse_recurrence(text, options).map_err(ParseError::report)
    }

    /// Entries of one BY-rule.
    #[must_use]
    pub fn by(&self, rule: ByRule) -> &[i16] {
        match rule {
            ByRule::Second => self.by_second.as_slice(),
            ByRule::Minute => self.by_minute.as_slice(),
            ByRule::Hour => self.by_hour.as_slice(),
            ByRule::Day => self.by_day.as_slice(),
            ByRule::MonthDay => self.by_month_day.as_slice(),
            ByRule::YearDay => self.by_year_day.as_slice(),
            ByRule::WeekNo => self.by_week_no.as_slice(),
            ByRule::Month => self.by_month.as_slice(),
            ByRule::SetPos => self.by_set_pos.as_slice(),
        }
    }

    pub fn clear_by(&mut self, rule: ByRule) {
        match rule {
            ByRule::Second => self.by_second.clear(),
            ByRule::Minute => self.by_minute.clear(),
            ByRule::Hour => self.by_hour.clear(),
            ByRule::Day => self.by_day.clear(),
            ByRule::MonthDay => self.by_month_day.clear(),
            ByRule::YearDay => self.by_year_day.clear(),
            ByRule::WeekNo => self.by_week_no.clear(),
            ByRule::Month => self.by_month.clear(),
            ByRule::SetPos => self.by_set_pos.clear(),
        }
    }

    /// ## Summary
    /// Appends to one BY-rule, returning `false` when it is full.
    #[must_use]
    pub fn push_by(&mut self, rule: ByRule, value: i16) -> bool {
        match rule {
            ByRule::Second => self.by_second.try_push(value),
            ByRule::Minute => self.by_minute.try_push(value),
            ByRule::Hour => self.by_hour.try_push(value),
            ByRule::Day => self.by_day.try_push(value),
            ByRule::MonthDay => self.by_month_day.try_push(value),
            ByRule::YearDay => self.by_year_day.try_push(value),
            ByRule::WeekNo => self.by_week_no.try_push(value),
            ByRule::Month => self.by_month.try_push(value),
            ByRule::SetPos => self.by_set_pos.try_push(value),
        }
    }

    /// Returns whether any BYDAY entry carries an ordinal.
    #[must_use]
    pub fn has_day_ordinals(&self) -> bool {
        self.by_day.as_slice().iter().any(|&code| day_position(code) != 0)
    }

    fn render_by(&self, rule: ByRule, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.by(rule);
        if entries.is_empty() {
            return Ok(());
        }
        write!(f, ";{}=", rule.as_str())?;
        for (i, &code) in entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match rule {
                ByRule::Day => {
                    let position = day_position(code);
                    if position != 0 {
                        write!(f, "{position}")?;
                    }
                    f.write_str(day_weekday(code).as_str())?;
                }
                ByRule::Month => {
                    write!(f, "{}", month_number(code))?;
                    if is_leap_month(code) {
                        f.write_str("L")?;
                    }
                }
                _ => write!(f, "{code}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(rscale) = &self.rscale {
            write!(f, "RSCALE={rscale};")?;
        }
        write!(f, "FREQ={}", self.freq)?;
        if let Some(until) = &self.until {
            write!(f, ";UNTIL={until}")?;
        }
        if let Some(count) = self.count {
            write!(f, ";COUNT={count}")?;
        }
        if self.interval != 1 {
            write!(f, ";INTERVAL={}", self.interval)?;
        }
        for rule in ByRule::ALL {
            self.render_by(rule, f)?;
        }
        if self.week_start != Weekday::Monday {
            write!(f, ";WKST={}", self.week_start.as_str())?;
        }
        if self.rscale.is_some() && self.skip != Skip::Omit {
            write!(f, ";SKIP={}", self.skip.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for Recurrence {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, &RecurOptions::default())
    }
}
