//! Recurrence expansion (RFC 5545 §3.3.10, RFC 7529).
//!
//! The iterator walks the rule's periods (a year, a month, a week, a day or
//! one sub-daily unit) in steps of INTERVAL. Each period is expanded into
//! its full candidate list, BYSETPOS picks from that list, and the bounds
//! (DTSTART, UNTIL, COUNT and the optional range) are applied while
//! draining it. Walking backwards expands the same periods in reverse.

use std::cmp::Ordering;
use std::collections::VecDeque;

use super::calendar::{CalendarBackend, CalendarDate, backend_for};
use super::legality::{self, Legality, classify};
use super::yearday::YearDaySet;
use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::core::{
    ByList, ByRule, Frequency, RecurOptions, Recurrence, Skip, Time, Weekday, Zone,
    civil_from_days, day_position, day_weekday, days_from_civil, encode_day, is_leap_month,
    month_number,
};

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing returned since construction, `set_range` or `reset`.
    Primed,
    Forward,
    Backward,
    Exhausted(Direction),
}

/// Last occurrence handed out. `ordinal` is its 0-based rank from DTSTART
/// and is only tracked for COUNT rules.
#[derive(Debug, Clone, Copy)]
struct Position {
    time: Time,
    ordinal: Option<u32>,
}

/// Cursor over periods: candidates still to hand out from the current
/// period and the index of the next period to expand.
#[derive(Debug, Clone, Default)]
struct Walk {
    index: i64,
    pending: VecDeque<Time>,
    /// Last candidate stepped over. A SKIP substitute can land on a day
    /// the neighbouring period also yields; the second copy is dropped.
    last: Option<Time>,
}

/// Fields of DTSTART every period index is measured from.
#[derive(Debug, Clone, Copy)]
struct Origin {
    /// DTSTART in the backend's calendar.
    date: CalendarDate,
    month: i64,
    /// Epoch day of the first day of DTSTART's week.
    week: i64,
    day: i64,
    /// DTSTART's wall clock in sub-daily units.
    unit: i64,
}

/// Iterator over the occurrences of a recurrence rule.
///
/// Occurrences come out in DTSTART's zone, as dates when DTSTART is a date.
/// [`Iterator::next`] walks forward from DTSTART (or from the start of the
/// range set with [`RecurIterator::set_range`]); [`RecurIterator::prev`]
/// walks back from the last occurrence handed out, or from the rule's end
/// when nothing has been handed out yet.
#[derive(Debug, Clone)]
pub struct RecurIterator {
    rule: Recurrence,
    dtstart: Time,
    backend: &'static dyn CalendarBackend,
    max_year: i32,
    origin: Origin,
    hours: Vec<i32>,
    minutes: Vec<i32>,
    seconds: Vec<i32>,
    from: Option<Time>,
    to: Option<Time>,
    state: State,
    walk: Walk,
    position: Option<Position>,
    /// Occurrences at or after DTSTART counted so far, for COUNT.
    produced: u32,
    /// Rank of the next occurrence `prev` hands out.
    next_ordinal: Option<u32>,
}

fn narrow(v: i64) -> i32 {
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}

fn sorted(list: &[i16]) -> Vec<i32> {
    let mut values: Vec<i32> = list.iter().map(|&v| i32::from(v)).collect();
    values.sort_unstable();
    values.dedup();
    values
}

fn seed<const N: usize>(list: &mut ByList<N>, value: i32) {
    if list.is_empty() {
        let pushed = list.try_push(i16::try_from(value).unwrap_or(0));
        debug_assert!(pushed);
    }
}

const fn unit_seconds(freq: Frequency) -> Option<i64> {
    match freq {
        Frequency::Hourly => Some(SECONDS_PER_HOUR),
        Frequency::Minutely => Some(60),
        Frequency::Secondly => Some(1),
        Frequency::Daily | Frequency::Weekly | Frequency::Monthly | Frequency::Yearly => None,
    }
}

fn epoch_day(t: &Time) -> i64 {
    days_from_civil(t.year, t.month, t.day)
}

/// Fills the BY-rules RFC 5545 leaves implicit from DTSTART.
fn seed_from_start(rule: &mut Recurrence, dtstart: &Time, date: CalendarDate, weekday: Weekday) {
    if !dtstart.is_date {
        if classify(ByRule::Second, rule.freq) == Legality::Expand {
            seed(&mut rule.by_second, dtstart.second);
        }
        if classify(ByRule::Minute, rule.freq) == Legality::Expand {
            seed(&mut rule.by_minute, dtstart.minute);
        }
        if classify(ByRule::Hour, rule.freq) == Legality::Expand {
            seed(&mut rule.by_hour, dtstart.hour);
        }
    }

    match rule.freq {
        Frequency::Weekly => {
            if rule.by_day.is_empty() {
                seed(&mut rule.by_day, i32::from(encode_day(weekday, 0)));
            }
        }
        Frequency::Monthly => {
            if rule.by_day.is_empty() {
                seed(&mut rule.by_month_day, date.day);
            }
        }
        Frequency::Yearly => {
            let no_days = rule.by_day.is_empty()
                && rule.by_month_day.is_empty()
                && rule.by_year_day.is_empty();
            if !no_days {
                return;
            }
            if rule.by_week_no.is_empty() {
                seed(&mut rule.by_month, date.month);
                seed(&mut rule.by_month_day, date.day);
            } else {
                seed(&mut rule.by_day, i32::from(encode_day(weekday, 0)));
            }
        }
        Frequency::Daily
        | Frequency::Hourly
        | Frequency::Minutely
        | Frequency::Secondly => {}
    }
}

impl RecurIterator {
    /// ## Summary
    /// Builds an iterator for `rule` anchored at `dtstart` with default
    /// options.
    ///
    /// ## Errors
    /// See [`RecurIterator::with_options`].
    pub fn new(rule: &Recurrence, dtstart: Time) -> RfcResult<Self> {
        Self::with_options(rule, dtstart, &RecurOptions::default())
    }

    /// ## Summary
    /// Builds an iterator for `rule` anchored at `dtstart`.
    ///
    /// ## Errors
    /// - Bad argument when `dtstart` is null or invalid, or when a sub-daily
    ///   rule is anchored at a date.
    /// - Parse error when the rule carries BY-rules illegal with its
    ///   frequency under [`RecurOptions::illegal_by_rule`].
    /// - Unimplemented for an RSCALE without a calendar backend.
    pub fn with_options(rule: &Recurrence, dtstart: Time, options: &RecurOptions) -> RfcResult<Self> {
        if dtstart.is_null() || !dtstart.is_valid() {
            return Err(RfcError::BadArg(format!("recurrence start {dtstart} is not a valid time")).report());
        }
        let dtstart = dtstart.normalize();
        let mut rule = rule.clone();
        rule.interval = rule.interval.max(1);
        legality::enforce(&mut rule, options.illegal_by_rule)
            .map_err(|err| RfcError::from(err).report())?;
        let backend = backend_for(rule.rscale.as_deref())?;

        let unit = unit_seconds(rule.freq);
        if dtstart.is_date && unit.is_some() {
            return Err(RfcError::BadArg(format!("FREQ={} needs a date-time start", rule.freq)).report());
        }

        let date = backend.from_gregorian(dtstart.year, dtstart.month, dtstart.day);
        let weekday = backend.weekday(date);
        seed_from_start(&mut rule, &dtstart, date, weekday);

        let day = epoch_day(&dtstart);
        let week_offset = (i64::from(weekday.number()) - i64::from(rule.week_start.number())).rem_euclid(7);
        let origin = Origin {
            date,
            month: backend.month_ordinal(date.year, date.month, date.leap_month),
            week: day - week_offset,
            day,
            unit: unit.map_or(0, |u| dtstart.wall_seconds().div_euclid(u)),
        };

        let iterator = Self {
            hours: sorted(rule.by_hour.as_slice()),
            minutes: sorted(rule.by_minute.as_slice()),
            seconds: sorted(rule.by_second.as_slice()),
            rule,
            dtstart,
            backend,
            max_year: options.max_year,
            origin,
            from: None,
            to: None,
            state: State::Primed,
            walk: Walk::default(),
            position: None,
            produced: 0,
            next_ordinal: None,
        };
        tracing::debug!(
            rule = %iterator.rule,
            dtstart = %iterator.dtstart,
            scale = iterator.backend.scale(),
            "Recurrence iterator ready"
        );
        Ok(iterator)
    }

    /// The rule after legality checks and implicit BY-rules.
    #[must_use]
    pub const fn rule(&self) -> &Recurrence {
        &self.rule
    }

    #[must_use]
    pub const fn dtstart(&self) -> Time {
        self.dtstart
    }

    /// ## Summary
    /// Restricts iteration to `from <= t < to` and rewinds. Without `to` the
    /// range is open-ended.
    ///
    /// ## Errors
    /// Usage error when `from` is null or does not precede `to`.
    pub fn set_range(&mut self, from: Time, to: Option<Time>) -> RfcResult<()> {
        if from.is_null() {
            return Err(RfcError::usage("range start is null").report());
        }
        if to.is_some_and(|to| from.compare(&to) != Ordering::Less) {
            return Err(RfcError::usage("range start must precede range end").report());
        }
        self.from = Some(from.normalize());
        self.to = to.map(|t| t.normalize());
        self.reset();
        Ok(())
    }

    /// Rewinds to DTSTART, keeping the range.
    pub fn reset(&mut self) {
        self.state = State::Primed;
        self.walk = Walk::default();
        self.position = None;
        self.produced = 0;
        self.next_ordinal = None;
    }

    /// ## Summary
    /// Returns the occurrence before the last one handed out. On a fresh
    /// iterator, returns the last occurrence of the rule, which needs a
    /// COUNT, an UNTIL or a range end; otherwise returns `None`.
    pub fn prev(&mut self) -> Option<Time> {
        match self.state {
            State::Exhausted(Direction::Backward) => return None,
            State::Backward => {}
            State::Primed | State::Forward | State::Exhausted(Direction::Forward) => {
                if !self.begin_backward() {
                    self.state = State::Exhausted(Direction::Backward);
                    return None;
                }
                self.state = State::Backward;
            }
        }

        let Some(candidate) = self.step(Direction::Backward) else {
            return self.finish(Direction::Backward);
        };
        let before_range = self
            .from
            .is_some_and(|from| candidate.compare(&from) == Ordering::Less);
        if candidate.compare(&self.dtstart) == Ordering::Less || before_range {
            return self.finish(Direction::Backward);
        }
        let ordinal = self.next_ordinal;
        self.next_ordinal = ordinal.and_then(|o| o.checked_sub(1));
        self.position = Some(Position {
            time: candidate,
            ordinal,
        });
        Some(candidate)
    }

    fn finish(&mut self, direction: Direction) -> Option<Time> {
        self.state = State::Exhausted(direction);
        None
    }

    fn begin_forward(&mut self) {
        self.produced = 0;
        match self.from {
            Some(from)
                if self.rule.count.is_none()
                    && from.compare(&self.dtstart) == Ordering::Greater =>
            {
                self.seek(&from, Direction::Forward, true);
            }
            _ => self.walk = Walk::default(),
        }
    }

    fn begin_backward(&mut self) -> bool {
        if let Some(position) = self.position {
            self.seek(&position.time, Direction::Backward, false);
            self.next_ordinal = position.ordinal.and_then(|o| o.checked_sub(1));
            return true;
        }

        if self.rule.count.is_some() {
            let Some((last, ordinal)) = self.last_counted() else {
                return false;
            };
            self.seek(&last, Direction::Backward, true);
            self.next_ordinal = Some(ordinal);
            return true;
        }

        let until = self.until_limit().map(|t| (t, true));
        let to = self.to.map(|t| (t, false));
        let limit = match (until, to) {
            (Some(until), Some(to)) if to.0.compare(&until.0) == Ordering::Greater => Some(until),
            (until, to) => to.or(until),
        };
        let Some((limit, inclusive)) = limit else {
            tracing::warn!(rule = %self.rule, "Reverse iteration needs COUNT, UNTIL or a range end");
            return false;
        };
        let (limit, inclusive) = if limit.year > self.max_year {
            let end = Time::date_time(self.max_year, 12, 31, 23, 59, 59).with_zone(self.dtstart.zone);
            (end, true)
        } else {
            (limit, inclusive)
        };
        self.seek(&limit, Direction::Backward, inclusive);
        self.next_ordinal = None;
        true
    }

    /// Replays the rule from DTSTART to find its last occurrence and rank.
    fn last_counted(&self) -> Option<(Time, u32)> {
        let mut replay = self.clone();
        replay.from = None;
        replay.reset();
        let mut last = None;
        while let Some(t) = replay.next() {
            last = Some((t, replay.produced.saturating_sub(1)));
        }
        last
    }

    /// UNTIL as an inclusive bound on candidates.
    fn until_limit(&self) -> Option<Time> {
        let until = self.rule.until?;
        if until.is_date && !self.dtstart.is_date {
            return Some(
                Time::date_time(until.year, until.month, until.day, 23, 59, 59)
                    .with_zone(self.dtstart.zone),
            );
        }
        Some(until)
    }

    fn beyond_until(&self, t: &Time) -> bool {
        let Some(until) = self.rule.until else {
            return false;
        };
        if until.is_date && !t.is_date {
            t.compare_date_only(&until) == Ordering::Greater
        } else {
            t.compare(&until) == Ordering::Greater
        }
    }

    fn interval(&self) -> i64 {
        i64::from(self.rule.interval)
    }

    fn floor_to_interval(&self, index: i64) -> i64 {
        index - index.rem_euclid(self.interval())
    }

    fn ceil_to_interval(&self, index: i64) -> i64 {
        let rem = index.rem_euclid(self.interval());
        if rem == 0 { index } else { index - rem + self.interval() }
    }

    /// Period (in base units from DTSTART's period) holding `t`.
    fn unit_index(&self, t: &Time) -> i64 {
        let t = t.convert_to_zone(self.dtstart.zone);
        if let Some(unit) = unit_seconds(self.rule.freq) {
            return t.wall_seconds().div_euclid(unit) - self.origin.unit;
        }
        let date = self.backend.from_gregorian(t.year, t.month, t.day);
        match self.rule.freq {
            Frequency::Yearly => i64::from(date.year) - i64::from(self.origin.date.year),
            Frequency::Monthly => {
                self.backend.month_ordinal(date.year, date.month, date.leap_month) - self.origin.month
            }
            Frequency::Weekly => (epoch_day(&t) - self.origin.week).div_euclid(7),
            Frequency::Daily
            | Frequency::Hourly
            | Frequency::Minutely
            | Frequency::Secondly => epoch_day(&t) - self.origin.day,
        }
    }

    /// Positions the walk at the period holding `t`, keeping only the
    /// candidates on the far side of `t` in `direction`.
    fn seek(&mut self, t: &Time, direction: Direction, inclusive: bool) {
        let index = self.floor_to_interval(self.unit_index(t));
        let pending = if direction == Direction::Backward && index < 0 {
            VecDeque::new()
        } else {
            self.expand(index, direction)
                .into_iter()
                .filter(|candidate| {
                    let ord = candidate.compare(t);
                    let wanted = match direction {
                        Direction::Forward => Ordering::Greater,
                        Direction::Backward => Ordering::Less,
                    };
                    ord == wanted || (inclusive && ord == Ordering::Equal)
                })
                .collect()
        };
        let next = match direction {
            Direction::Forward => index + self.interval(),
            Direction::Backward => index - self.interval(),
        };
        self.walk = Walk {
            index: next,
            pending,
            last: (!inclusive).then_some(*t),
        };
    }

    /// Next raw candidate in `direction`, before DTSTART and bound checks.
    fn step(&mut self, direction: Direction) -> Option<Time> {
        loop {
            if let Some(candidate) = self.walk.pending.pop_front() {
                if candidate.year > self.max_year {
                    match direction {
                        Direction::Forward => return None,
                        Direction::Backward => continue,
                    }
                }
                let repeated = self
                    .walk
                    .last
                    .is_some_and(|last| candidate.compare(&last) == Ordering::Equal);
                if repeated {
                    continue;
                }
                self.walk.last = Some(candidate);
                return Some(candidate);
            }
            let index = self.skip_empty_days(self.walk.index, direction);
            let out_of_range = match direction {
                Direction::Forward => self.period_year(index) > self.max_year,
                Direction::Backward => index < 0,
            };
            if out_of_range {
                return None;
            }
            self.walk.pending = self.expand(index, direction).into();
            self.walk.index = match direction {
                Direction::Forward => index + self.interval(),
                Direction::Backward => index - self.interval(),
            };
        }
    }

    /// Gregorian year a period starts in.
    fn period_year(&self, index: i64) -> i32 {
        if let Some(unit) = unit_seconds(self.rule.freq) {
            let wall = (self.origin.unit + index) * unit;
            return civil_from_days(wall.div_euclid(SECONDS_PER_DAY)).0;
        }
        match self.rule.freq {
            Frequency::Yearly => {
                let year = narrow(i64::from(self.origin.date.year) + index);
                self.backend.to_gregorian(CalendarDate::new(year, 1, 1)).0
            }
            Frequency::Monthly => {
                let (year, month, leap_month) = self.backend.from_month_ordinal(self.origin.month + index);
                let date = CalendarDate {
                    year,
                    month,
                    leap_month,
                    day: 1,
                };
                self.backend.to_gregorian(date).0
            }
            Frequency::Weekly => civil_from_days(self.origin.week + 7 * index).0,
            Frequency::Daily
            | Frequency::Hourly
            | Frequency::Minutely
            | Frequency::Secondly => civil_from_days(self.origin.day + index).0,
        }
    }

    /// For sub-daily rules, moves past whole days (or hours) the day
    /// filters or BYHOUR rule out, landing on an interval multiple.
    fn skip_empty_days(&self, index: i64, direction: Direction) -> i64 {
        let Some(unit) = unit_seconds(self.rule.freq) else {
            return index;
        };
        let wall = (self.origin.unit + index) * unit;
        let day = wall.div_euclid(SECONDS_PER_DAY);
        let hour = wall.div_euclid(SECONDS_PER_HOUR);
        let target = if !self.day_passes(civil_from_days(day)) {
            match direction {
                Direction::Forward => (day + 1) * SECONDS_PER_DAY,
                Direction::Backward => day * SECONDS_PER_DAY - 1,
            }
        } else if unit < SECONDS_PER_HOUR
            && !self.rule.by_hour.is_empty()
            && !self.hours.contains(&narrow(hour.rem_euclid(24)))
        {
            match direction {
                Direction::Forward => (hour + 1) * SECONDS_PER_HOUR,
                Direction::Backward => hour * SECONDS_PER_HOUR - 1,
            }
        } else {
            return index;
        };
        let target = target.div_euclid(unit) - self.origin.unit;
        match direction {
            Direction::Forward => self.ceil_to_interval(target),
            Direction::Backward => self.floor_to_interval(target),
        }
    }

    /// Every candidate of one period, in walk order, after BYSETPOS.
    fn expand(&self, index: i64, direction: Direction) -> Vec<Time> {
        let days = self.period_days(index);
        let mut candidates = Vec::new();
        if self.dtstart.is_date {
            candidates.extend(
                days.iter()
                    .map(|&(y, m, d)| Time::date(y, m, d).with_zone(self.dtstart.zone)),
            );
        } else {
            let (hour_set, minute_set, second_set) = self.period_clock(index);
            for &(y, m, d) in &days {
                for &hour in &hour_set {
                    for &minute in &minute_set {
                        for &second in &second_set {
                            candidates.push(
                                Time::date_time(y, m, d, hour, minute, second)
                                    .with_zone(self.dtstart.zone),
                            );
                        }
                    }
                }
            }
        }
        if direction == Direction::Backward {
            candidates.reverse();
        }
        let candidates = self.select_positions(&candidates, direction);
        tracing::trace!(index, ?direction, candidates = candidates.len(), "Expanded recurrence period");
        candidates
    }

    fn select_positions(&self, candidates: &[Time], direction: Direction) -> Vec<Time> {
        if self.rule.by_set_pos.is_empty() {
            return candidates.to_vec();
        }
        let len = i64::try_from(candidates.len()).unwrap_or(i64::MAX);
        let mut picks: Vec<usize> = self
            .rule
            .by_set_pos
            .as_slice()
            .iter()
            .filter_map(|&pos| {
                let pos = i64::from(pos);
                let at = match (direction, pos > 0) {
                    (Direction::Forward, true) => pos - 1,
                    (Direction::Forward, false) => len + pos,
                    (Direction::Backward, true) => len - pos,
                    (Direction::Backward, false) => -pos - 1,
                };
                usize::try_from(at).ok()
            })
            .collect();
        picks.sort_unstable();
        picks.dedup();
        picks
            .into_iter()
            .filter_map(|at| candidates.get(at).copied())
            .collect()
    }

    /// Hours, minutes and seconds of a period's candidates, ascending.
    fn period_clock(&self, index: i64) -> (Vec<i32>, Vec<i32>, Vec<i32>) {
        let Some(unit) = unit_seconds(self.rule.freq) else {
            return (self.hours.clone(), self.minutes.clone(), self.seconds.clone());
        };
        let anchor = Time::from_wall_seconds((self.origin.unit + index) * unit, false, self.dtstart.zone);
        (
            self.clock_values(ByRule::Hour, &self.hours, anchor.hour),
            self.clock_values(ByRule::Minute, &self.minutes, anchor.minute),
            self.clock_values(ByRule::Second, &self.seconds, anchor.second),
        )
    }

    fn clock_values(&self, rule: ByRule, list: &[i32], anchor: i32) -> Vec<i32> {
        if classify(rule, self.rule.freq) == Legality::Expand {
            list.to_vec()
        } else if list.is_empty() || list.contains(&anchor) {
            vec![anchor]
        } else {
            Vec::new()
        }
    }

    /// Gregorian days of a period that survive the day-level BY-rules,
    /// ascending.
    fn period_days(&self, index: i64) -> Vec<(i32, i32, i32)> {
        match self.rule.freq {
            Frequency::Yearly => {
                let year = narrow(i64::from(self.origin.date.year) + index);
                self.year_days(year)
                    .iter()
                    .map(|doy| self.backend.to_gregorian(self.backend.from_day_of_year(year, doy)))
                    .collect()
            }
            Frequency::Monthly => {
                let (year, month, leap_month) = self.backend.from_month_ordinal(self.origin.month + index);
                self.month_days(year, month, leap_month)
                    .iter()
                    .map(|doy| self.backend.to_gregorian(self.backend.from_day_of_year(year, doy)))
                    .collect()
            }
            Frequency::Weekly => (0..7)
                .map(|offset| civil_from_days(self.origin.week + 7 * index + offset))
                .filter(|&date| self.day_passes(date))
                .collect(),
            Frequency::Daily => Some(civil_from_days(self.origin.day + index))
                .filter(|&date| self.day_passes(date))
                .into_iter()
                .collect(),
            Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => {
                let unit = unit_seconds(self.rule.freq).unwrap_or(1);
                let wall = (self.origin.unit + index) * unit;
                Some(civil_from_days(wall.div_euclid(SECONDS_PER_DAY)))
                    .filter(|&date| self.day_passes(date))
                    .into_iter()
                    .collect()
            }
        }
    }

    /// BYMONTH entries that name a month of `year`, after SKIP.
    fn resolve_months(&self, year: i32) -> Vec<(i32, bool)> {
        let skip = if self.rule.rscale.is_some() {
            self.rule.skip
        } else {
            Skip::Omit
        };
        let mut months = Vec::new();
        for &code in self.rule.by_month.as_slice() {
            let month = i32::from(month_number(code));
            let leap_month = is_leap_month(code);
            if self.backend.days_in_month(year, month, leap_month).is_some() {
                months.push((month, leap_month));
                continue;
            }
            match skip {
                Skip::Backward => months.push((month, false)),
                Skip::Forward if month < self.backend.months_in_year(year) => months.push((month + 1, false)),
                Skip::Forward | Skip::Omit => {}
            }
        }
        months
    }

    fn month_day_matches(&self, date: CalendarDate) -> bool {
        let Some(length) = self.backend.days_in_month(date.year, date.month, date.leap_month) else {
            return false;
        };
        self.rule.by_month_day.as_slice().iter().any(|&n| {
            let n = i32::from(n);
            if n > 0 { date.day == n } else { date.day == length + n + 1 }
        })
    }

    fn year_day_matches(&self, doy: i32, length: i32) -> bool {
        self.rule.by_year_day.as_slice().iter().any(|&n| {
            let n = i32::from(n);
            if n > 0 { doy == n } else { doy == length + n + 1 }
        })
    }

    /// BYDAY match with ordinals counted within `first..=last` (ordinals of
    /// the year).
    fn weekday_matches(&self, date: CalendarDate, first: i32, last: i32) -> bool {
        let weekday = self.backend.weekday(date);
        let doy = self.backend.day_of_year(date);
        self.rule.by_day.as_slice().iter().any(|&code| {
            if day_weekday(code) != weekday {
                return false;
            }
            let position = i32::from(day_position(code));
            match position.cmp(&0) {
                Ordering::Equal => true,
                Ordering::Greater => (doy - first) / 7 + 1 == position,
                Ordering::Less => -((last - doy) / 7 + 1) == position,
            }
        })
    }

    /// Day filters for WEEKLY and finer: BYMONTH, BYYEARDAY, BYMONTHDAY
    /// and the BYDAY weekday.
    fn day_passes(&self, (y, m, d): (i32, i32, i32)) -> bool {
        let date = self.backend.from_gregorian(y, m, d);
        if !self.rule.by_month.is_empty()
            && !self
                .resolve_months(date.year)
                .contains(&(date.month, date.leap_month))
        {
            return false;
        }
        if !self.rule.by_year_day.is_empty() {
            let length = self.backend.days_in_year(date.year);
            if !self.year_day_matches(self.backend.day_of_year(date), length) {
                return false;
            }
        }
        if !self.rule.by_month_day.is_empty() && !self.month_day_matches(date) {
            return false;
        }
        let weekday = self.backend.weekday(date);
        self.rule.by_day.is_empty()
            || self
                .rule
                .by_day
                .as_slice()
                .iter()
                .any(|&code| day_weekday(code) == weekday)
    }

    /// Days of a MONTHLY period, as ordinals of `year`.
    fn month_days(&self, year: i32, month: i32, leap_month: bool) -> YearDaySet {
        let mut set = YearDaySet::new();
        if !self.rule.by_month.is_empty() && !self.resolve_months(year).contains(&(month, leap_month)) {
            return set;
        }
        let Some(length) = self.backend.days_in_month(year, month, leap_month) else {
            return set;
        };
        let first = self.backend.day_of_year(CalendarDate {
            year,
            month,
            leap_month,
            day: 1,
        });
        let last = first + length - 1;
        for day in 1..=length {
            let date = CalendarDate {
                year,
                month,
                leap_month,
                day,
            };
            if !self.rule.by_month_day.is_empty() && !self.month_day_matches(date) {
                continue;
            }
            if !self.rule.by_day.is_empty() && !self.weekday_matches(date, first, last) {
                continue;
            }
            set.set(first + day - 1);
        }
        self.add_skipped_days(&mut set, first, length);
        set
    }

    /// Days of a YEARLY period, as ordinals of `year`.
    fn year_days(&self, year: i32) -> YearDaySet {
        let mut set = YearDaySet::new();
        let length = self.backend.days_in_year(year);
        let months = self.resolve_months(year);
        let weeks = (!self.rule.by_week_no.is_empty()).then(|| self.week_layout(year));

        for doy in 1..=length {
            let date = self.backend.from_day_of_year(year, doy);
            if !self.rule.by_month.is_empty() && !months.contains(&(date.month, date.leap_month)) {
                continue;
            }
            if weeks.is_some_and(|layout| !self.week_matches(&layout, doy)) {
                continue;
            }
            if !self.rule.by_year_day.is_empty() && !self.year_day_matches(doy, length) {
                continue;
            }
            if !self.rule.by_month_day.is_empty() && !self.month_day_matches(date) {
                continue;
            }
            if !self.rule.by_day.is_empty() {
                let (first, last) = if self.rule.by_month.is_empty() {
                    (1, length)
                } else {
                    let first = doy - date.day + 1;
                    let days = self
                        .backend
                        .days_in_month(date.year, date.month, date.leap_month)
                        .unwrap_or(0);
                    (first, first + days - 1)
                };
                if !self.weekday_matches(date, first, last) {
                    continue;
                }
            }
            set.set(doy);
        }

        let months = if self.rule.by_month.is_empty() {
            (1..=self.backend.months_in_year(year)).map(|m| (m, false)).collect()
        } else {
            months
        };
        for (month, leap_month) in months {
            let Some(days) = self.backend.days_in_month(year, month, leap_month) else {
                continue;
            };
            let first = self.backend.day_of_year(CalendarDate {
                year,
                month,
                leap_month,
                day: 1,
            });
            self.add_skipped_days(&mut set, first, days);
        }
        set
    }

    /// Marks the SKIP substitute for each BYMONTHDAY the month lacks.
    fn add_skipped_days(&self, set: &mut YearDaySet, first: i32, length: i32) {
        let applies = self.rule.rscale.is_some()
            && self.rule.skip != Skip::Omit
            && self.rule.by_day.is_empty()
            && self.rule.by_year_day.is_empty()
            && self.rule.by_week_no.is_empty();
        if !applies {
            return;
        }
        for &n in self.rule.by_month_day.as_slice() {
            let n = i32::from(n);
            if n.abs() <= length {
                continue;
            }
            let doy = match (n > 0, self.rule.skip) {
                (true, Skip::Backward) => first + length - 1,
                (true, Skip::Forward) => first + length,
                (false, Skip::Backward) => first - 1,
                (false, Skip::Forward) => first,
                (_, Skip::Omit) => continue,
            };
            set.set(doy);
        }
    }

    fn week_one_start(&self, year: i32) -> i32 {
        let jan1 = self.backend.weekday(self.backend.from_day_of_year(year, 1));
        let delta = (i32::from(jan1.number()) - i32::from(self.rule.week_start.number())).rem_euclid(7);
        // Week 1 is the first week with at least four days in the year.
        if 7 - delta >= 4 { 1 - delta } else { 8 - delta }
    }

    fn week_layout(&self, year: i32) -> WeekLayout {
        let start = self.week_one_start(year);
        let next_start = self.backend.days_in_year(year) + self.week_one_start(year + 1);
        let prev_start = self.week_one_start(year - 1) - self.backend.days_in_year(year - 1);
        let after_next = self.backend.days_in_year(year)
            + self.backend.days_in_year(year + 1)
            + self.week_one_start(year + 2);
        WeekLayout {
            start,
            next_start,
            weeks: (next_start - start) / 7,
            prev_weeks: (start - prev_start) / 7,
            next_weeks: (after_next - next_start) / 7,
        }
    }

    fn week_matches(&self, layout: &WeekLayout, doy: i32) -> bool {
        let (week, total) = if doy < layout.start {
            (layout.prev_weeks, layout.prev_weeks)
        } else if doy >= layout.next_start {
            (1, layout.next_weeks)
        } else {
            ((doy - layout.start) / 7 + 1, layout.weeks)
        };
        self.rule.by_week_no.as_slice().iter().any(|&n| {
            let n = i32::from(n);
            if n > 0 { week == n } else { week == total + n + 1 }
        })
    }
}

/// Week numbering of one year, as ordinals of that year.
#[derive(Debug, Clone, Copy)]
struct WeekLayout {
    start: i32,
    next_start: i32,
    weeks: i32,
    prev_weeks: i32,
    next_weeks: i32,
}

impl Iterator for RecurIterator {
    type Item = Time;

    fn next(&mut self) -> Option<Time> {
        match self.state {
            State::Exhausted(Direction::Forward) => return None,
            State::Forward => {}
            State::Primed => self.begin_forward(),
            State::Backward | State::Exhausted(Direction::Backward) => match self.position {
                Some(position) => {
                    self.seek(&position.time, Direction::Forward, false);
                    self.produced = position.ordinal.map_or(0, |o| o.saturating_add(1));
                }
                None => self.begin_forward(),
            },
        }
        self.state = State::Forward;

        loop {
            let Some(candidate) = self.step(Direction::Forward) else {
                return self.finish(Direction::Forward);
            };
            if candidate.compare(&self.dtstart) == Ordering::Less {
                continue;
            }
            if self.beyond_until(&candidate) {
                return self.finish(Direction::Forward);
            }
            if self.rule.count.is_some_and(|count| self.produced >= count) {
                return self.finish(Direction::Forward);
            }
            self.produced = self.produced.saturating_add(1);
            if self.from.is_some_and(|from| candidate.compare(&from) == Ordering::Less) {
                continue;
            }
            if self.to.is_some_and(|to| candidate.compare(&to) != Ordering::Less) {
                return self.finish(Direction::Forward);
            }
            self.position = Some(Position {
                time: candidate,
                ordinal: self.rule.count.map(|_| self.produced - 1),
            });
            return Some(candidate);
        }
    }
}

/// ## Summary
/// Expands `rule_text` from the UTC epoch second `start` and returns up to
/// `count` occurrences as epoch seconds.
///
/// ## Errors
/// Returns the parse error for a malformed rule, or any error of
/// [`RecurIterator::new`].
pub fn expand_recurrence(rule_text: &str, start: i64, count: usize) -> RfcResult<Vec<i64>> {
    let rule: Recurrence = rule_text.parse()?;
    let dtstart = Time::from_epoch_seconds(start, false, Zone::Utc);
    let iterator = RecurIterator::new(&rule, dtstart)?;
    Ok(iterator
        .map(|t| t.to_epoch_seconds())
        .filter(|&t| t >= start)
        .take(count)
        .collect())
}

#[cfg(test)]
#[path = "iterator_tests.rs"]
mod tests;
