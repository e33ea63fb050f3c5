//! RECUR parser (RFC 5545 §3.3.10, RFC 7529).
#![expect(
    clippy::map_err_ignore,
    reason = "Numeric parse errors are replaced by one naming the clause"
)]

use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::values::parse_date_time;
use crate::rfc::ical::core::{
    ByRule, Frequency, LEAP_MONTH, RecurOptions, Recurrence, Skip, Weekday, day_position,
    day_weekday, encode_day,
};
use crate::rfc::ical::expand::legality;

/// Inclusive numeric range of a BY-rule, and whether negatives mirror it.
const fn numeral_range(rule: ByRule) -> (i16, i16, bool) {
    match rule {
        ByRule::Second => (0, 60, false),
        ByRule::Minute => (0, 59, false),
        ByRule::Hour => (0, 23, false),
        ByRule::MonthDay => (1, 31, true),
        ByRule::WeekNo | ByRule::Day => (1, 53, true),
        ByRule::YearDay | ByRule::SetPos => (1, 366, true),
        ByRule::Month => (1, 13, false),
    }
}

fn parse_numeral(item: &str, rule: ByRule, at: usize) -> ParseResult<i16> {
    let value: i16 = item.parse().map_err(|_| {
        ParseError::new(ParseErrorKind::InvalidRRule, at)
            .with_context(format!("{}={item}", rule.as_str()))
    })?;
    let (min, max, signed) = numeral_range(rule);
    let magnitude = if signed { value.abs() } else { value };
    if magnitude < min || magnitude > max {
        return Err(ParseError::new(ParseErrorKind::ValueOutOfRange, at)
            .with_context(format!("{}={item}", rule.as_str())));
    }
    Ok(value)
}

/// Parses `[+|-][n]WD`.
fn parse_day(item: &str, at: usize) -> ParseResult<i16> {
    let invalid = || ParseError::new(ParseErrorKind::InvalidWeekday, at).with_context(item);
    let split = item
        .len()
        .checked_sub(2)
        .filter(|&i| item.is_char_boundary(i))
        .ok_or_else(invalid)?;
    let (ordinal, weekday) = item.split_at(split);
    let weekday = Weekday::from_token(weekday).ok_or_else(invalid)?;
    let ordinal = if ordinal.is_empty() {
        0
    } else {
        parse_numeral(ordinal.trim(), ByRule::Day, at)?
    };
    Ok(encode_day(weekday, ordinal))
}

/// Parses `n` or `nL`.
fn parse_month(item: &str, at: usize) -> ParseResult<i16> {
    let (number, leap) = item
        .strip_suffix(['L', 'l'])
        .map_or((item, false), |stripped| (stripped, true));
    let month = parse_numeral(number, ByRule::Month, at)?;
    Ok(if leap { month | LEAP_MONTH } else { month })
}

fn parse_by_list(rule: &mut Recurrence, by: ByRule, value: &str, at: usize) -> ParseResult<()> {
    for item in value.split(',') {
        let item = item.trim();
        let code = match by {
            ByRule::Day => parse_day(item, at)?,
            ByRule::Month => parse_month(item, at)?,
            _ => parse_numeral(item, by, at)?,
        };
        if !rule.push_by(by, code) {
            return Err(ParseError::new(ParseErrorKind::ListOverflow, at)
                .with_context(by.as_str().to_string()));
        }
    }
    Ok(())
}

fn parse_count(rule: &mut Recurrence, value: &str, at: usize) -> ParseResult<()> {
    if rule.until.is_some() {
        return Err(ParseError::new(ParseErrorKind::UntilCountConflict, at));
    }
    let count = value.parse().map_err(|_| {
        ParseError::new(ParseErrorKind::InvalidRRule, at).with_context(format!("COUNT={value}"))
    })?;
    rule.count = Some(count);
    Ok(())
}

fn parse_until(rule: &mut Recurrence, value: &str, at: usize) -> ParseResult<()> {
    if rule.count.is_some() {
        return Err(ParseError::new(ParseErrorKind::UntilCountConflict, at));
    }
    let until = parse_date_time(value).map_err(|mut e| {
        e.position += at;
        e
    })?;
    rule.until = Some(until);
    Ok(())
}

fn parse_interval(rule: &mut Recurrence, value: &str, at: usize) -> ParseResult<()> {
    let interval: i64 = value.parse().map_err(|_| {
        ParseError::new(ParseErrorKind::InvalidRRule, at).with_context(format!("INTERVAL={value}"))
    })?;
    rule.interval = u16::try_from(interval.max(1)).map_err(|_| {
        ParseError::new(ParseErrorKind::ValueOutOfRange, at)
            .with_context(format!("INTERVAL={value}"))
    })?;
    Ok(())
}

/// ## Summary
/// Parses a RECUR value such as `FREQ=MONTHLY;BYDAY=-1FR;COUNT=6`.
///
/// Clause names are case-insensitive and a trailing `;` is accepted.
/// BYDAY entries are stored sorted by their distance from the week start.
/// BY-rules that are illegal for the frequency are handled according to
/// `options.illegal_by_rule`.
///
/// ## Errors
/// Returns an error for a clause without `=`, an unknown clause, a
/// repeated FREQ, a missing FREQ, UNTIL together with COUNT, a numeral
/// out of range or a BY-rule list that overflows.
pub fn parse_recurrence(text: &str, options: &RecurOptions) -> ParseResult<Recurrence> {
    let mut rule = Recurrence::new(Frequency::Yearly);
    let mut seen_freq = false;
    let mut at = 0;

    for clause in text.split(';') {
        let start = at;
        at += clause.len() + 1;
        if clause.is_empty() && start >= text.len() {
            continue;
        }
        let (name, value) = clause.split_once('=').ok_or_else(|| {
            ParseError::new(ParseErrorKind::InvalidRRule, start).with_context(clause.to_string())
        })?;
        let value = value.trim();

        match name.trim().to_ascii_uppercase().as_str() {
            "FREQ" => {
                if seen_freq {
                    return Err(ParseError::new(ParseErrorKind::InvalidRRule, start)
                        .with_context("FREQ given twice"));
                }
                rule.freq = Frequency::from_token(value).ok_or_else(|| {
                    ParseError::new(ParseErrorKind::InvalidFrequency, start)
                        .with_context(value.to_string())
                })?;
                seen_freq = true;
            }
            "COUNT" => parse_count(&mut rule, value, start)?,
            "UNTIL" => parse_until(&mut rule, value, start)?,
            "INTERVAL" => parse_interval(&mut rule, value, start)?,
            "WKST" => {
                rule.week_start = Weekday::from_token(value).ok_or_else(|| {
                    ParseError::new(ParseErrorKind::InvalidWeekday, start)
                        .with_context(value.to_string())
                })?;
            }
            "RSCALE" => rule.rscale = Some(value.to_ascii_uppercase()),
            "SKIP" => {
                rule.skip = Skip::from_token(value).ok_or_else(|| {
                    ParseError::new(ParseErrorKind::InvalidRRule, start)
                        .with_context(format!("SKIP={value}"))
                })?;
            }
            other => {
                let by = ByRule::from_token(other).ok_or_else(|| {
                    ParseError::new(ParseErrorKind::InvalidRRule, start)
                        .with_context(format!("unknown clause {other}"))
                })?;
                parse_by_list(&mut rule, by, value, start)?;
            }
        }
    }

    if !seen_freq {
        return Err(ParseError::new(ParseErrorKind::InvalidRRule, 0).with_context("missing FREQ"));
    }

    let week_start = i32::from(rule.week_start.number());
    rule.by_day.sort_by_key(|&code| {
        let offset = (i32::from(day_weekday(code).number()) - week_start).rem_euclid(7);
        (offset, day_position(code))
    });

    legality::enforce(&mut rule, options.illegal_by_rule)?;
    tracing::debug!(rule = %rule, "Parsed recurrence rule");
    Ok(rule)
}

#[cfg(test)]
mod tests {
    use almanac_core::config::ByRulePolicy;

    use super::*;
    use crate::rfc::ical::core::Time;

    fn parse(text: &str) -> ParseResult<Recurrence> {
        parse_recurrence(text, &RecurOptions::default())
    }

    #[test]
    fn parse_rrule_basic() {
        let rule = parse("FREQ=DAILY;COUNT=10").unwrap();
        assert_eq!(rule.freq, Frequency::Daily);
        assert_eq!(rule.count, Some(10));
        assert_eq!(rule.interval, 1);
        assert_eq!(rule.week_start, Weekday::Monday);
    }

    #[test]
    fn clause_names_ignore_case_and_trailing_semicolon() {
        let rule = parse("freq=weekly;byday=mo,we;").unwrap();
        assert_eq!(rule.freq, Frequency::Weekly);
        assert_eq!(rule.by_day.len(), 2);
    }

    #[test]
    fn parse_rrule_monthly_nth() {
        let rule = parse("FREQ=MONTHLY;BYDAY=-1FR").unwrap();
        let code = rule.by_day.as_slice()[0];
        assert_eq!(day_position(code), -1);
        assert_eq!(day_weekday(code), Weekday::Friday);
    }

    #[test]
    fn byday_sorted_from_week_start_and_spaces_tolerated() {
        let rule = parse("FREQ=WEEKLY;WKST=SU;BYDAY=SA, MO ,SU").unwrap();
        let days: Vec<Weekday> = rule.by_day.as_slice().iter().map(|&c| day_weekday(c)).collect();
        assert_eq!(days, [Weekday::Sunday, Weekday::Monday, Weekday::Saturday]);
        assert_eq!(rule.to_string(), "FREQ=WEEKLY;BYDAY=SU,MO,SA;WKST=SU");
    }

    #[test]
    fn until_is_date_or_date_time() {
        let rule = parse("FREQ=DAILY;UNTIL=20260131").unwrap();
        assert_eq!(rule.until, Some(Time::date(2026, 1, 31)));
        let rule = parse("FREQ=DAILY;UNTIL=20260131T120000Z").unwrap();
        assert!(rule.until.is_some_and(|t| t.is_utc()));
    }

    #[test]
    fn interval_below_one_becomes_one() {
        assert_eq!(parse("FREQ=DAILY;INTERVAL=0").unwrap().interval, 1);
        assert_eq!(parse("FREQ=DAILY;INTERVAL=-4").unwrap().interval, 1);
        assert_eq!(parse("FREQ=DAILY;INTERVAL=3").unwrap().interval, 3);
    }

    #[test]
    fn malformed_rules() {
        let cases = [
            ("", ParseErrorKind::InvalidRRule),
            ("COUNT=3", ParseErrorKind::InvalidRRule),
            ("FREQ=DAILY;COUNT", ParseErrorKind::InvalidRRule),
            ("FREQ=DAILY;;COUNT=2", ParseErrorKind::InvalidRRule),
            ("FREQ=DAILY;FREQ=WEEKLY", ParseErrorKind::InvalidRRule),
            ("FREQ=DAILY;BYFOO=1", ParseErrorKind::InvalidRRule),
            ("FREQ=FORTNIGHTLY", ParseErrorKind::InvalidFrequency),
            ("FREQ=DAILY;COUNT=10;UNTIL=20260131", ParseErrorKind::UntilCountConflict),
            ("FREQ=DAILY;UNTIL=20260131;COUNT=10", ParseErrorKind::UntilCountConflict),
            ("FREQ=DAILY;BYHOUR=24", ParseErrorKind::ValueOutOfRange),
            ("FREQ=DAILY;BYSECOND=61", ParseErrorKind::ValueOutOfRange),
            ("FREQ=MONTHLY;BYMONTHDAY=0", ParseErrorKind::ValueOutOfRange),
            ("FREQ=MONTHLY;BYMONTHDAY=-32", ParseErrorKind::ValueOutOfRange),
            ("FREQ=YEARLY;BYYEARDAY=367", ParseErrorKind::ValueOutOfRange),
            ("FREQ=YEARLY;BYWEEKNO=54", ParseErrorKind::ValueOutOfRange),
            ("FREQ=YEARLY;BYMONTH=14", ParseErrorKind::ValueOutOfRange),
            ("FREQ=MONTHLY;BYDAY=6XX", ParseErrorKind::InvalidWeekday),
            ("FREQ=MONTHLY;BYDAY=0MO", ParseErrorKind::ValueOutOfRange),
            ("FREQ=DAILY;WKST=XX", ParseErrorKind::InvalidWeekday),
            ("FREQ=WEEKLY;BYMONTHDAY=1", ParseErrorKind::IllegalByRule),
        ];
        for (text, kind) in cases {
            let err = parse(text).unwrap_err();
            assert_eq!(err.kind, kind, "{text}");
        }
    }

    #[test]
    fn list_overflow() {
        let hours: Vec<String> = (0..24).chain(0..1).map(|h| h.to_string()).collect();
        let text = format!("FREQ=DAILY;BYHOUR={}", hours.join(","));
        assert_eq!(parse(&text).unwrap_err().kind, ParseErrorKind::ListOverflow);
    }

    #[test_log::test]
    fn drop_policy_keeps_the_rest() {
        let options = RecurOptions {
            illegal_by_rule: ByRulePolicy::Drop,
            ..RecurOptions::default()
        };
        let rule = parse_recurrence("FREQ=DAILY;BYWEEKNO=3;BYHOUR=8", &options).unwrap();
        assert!(rule.by_week_no.is_empty());
        assert_eq!(rule.to_string(), "FREQ=DAILY;BYHOUR=8");
    }

    #[test]
    fn rscale_leap_months_and_skip() {
        let rule = parse("RSCALE=gregorian;FREQ=YEARLY;BYMONTH=5L;SKIP=FORWARD").unwrap();
        assert_eq!(rule.rscale.as_deref(), Some("GREGORIAN"));
        assert_eq!(rule.skip, Skip::Forward);
        assert_eq!(rule.to_string(), "RSCALE=GREGORIAN;FREQ=YEARLY;BYMONTH=5L;SKIP=FORWARD");
        assert_eq!(
            parse("FREQ=YEARLY;BYMONTH=5L").unwrap_err().kind,
            ParseErrorKind::IllegalByRule
        );
    }

    #[test]
    fn render_round_trip() {
        for text in [
            "FREQ=DAILY;COUNT=5",
            "FREQ=WEEKLY;INTERVAL=2;BYDAY=TU,TH",
            "FREQ=MONTHLY;UNTIL=20241231T235959Z;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1",
            "FREQ=YEARLY;BYMONTHDAY=1;BYMONTH=1,7;WKST=SU",
            "FREQ=MINUTELY;INTERVAL=15;BYHOUR=9,10,11",
        ] {
            let rule = parse(text).unwrap();
            assert_eq!(rule.to_string(), text);
            assert_eq!(parse(&rule.to_string()).unwrap(), rule);
        }
    }
}
