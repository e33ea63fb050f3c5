use almanac_rfc::rfc::ical::core::{Recurrence, Time, Zone};
use almanac_rfc::rfc::ical::expand::RecurIterator;
use chrono::{DateTime, FixedOffset};
use rrule::RRuleSet;

pub struct RRuleCase {
    pub name: &'static str,
    pub rruleset: &'static str,
    pub expected: Option<&'static [&'static str]>,
    pub expected_len: Option<usize>,
    pub limit: u16,
    /// Inclusive range start.
    pub after: Option<&'static str>,
    /// Exclusive range end.
    pub before: Option<&'static str>,
    /// Whether the `rrule` crate must produce the same instants.
    pub cross_check: bool,
}

#[expect(clippy::too_many_lines)]
pub fn rrule_cases() -> Vec<RRuleCase> {
    vec![
        RRuleCase {
            name: "daily_basic",
            rruleset: "DTSTART:20120201T093000Z\nRRULE:FREQ=DAILY;COUNT=3",
            expected: Some(&[
                "2012-02-01T09:30:00+00:00",
                "2012-02-02T09:30:00+00:00",
                "2012-02-03T09:30:00+00:00",
            ]),
            expected_len: None,
            limit: 100,
            after: None,
            before: None,
            cross_check: true,
        },
        RRuleCase {
            name: "weekly_basic",
            rruleset: "DTSTART:19970902T090000Z\nRRULE:FREQ=WEEKLY;COUNT=3;BYDAY=TU,TH",
            expected: Some(&[
                "1997-09-02T09:00:00+00:00",
                "1997-09-04T09:00:00+00:00",
                "1997-09-09T09:00:00+00:00",
            ]),
            expected_len: None,
            limit: 100,
            after: None,
            before: None,
            cross_check: true,
        },
        RRuleCase {
            name: "monthly_basic",
            rruleset: "DTSTART:20120101T090000Z\nRRULE:FREQ=MONTHLY;COUNT=3;BYMONTHDAY=1",
            expected: Some(&[
                "2012-01-01T09:00:00+00:00",
                "2012-02-01T09:00:00+00:00",
                "2012-03-01T09:00:00+00:00",
            ]),
            expected_len: None,
            limit: 100,
            after: None,
            before: None,
            cross_check: true,
        },
        RRuleCase {
            name: "yearly_basic",
            rruleset: "DTSTART:20120101T090000Z\nRRULE:FREQ=YEARLY;COUNT=3",
            expected: Some(&[
                "2012-01-01T09:00:00+00:00",
                "2013-01-01T09:00:00+00:00",
                "2014-01-01T09:00:00+00:00",
            ]),
            expected_len: None,
            limit: 100,
            after: None,
            before: None,
            cross_check: true,
        },
        RRuleCase {
            name: "rfc_every_other_week",
            rruleset: "DTSTART;TZID=America/New_York:19970902T090000\nRRULE:FREQ=WEEKLY;INTERVAL=2;WKST=SU;BYDAY=TU,TH;COUNT=8",
            expected: Some(&[
                "1997-09-02T09:00:00-04:00",
                "1997-09-04T09:00:00-04:00",
                "1997-09-16T09:00:00-04:00",
                "1997-09-18T09:00:00-04:00",
                "1997-09-30T09:00:00-04:00",
                "1997-10-02T09:00:00-04:00",
                "1997-10-14T09:00:00-04:00",
                "1997-10-16T09:00:00-04:00",
            ]),
            expected_len: None,
            limit: 100,
            after: None,
            before: None,
            cross_check: true,
        },
        RRuleCase {
            name: "rfc_monthly_first_friday",
            rruleset: "DTSTART;TZID=America/New_York:19970905T090000\nRRULE:FREQ=MONTHLY;COUNT=10;BYDAY=1FR",
            expected: Some(&[
                "1997-09-05T09:00:00-04:00",
                "1997-10-03T09:00:00-04:00",
                "1997-11-07T09:00:00-05:00",
                "1997-12-05T09:00:00-05:00",
                "1998-01-02T09:00:00-05:00",
                "1998-02-06T09:00:00-05:00",
                "1998-03-06T09:00:00-05:00",
                "1998-04-03T09:00:00-05:00",
                "1998-05-01T09:00:00-04:00",
                "1998-06-05T09:00:00-04:00",
            ]),
            expected_len: None,
            limit: 100,
            after: None,
            before: None,
            cross_check: true,
        },
        RRuleCase {
            name: "last_weekday_of_month",
            rruleset: "DTSTART:20240131T090000Z\nRRULE:FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1;COUNT=3",
            expected: Some(&[
                "2024-01-31T09:00:00+00:00",
                "2024-02-29T09:00:00+00:00",
                "2024-03-29T09:00:00+00:00",
            ]),
            expected_len: None,
            limit: 100,
            after: None,
            before: None,
            cross_check: true,
        },
        RRuleCase {
            name: "rfc_week_number",
            rruleset: "DTSTART:19970512T090000Z\nRRULE:FREQ=YEARLY;BYWEEKNO=20;BYDAY=MO;COUNT=3",
            expected: Some(&[
                "1997-05-12T09:00:00+00:00",
                "1998-05-11T09:00:00+00:00",
                "1999-05-17T09:00:00+00:00",
            ]),
            expected_len: None,
            limit: 100,
            after: None,
            before: None,
            cross_check: true,
        },
        RRuleCase {
            name: "hourly_byhour",
            rruleset: "DTSTART:20240101T090000Z\nRRULE:FREQ=HOURLY;BYHOUR=9,10;COUNT=3",
            expected: Some(&[
                "2024-01-01T09:00:00+00:00",
                "2024-01-01T10:00:00+00:00",
                "2024-01-02T09:00:00+00:00",
            ]),
            expected_len: None,
            limit: 100,
            after: None,
            before: None,
            cross_check: true,
        },
        RRuleCase {
            name: "dst_new_york",
            rruleset: "DTSTART;TZID=America/New_York:20210313T090000\nRRULE:FREQ=DAILY;COUNT=3",
            expected: Some(&[
                "2021-03-13T09:00:00-05:00",
                "2021-03-14T09:00:00-04:00",
                "2021-03-15T09:00:00-04:00",
            ]),
            expected_len: None,
            limit: 100,
            after: None,
            before: None,
            cross_check: true,
        },
        RRuleCase {
            name: "regression_issue_61",
            rruleset: "DTSTART;TZID=Europe/Berlin:18930401T010000\nRRULE:FREQ=DAILY",
            expected: None,
            expected_len: Some(10),
            limit: 10,
            after: None,
            before: None,
            cross_check: false,
        },
        RRuleCase {
            name: "rfc_every_day_in_jan",
            rruleset: "DTSTART;TZID=America/New_York:19980101T090000\nRRULE:FREQ=YEARLY;UNTIL=20000131T140000Z;BYMONTH=1;BYDAY=SU,MO,TU,WE,TH,FR,SA",
            expected: None,
            expected_len: Some(93),
            limit: 200,
            after: None,
            before: None,
            cross_check: true,
        },
        RRuleCase {
            name: "daily_after",
            rruleset: "DTSTART:20120201T093000Z\nRRULE:FREQ=DAILY;COUNT=10",
            expected: None,
            expected_len: Some(6),
            limit: 100,
            after: Some("2012-02-05T00:00:00+00:00"),
            before: None,
            cross_check: false,
        },
        RRuleCase {
            name: "daily_window",
            rruleset: "DTSTART:20120201T093000Z\nRRULE:FREQ=DAILY",
            expected: Some(&[
                "2012-02-03T09:30:00+00:00",
                "2012-02-04T09:30:00+00:00",
                "2012-02-05T09:30:00+00:00",
            ]),
            expected_len: None,
            limit: 100,
            after: Some("2012-02-03T00:00:00+00:00"),
            before: Some("2012-02-06T00:00:00+00:00"),
            cross_check: false,
        },
        RRuleCase {
            name: "leap_day_skip_forward",
            rruleset: "DTSTART:20240229T090000Z\nRRULE:RSCALE=GREGORIAN;FREQ=YEARLY;SKIP=FORWARD;COUNT=3",
            expected: Some(&[
                "2024-02-29T09:00:00+00:00",
                "2025-03-01T09:00:00+00:00",
                "2026-03-01T09:00:00+00:00",
            ]),
            expected_len: None,
            limit: 100,
            after: None,
            before: None,
            cross_check: false,
        },
        RRuleCase {
            name: "month_end_skip_forward_no_repeats",
            rruleset: "DTSTART:20240331T090000Z\nRRULE:RSCALE=GREGORIAN;FREQ=MONTHLY;BYMONTHDAY=1,31;SKIP=FORWARD;COUNT=8",
            expected: Some(&[
                "2024-03-31T09:00:00+00:00",
                "2024-04-01T09:00:00+00:00",
                "2024-05-01T09:00:00+00:00",
                "2024-05-31T09:00:00+00:00",
                "2024-06-01T09:00:00+00:00",
                "2024-07-01T09:00:00+00:00",
                "2024-07-31T09:00:00+00:00",
                "2024-08-01T09:00:00+00:00",
            ]),
            expected_len: None,
            limit: 100,
            after: None,
            before: None,
            cross_check: false,
        },
    ]
}

fn parse_set(case: &RRuleCase) -> (Time, Recurrence) {
    let mut dtstart = None;
    let mut rule = None;
    for line in case.rruleset.lines() {
        let (head, value) = line
            .split_once(':')
            .unwrap_or_else(|| panic!("Case {} has a line without a value", case.name));
        if let Some(params) = head.strip_prefix("DTSTART") {
            let mut start: Time = value
                .parse()
                .unwrap_or_else(|err| panic!("Failed to parse DTSTART of {}: {err}", case.name));
            if let Some(tzid) = params.strip_prefix(";TZID=") {
                let zone = Zone::from_tzid(tzid)
                    .unwrap_or_else(|| panic!("Unknown TZID {tzid} in {}", case.name));
                start = start.with_zone(zone);
            }
            dtstart = Some(start);
        } else if head == "RRULE" {
            rule = Some(
                value
                    .parse::<Recurrence>()
                    .unwrap_or_else(|err| panic!("Failed to parse RRULE of {}: {err}", case.name)),
            );
        }
    }
    match (dtstart, rule) {
        (Some(dtstart), Some(rule)) => (dtstart, rule),
        _ => panic!("Case {} needs DTSTART and RRULE", case.name),
    }
}

/// Epoch seconds of the case's occurrences from [`RecurIterator`].
pub fn expand_case(case: &RRuleCase) -> Vec<i64> {
    let (dtstart, rule) = parse_set(case);
    let mut iterator = RecurIterator::new(&rule, dtstart)
        .unwrap_or_else(|err| panic!("Failed to build iterator for {}: {err}", case.name));

    if let Some(after) = case.after {
        let from = utc_time(after);
        let to = case.before.map(utc_time);
        iterator
            .set_range(from, to)
            .unwrap_or_else(|err| panic!("Failed to set range for {}: {err}", case.name));
    }

    iterator
        .take(usize::from(case.limit))
        .map(|t| t.to_epoch_seconds())
        .collect()
}

pub fn assert_case(case: &RRuleCase) {
    let actual_timestamps = expand_case(case);

    if let Some(expected) = case.expected {
        let expected_timestamps: Vec<i64> = expected
            .iter()
            .map(|value| parse_rfc3339(value).timestamp())
            .collect();
        assert_eq!(
            actual_timestamps, expected_timestamps,
            "Case {} did not match",
            case.name
        );
    }

    if let Some(expected_len) = case.expected_len {
        assert_eq!(
            actual_timestamps.len(),
            expected_len,
            "Case {} expected {} occurrences",
            case.name,
            expected_len
        );
    }
}

/// Compares the case against the `rrule` crate's expansion.
pub fn assert_matches_rrule_crate(case: &RRuleCase) {
    let rrule_set: RRuleSet = case
        .rruleset
        .parse()
        .unwrap_or_else(|err| panic!("rrule failed to parse {}: {err}", case.name));
    let reference: Vec<i64> = rrule_set
        .all(case.limit)
        .dates
        .iter()
        .map(chrono::DateTime::timestamp)
        .collect();
    assert_eq!(
        expand_case(case),
        reference,
        "Case {} disagrees with the rrule crate",
        case.name
    );
}

fn utc_time(value: &str) -> Time {
    Time::from_epoch_seconds(parse_rfc3339(value).timestamp(), false, Zone::Utc)
}

fn parse_rfc3339(value: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(value).unwrap_or_else(|err| {
        panic!("Failed to parse rfc3339 value {value}: {err}")
    })
}
