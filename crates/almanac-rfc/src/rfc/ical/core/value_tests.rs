use std::cmp::Ordering;

use almanac_core::error::{ErrorKind, clear_error, last_error};

use super::*;
use crate::rfc::ical::core::{Frequency, Zone};

fn parse(kind: ValueKind, token: &str) -> Value {
    Value::parse(kind, token).unwrap()
}

#[test]
fn render_of_parse_is_stable() {
    let cases = [
        (ValueKind::Boolean, "TRUE"),
        (ValueKind::Date, "20240229"),
        (ValueKind::DateTime, "20240101T090000Z"),
        (ValueKind::DateTime, "20240101T090000"),
        (ValueKind::Duration, "-P1DT2H"),
        (ValueKind::Float, "1.5"),
        (ValueKind::Geo, "37.386013;-122.082932"),
        (ValueKind::Integer, "-42"),
        (ValueKind::Period, "20240101T090000Z/PT1H"),
        (ValueKind::Period, "20240101T090000Z/20240101T100000Z"),
        (ValueKind::Recur, "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE"),
        (ValueKind::Text, "Meeting\\, room 4\\; bring notes\\n"),
        (ValueKind::Time, "123000Z"),
        (ValueKind::UtcOffset, "-0800"),
        (ValueKind::UtcOffset, "+053045"),
        (ValueKind::Method, "PUBLISH"),
        (ValueKind::Status, "NEEDS-ACTION"),
        (ValueKind::DateTimeDate, "20240101"),
        (ValueKind::DateTimePeriod, "20240101T090000Z"),
        (ValueKind::Uri, "https://example.com/a?b=c"),
    ];
    for (kind, token) in cases {
        let rendered = parse(kind, token).to_string();
        assert_eq!(rendered, token, "{kind}");
        assert_eq!(parse(kind, &rendered).to_string(), rendered);
    }
}

#[test]
fn parse_keeps_the_requested_kind() {
    assert_eq!(parse(ValueKind::Geo, "1;2").kind(), ValueKind::Geo);
    assert_eq!(parse(ValueKind::Text, "hello").kind(), ValueKind::Text);
    assert_eq!(
        parse(ValueKind::DateTimeDate, "20240101T090000").kind(),
        ValueKind::DateTimeDate
    );
    let rule = parse(ValueKind::Recur, "FREQ=DAILY;COUNT=3");
    assert_eq!(rule.as_recur().unwrap().freq, Frequency::Daily);
}

#[test_log::test]
fn malformed_tokens_are_rejected() {
    let cases = [
        (ValueKind::Boolean, "YES"),
        (ValueKind::Date, "20240101T090000"),
        (ValueKind::DateTime, "20240101"),
        (ValueKind::DateTime, "20240230T090000"),
        (ValueKind::Duration, "P1H"),
        (ValueKind::Integer, "4.2"),
        (ValueKind::UtcOffset, "0800"),
        (ValueKind::Time, "250000"),
        (ValueKind::Method, "SHOUT"),
        (ValueKind::Status, "MAYBE"),
        (ValueKind::Recur, "INTERVAL=2"),
    ];
    for (kind, token) in cases {
        clear_error();
        assert!(Value::parse(kind, token).is_err(), "{kind} {token}");
        assert_eq!(last_error(), Some(ErrorKind::MalformedData));
    }
    clear_error();
}

#[test]
fn none_tokens_are_accepted() {
    assert_eq!(parse(ValueKind::Method, "NONE").as_method().unwrap(), Method::None);
    assert_eq!(parse(ValueKind::Status, "NONE").as_status().unwrap(), Status::None);
}

#[test]
fn compare_orders_same_kinds() {
    let a = parse(ValueKind::Integer, "1");
    let b = parse(ValueKind::Integer, "2");
    assert_eq!(a.compare(&b), Some(Ordering::Less));
    assert_eq!(b.compare(&a), Some(Ordering::Greater));
    assert_eq!(a.compare(&a.clone()), Some(Ordering::Equal));

    let early = parse(ValueKind::DateTime, "20240101T090000Z");
    let late = parse(ValueKind::DateTime, "20240101T100000Z");
    assert_eq!(early.compare(&late), Some(Ordering::Less));

    let short = parse(ValueKind::Duration, "PT1H");
    let long = parse(ValueKind::Duration, "P1D");
    assert_eq!(short.compare(&long), Some(Ordering::Less));
}

#[test]
fn compare_is_unordered_across_kinds_and_nan() {
    let int = Value::Integer(1);
    let float = Value::Float(1.0);
    assert_eq!(int.compare(&float), None);
    assert_eq!(Value::Float(f64::NAN).compare(&Value::Float(1.0)), None);

    let first = Value::Recur(Box::new(Recurrence::new(Frequency::Daily)));
    let second = Value::Recur(Box::new(Recurrence::new(Frequency::Weekly)));
    assert_eq!(first.compare(&second), None);
    assert_eq!(first.compare(&first.clone()), Some(Ordering::Equal));
}

#[test_log::test]
fn accessors_check_the_kind() {
    let mut value = Value::Integer(7);
    assert_eq!(value.as_integer().unwrap(), 7);
    value.set_integer(8).unwrap();
    assert_eq!(value.as_integer().unwrap(), 8);

    clear_error();
    assert!(matches!(value.as_text(), Err(RfcError::Usage(_))));
    assert_eq!(last_error(), Some(ErrorKind::Usage));
    assert!(value.set_boolean(true).is_err());
    assert_eq!(value.kind(), ValueKind::Integer);
    clear_error();
}

#[test]
fn setters_replace_payloads() {
    let mut value = Value::Text("old".into());
    value.set_text("new").unwrap();
    assert_eq!(value.as_text().unwrap(), "new");

    let mut value = Value::DateTime(Time::date_time(2024, 1, 1, 9, 0, 0));
    let moved = Time::date_time(2024, 1, 2, 9, 0, 0).with_zone(Zone::Utc);
    value.set_date_time(moved).unwrap();
    assert_eq!(value.to_string(), "20240102T090000Z");

    let mut value = Value::Recur(Box::new(Recurrence::new(Frequency::Daily)));
    value.set_recur(Recurrence::new(Frequency::Monthly)).unwrap();
    assert_eq!(value.to_string(), "FREQ=MONTHLY");
}

#[test]
fn date_time_period_renders_live_side() {
    let start_only = parse(ValueKind::DateTimePeriod, "20240101T090000Z");
    assert_eq!(start_only.to_string(), "20240101T090000Z");
    let period = parse(ValueKind::DateTimePeriod, "20240101T090000Z/PT30M");
    assert_eq!(period.to_string(), "20240101T090000Z/PT30M");
}
