use almanac_rfc::rfc::ical::core::{
    Component, ComponentKind, Duration, Parameter, ParameterKind, Period, Property, PropertyKind,
    Recurrence, Time, Value, ValueKind,
};

#[test]
fn recurrence_rules_render_canonically() {
    let rules = [
        "FREQ=DAILY;COUNT=5",
        "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE;WKST=SU",
        "FREQ=MONTHLY;BYDAY=-1FR",
        "FREQ=YEARLY;UNTIL=20301231T235959Z;BYMONTHDAY=1;BYMONTH=1,7",
        "RSCALE=GREGORIAN;FREQ=YEARLY;BYMONTHDAY=29;BYMONTH=2;SKIP=BACKWARD",
    ];
    for text in rules {
        let rule: Recurrence = text.parse().unwrap();
        assert_eq!(rule.to_string(), text);
    }

    let shuffled: Recurrence = "BYDAY=TU;COUNT=2;FREQ=WEEKLY".parse().unwrap();
    assert_eq!(shuffled.to_string(), "FREQ=WEEKLY;COUNT=2;BYDAY=TU");
}

#[test]
fn durations_and_periods_survive_text() {
    for text in ["P1W", "-P2DT3H", "PT45M10S", "PT0S"] {
        let duration: Duration = text.parse().unwrap();
        assert_eq!(duration.to_string(), text);
    }
    for text in ["20240101T090000Z/PT1H", "20240101T090000Z/20240101T103000Z"] {
        let period: Period = text.parse().unwrap();
        assert_eq!(period.to_string(), text);
    }
}

#[test]
fn event_renders_as_content_lines() {
    let mut start = Property::new(PropertyKind::Dtstart);
    start.add_parameter(Parameter::new(ParameterKind::Tzid, "Europe/Paris").unwrap());
    start.set_value(Value::parse(ValueKind::DateTime, "20240101T090000").unwrap());

    let mut rrule = Property::new(PropertyKind::Rrule);
    rrule.set_value(Value::parse(ValueKind::Recur, "FREQ=WEEKLY;BYDAY=MO").unwrap());

    let mut summary = Property::new(PropertyKind::Summary);
    summary.set_value_from_str("Team sync\\, room 4").unwrap();

    let mut event = Component::new(ComponentKind::Vevent);
    event.add_property(start);
    event.add_property(rrule);
    event.add_property(summary);

    let mut calendar = Component::new(ComponentKind::Vcalendar);
    calendar.add_component(event);

    assert_eq!(
        calendar.render(),
        "BEGIN:VCALENDAR\r\n\
         BEGIN:VEVENT\r\n\
         DTSTART;TZID=Europe/Paris:20240101T090000\r\n\
         RRULE:FREQ=WEEKLY;BYDAY=MO\r\n\
         SUMMARY:Team sync\\, room 4\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    );
}

#[test]
fn times_parse_back_from_display() {
    for text in ["20240229", "20240101T090000", "20240101T090000Z"] {
        let time: Time = text.parse().unwrap();
        assert_eq!(time.to_string(), text);
    }
}
