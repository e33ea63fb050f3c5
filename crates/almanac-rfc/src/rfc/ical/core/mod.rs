//! iCalendar core models (RFC 5545, RFC 7529).
//!
//! - Kind registries mapping every enumeration to its canonical token
//! - An ordered list with stable handles, used for parameters,
//!   properties and child components
//! - Values, parameters, properties and a minimal component owner
//! - Calendar time, durations, periods and recurrence rules

mod component;
mod duration;
mod kind;
mod list;
mod parameter;
mod period;
mod property;
mod rrule;
mod time;
mod value;

pub use component::Component;
pub use duration::Duration;
pub use kind::{
    ComponentKind, Method, ParameterKind, PropertyKind, RequestStatus, Status, ValueKind,
};
pub use list::{Handle, Iter, OrderedList};
pub use parameter::Parameter;
pub use period::Period;
pub use property::Property;
pub use rrule::{
    ByList, ByRule, Frequency, LEAP_MONTH, RecurOptions, Recurrence, Skip, Weekday,
    day_position, day_weekday, encode_day, is_leap_month, month_number,
};
pub use time::{
    Time, TimeSpan, Zone, civil_from_days, days_from_civil, days_in_month, days_in_year,
    is_leap_year, ordinal_of, weekday_of,
};
pub use value::Value;
