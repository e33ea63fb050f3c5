//! iCalendar RFC 5545 implementation.
//!
//! - `core`: kind registries, the ordered list, values, parameters,
//!   properties, calendar time and recurrence rules
//! - `parse`: text parsers for values and recurrence rules
//! - `build`: content line folding
//! - `expand`: recurrence expansion and calendar backends
//!
//! ## Example
//!
//! ```rust
//! use almanac_rfc::rfc::ical::core::{Recurrence, Time};
//! use almanac_rfc::rfc::ical::expand::RecurIterator;
//!
//! let rule: Recurrence = "FREQ=DAILY;COUNT=3".parse().unwrap();
//! let start: Time = "20240101T090000Z".parse().unwrap();
//! let days: Vec<String> = RecurIterator::new(&rule, start)
//!     .unwrap()
//!     .map(|t| t.to_string())
//!     .collect();
//! assert_eq!(days, ["20240101T090000Z", "20240102T090000Z", "20240103T090000Z"]);
//! ```

pub mod build;
pub mod core;
pub mod expand;
pub mod parse;
