//! iCalendar text parsers (RFC 5545 §3.3, RFC 7529).
//!
//! - `values`: DATE, DATE-TIME, TIME, DURATION, PERIOD, UTC-OFFSET and the
//!   scalar kinds
//! - `recur`: RECUR rules, including the BY-rule legality check

mod error;
pub mod recur;
pub mod values;

pub use error::{ParseError, ParseErrorKind, ParseResult};
