//! Recurrence expansion.

mod calendar;
mod iterator;
pub mod legality;
mod yearday;

pub use calendar::{CalendarBackend, CalendarDate, GregorianBackend, backend_for, supported_calendars};
pub use iterator::{RecurIterator, expand_recurrence};
pub use yearday::YearDaySet;
