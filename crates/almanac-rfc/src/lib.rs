//! RFC 5545 / RFC 7529 calendar model and recurrence expansion.

pub mod error;
pub mod rfc;
