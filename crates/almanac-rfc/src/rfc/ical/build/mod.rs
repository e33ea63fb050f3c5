//! iCalendar serialization helpers (RFC 5545 §3.1, §3.3.11).
//!
//! - Escape: text and parameter value escaping
//! - Fold: content line folding at 75 octets

mod escape;
mod fold;

pub use escape::{escape_param_value, escape_text};
pub use fold::fold_line;
