//! Shared foundations for the almanac crates.
//!
//! - `error`: error kinds, the fatal/non-fatal policy and the per-thread
//!   diagnostic sink
//! - `config`: layered settings loading
//! - `constants`: string and numeric constants shared across crates
//! - `logging`: tracing subscriber bootstrap

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
