/// Token prefix marking non-standard (extension) names.
pub const EXTENSION_PREFIX: &str = "X-";

/// Prefix of the library-private extension names (`X-LIC-ERROR`, ...).
pub const LIBRARY_PREFIX: &str = const_str::concat!(EXTENSION_PREFIX, "LIC-");

/// Marker emitted in place of a value when a property has none.
pub const NO_VALUE_MARKER: &str = "ERROR: No Value";

/// Last calendar year the recurrence engine will produce.
pub const MAX_SUPPORTED_YEAR: i32 = 2582;

/// Default tracing filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";
