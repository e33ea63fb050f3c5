//! iCalendar value and recurrence parse errors.

use std::fmt;

use almanac_core::error::{ErrorKind, report};

/// Result type for iCalendar parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// An error that occurred while parsing a value or rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Byte offset into the input where the problem was detected.
    pub position: usize,
    /// Optional detail, such as the offending token.
    pub context: Option<String>,
}

impl ParseError {
    #[must_use]
    pub const fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self {
            kind,
            position,
            context: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// ## Summary
    /// Records the failure as malformed data in the calling thread's
    /// diagnostic sink and hands the error back.
    ///
    /// ## Panics
    /// Panics when malformed data is fatal under the current policy.
    #[must_use]
    pub fn report(self) -> Self {
        report(ErrorKind::MalformedData, &self.to_string());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.position)?;
        if let Some(context) = &self.context {
            write!(f, ": {context}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// The kind of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    InvalidDate,
    InvalidTime,
    InvalidDateTime,
    InvalidDuration,
    InvalidPeriod,
    InvalidUtcOffset,
    InvalidBoolean,
    InvalidInteger,
    InvalidFloat,
    InvalidGeo,
    /// A token outside an enumerated value set.
    InvalidEnumeration,
    InvalidRRule,
    InvalidFrequency,
    InvalidWeekday,
    /// UNTIL and COUNT in the same rule.
    UntilCountConflict,
    /// A numeral outside the range its clause allows.
    ValueOutOfRange,
    /// More entries than a BY-rule list holds.
    ListOverflow,
    /// A BY-rule that is not allowed with the rule's frequency.
    IllegalByRule,
    InvalidParameter,
    InvalidPropertyName,
    /// Arithmetic mixing a date with a date-time.
    IncompatibleTimes,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InvalidDate => "invalid date",
            Self::InvalidTime => "invalid time",
            Self::InvalidDateTime => "invalid date-time",
            Self::InvalidDuration => "invalid duration",
            Self::InvalidPeriod => "invalid period",
            Self::InvalidUtcOffset => "invalid UTC offset",
            Self::InvalidBoolean => "invalid boolean",
            Self::InvalidInteger => "invalid integer",
            Self::InvalidFloat => "invalid float",
            Self::InvalidGeo => "invalid geo",
            Self::InvalidEnumeration => "invalid enumerated value",
            Self::InvalidRRule => "invalid recurrence rule",
            Self::InvalidFrequency => "invalid frequency",
            Self::InvalidWeekday => "invalid weekday",
            Self::UntilCountConflict => "UNTIL and COUNT are mutually exclusive",
            Self::ValueOutOfRange => "value out of range",
            Self::ListOverflow => "too many list entries",
            Self::IllegalByRule => "BY-rule not allowed with this frequency",
            Self::InvalidParameter => "invalid parameter",
            Self::InvalidPropertyName => "invalid property name",
            Self::IncompatibleTimes => "incompatible times",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
