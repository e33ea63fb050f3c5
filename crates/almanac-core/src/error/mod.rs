use std::fmt;

use thiserror::Error;

mod policy;
mod sink;

pub use policy::{
    ErrorState, SuppressGuard, error_state, errors_are_fatal, is_fatal, set_error_state,
    set_errors_are_fatal, suppress,
};
pub use sink::{clear_error, last_error, report, restore_error};

/// Error classes shared by every almanac crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required argument was absent or invalid.
    BadArg,
    /// Storage could not be reserved.
    Allocation,
    /// Input text violates the grammar or numeric range of its kind.
    MalformedData,
    /// An invariant the library itself maintains was broken.
    Internal,
    /// The API was called out of order or with the wrong kind of object.
    Usage,
    /// A recognized feature that is not supported.
    Unimplemented,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::BadArg,
        Self::Allocation,
        Self::MalformedData,
        Self::Internal,
        Self::Usage,
        Self::Unimplemented,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadArg => "BADARG",
            Self::Allocation => "ALLOCATION",
            Self::MalformedData => "MALFORMEDDATA",
            Self::Internal => "INTERNAL",
            Self::Usage => "USAGE",
            Self::Unimplemented => "UNIMPLEMENTED",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::BadArg => 0,
            Self::Allocation => 1,
            Self::MalformedData => 2,
            Self::Internal => 3,
            Self::Usage => 4,
            Self::Unimplemented => 5,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core-level errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Allocation failed: {0}")]
    Allocation(String),
}

impl CoreError {
    /// ## Summary
    /// Returns the error class this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Allocation(_) => ErrorKind::Allocation,
        }
    }

    /// ## Summary
    /// Records this error in the calling thread's diagnostic sink and hands
    /// it back, so it can sit inside `map_err`.
    #[must_use]
    pub fn report(self) -> Self {
        report(self.kind(), &self.to_string());
        self
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
