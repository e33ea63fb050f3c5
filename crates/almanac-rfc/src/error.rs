use almanac_core::error::{CoreError, ErrorKind, report};
use thiserror::Error;

use crate::rfc::ical::parse::ParseError;

/// RFC model and recurrence errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Bad argument: {0}")]
    BadArg(String),

    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Unimplemented: {0}")]
    Unimplemented(String),

    #[error(transparent)]
    CoreError(#[from] CoreError),
}

impl RfcError {
    /// ## Summary
    /// Returns the error class this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::MalformedData,
            Self::BadArg(_) => ErrorKind::BadArg,
            Self::Usage(_) => ErrorKind::Usage,
            Self::Unimplemented(_) => ErrorKind::Unimplemented,
            Self::CoreError(err) => err.kind(),
        }
    }

    /// ## Summary
    /// Records this error in the calling thread's diagnostic sink and
    /// returns it unchanged.
    #[must_use]
    pub fn report(self) -> Self {
        report(self.kind(), &self.to_string());
        self
    }

    pub(crate) fn usage(detail: impl Into<String>) -> Self {
        Self::Usage(detail.into())
    }
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
