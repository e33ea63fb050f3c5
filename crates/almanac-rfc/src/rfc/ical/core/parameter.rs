//! Property parameters (RFC 5545 §3.2).

use std::fmt;

use almanac_core::constants::EXTENSION_PREFIX;

use super::{ParameterKind, ValueKind};
use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::build::escape_param_value;
use crate::rfc::ical::parse::{ParseError, ParseErrorKind};

/// A `NAME=value` pair attached to a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    kind: ParameterKind,
    x_name: Option<String>,
    values: Vec<String>,
}

fn invalid(name: &str, value: &str) -> RfcError {
    RfcError::from(
        ParseError::new(ParseErrorKind::InvalidParameter, 0).with_context(format!("{name}={value}")),
    )
    .report()
}

/// ## Summary
/// Checks `value` against the registry of an enumerated kind. Extension
/// tokens are always accepted; free-form kinds accept anything.
fn check_value(kind: ParameterKind, value: &str) -> RfcResult<()> {
    if value.starts_with(EXTENSION_PREFIX) {
        return Ok(());
    }
    let known = match kind {
        ParameterKind::Value => ValueKind::from_token(value).is_some(),
        _ => kind
            .enumerated_values()
            .is_none_or(|allowed| allowed.contains(&value)),
    };
    if known {
        Ok(())
    } else {
        Err(invalid(kind.as_str(), value))
    }
}

impl Parameter {
    /// ## Summary
    /// Builds a parameter of a registered kind.
    ///
    /// ## Errors
    /// Returns a bad-argument error for the `X` kind (use
    /// [`Parameter::new_x`]) and a malformed-data error when an enumerated
    /// kind gets an unregistered value.
    pub fn new(kind: ParameterKind, value: impl Into<String>) -> RfcResult<Self> {
        Self::with_values(kind, vec![value.into()])
    }

    /// ## Summary
    /// Builds a parameter carrying several values, as DELEGATED-TO and
    /// MEMBER do.
    ///
    /// ## Errors
    /// Same as [`Parameter::new`], plus a bad-argument error when `values`
    /// is empty or the kind takes a single value and several are given.
    pub fn with_values(kind: ParameterKind, values: Vec<String>) -> RfcResult<Self> {
        if kind == ParameterKind::X {
            return Err(RfcError::BadArg("X parameters need a name".into()).report());
        }
        if values.is_empty() || (values.len() > 1 && !kind.is_multi_valued()) {
            let expected = if kind.is_multi_valued() {
                "one or more values"
            } else {
                "exactly one value"
            };
            return Err(RfcError::BadArg(format!("{kind} takes {expected}")).report());
        }
        for value in &values {
            check_value(kind, value)?;
        }
        Ok(Self {
            kind,
            x_name: None,
            values,
        })
    }

    /// ## Summary
    /// Builds an extension parameter named `name`.
    ///
    /// ## Errors
    /// Returns a bad-argument error unless `name` starts with `X-`.
    pub fn new_x(name: impl Into<String>, value: impl Into<String>) -> RfcResult<Self> {
        let name = name.into();
        if !name.starts_with(EXTENSION_PREFIX) {
            return Err(RfcError::BadArg(format!("{name} is not an extension name")).report());
        }
        Ok(Self {
            kind: ParameterKind::X,
            x_name: Some(name),
            values: vec![value.into()],
        })
    }

    /// ## Summary
    /// Parses `NAME=value`, splitting multi-valued kinds on commas and
    /// stripping surrounding double quotes.
    ///
    /// ## Errors
    /// Returns a malformed-data error when there is no `=` or the name is
    /// neither registered nor an extension name.
    pub fn from_string(text: &str) -> RfcResult<Self> {
        let (name, raw) = text.split_once('=').ok_or_else(|| invalid(text, ""))?;
        let kind = ParameterKind::from_token(name).ok_or_else(|| invalid(name, raw))?;
        let unquote = |v: &str| v.trim_matches('"').to_string();
        if kind == ParameterKind::X {
            return Self::new_x(name, unquote(raw));
        }
        let values = if kind.is_multi_valued() {
            raw.split(',').map(unquote).collect()
        } else {
            vec![unquote(raw)]
        };
        Self::with_values(kind, values)
    }

    #[must_use]
    pub const fn kind(&self) -> ParameterKind {
        self.kind
    }

    #[must_use]
    pub fn x_name(&self) -> Option<&str> {
        self.x_name.as_deref()
    }

    /// The rendered name: the extension name for `X` parameters.
    #[must_use]
    pub fn name(&self) -> &str {
        self.x_name.as_deref().unwrap_or(self.kind.as_str())
    }

    /// First value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.values.first().map_or("", String::as_str)
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// ## Summary
    /// Replaces every value with `value`.
    ///
    /// ## Errors
    /// Returns a malformed-data error when an enumerated kind gets an
    /// unregistered value.
    pub fn set_value(&mut self, value: impl Into<String>) -> RfcResult<()> {
        let value = value.into();
        if self.kind != ParameterKind::X {
            check_value(self.kind, &value)?;
        }
        self.values = vec![value];
        Ok(())
    }

    /// Returns whether both parameters have the same kind and, for `X`,
    /// the same extension name.
    #[must_use]
    pub fn same_slot(&self, other: &Self) -> bool {
        self.kind == other.kind && self.x_name == other.x_name
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.name())?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(&escape_param_value(value))?;
        }
        Ok(())
    }
}
