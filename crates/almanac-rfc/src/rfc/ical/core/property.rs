//! iCalendar properties (RFC 5545 §3.8).

use std::fmt;

use almanac_core::constants::{EXTENSION_PREFIX, NO_VALUE_MARKER};

use super::{
    ComponentKind, Handle, OrderedList, Parameter, ParameterKind, PropertyKind, Value, ValueKind,
};
use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::build::fold_line;
use crate::rfc::ical::parse::{ParseError, ParseErrorKind};

/// Position of the parameter walk started by
/// [`Property::first_parameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// The next call starts from the head.
    Start(Option<ParameterKind>),
    At(Handle, Option<ParameterKind>),
    Exhausted(Option<ParameterKind>),
}

impl Cursor {
    const fn filter(self) -> Option<ParameterKind> {
        match self {
            Self::Start(filter) | Self::At(_, filter) | Self::Exhausted(filter) => filter,
        }
    }
}

/// A content line: name, ordered parameters and at most one value.
#[derive(Debug)]
pub struct Property {
    kind: PropertyKind,
    x_name: Option<String>,
    parameters: OrderedList<Parameter>,
    value: Option<Value>,
    owner: Option<ComponentKind>,
    cursor: Cursor,
}

impl Clone for Property {
    /// Deep copy. The copy is detached from any component.
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            x_name: self.x_name.clone(),
            parameters: self.parameters.clone(),
            value: self.value.clone(),
            owner: None,
            cursor: Cursor::Start(None),
        }
    }
}

impl PartialEq for Property {
    /// Compares name, parameters and value; owner and cursor are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.x_name == other.x_name
            && self.parameters == other.parameters
            && self.value == other.value
    }
}

fn passes(filter: Option<ParameterKind>, parameter: &Parameter) -> bool {
    filter.is_none_or(|kind| parameter.kind() == kind)
}

/// Concrete kind named by a `VALUE` parameter for a value.
fn concrete_kind(value: &Value) -> ValueKind {
    match value {
        Value::DateTimeDate(t) if t.is_date => ValueKind::Date,
        Value::DateTimeDate(_) => ValueKind::DateTime,
        Value::DateTimePeriod(p) if !p.end.is_null() || !p.duration.is_zero() => {
            ValueKind::Period
        }
        Value::DateTimePeriod(p) if p.start.is_date => ValueKind::Date,
        Value::DateTimePeriod(_) => ValueKind::DateTime,
        other => other.kind(),
    }
}

impl Property {
    #[must_use]
    pub const fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            x_name: None,
            parameters: OrderedList::new(),
            value: None,
            owner: None,
            cursor: Cursor::Start(None),
        }
    }

    /// ## Summary
    /// Builds an extension property named `name`.
    ///
    /// ## Errors
    /// Returns a bad-argument error unless `name` starts with `X-`.
    pub fn new_x(name: impl Into<String>) -> RfcResult<Self> {
        let name = name.into();
        if !name.starts_with(EXTENSION_PREFIX) {
            return Err(RfcError::BadArg(format!("{name} is not an extension name")).report());
        }
        let mut property = Self::new(PropertyKind::X);
        property.x_name = Some(name);
        Ok(property)
    }

    /// ## Summary
    /// Builds a property from its name. `X-` names become extension
    /// properties.
    ///
    /// ## Errors
    /// Returns a malformed-data error for any other unknown name.
    pub fn new_from_string(name: &str) -> RfcResult<Self> {
        match PropertyKind::from_token(name) {
            Some(PropertyKind::X) => Self::new_x(name),
            Some(kind) => Ok(Self::new(kind)),
            None => Err(RfcError::from(
                ParseError::new(ParseErrorKind::InvalidPropertyName, 0).with_context(name),
            )
            .report()),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PropertyKind {
        self.kind
    }

    #[must_use]
    pub fn x_name(&self) -> Option<&str> {
        self.x_name.as_deref()
    }

    /// The rendered name: the extension name for `X` properties.
    #[must_use]
    pub fn name(&self) -> &str {
        self.x_name.as_deref().unwrap_or(self.kind.as_str())
    }

    /// Kind of the component holding this property, if attached.
    #[must_use]
    pub const fn owner(&self) -> Option<ComponentKind> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<ComponentKind>) {
        self.owner = owner;
    }

    #[must_use]
    pub const fn parameters(&self) -> &OrderedList<Parameter> {
        &self.parameters
    }

    /// Appends a parameter without checking for duplicates.
    pub fn add_parameter(&mut self, parameter: Parameter) -> Handle {
        self.parameters.push(parameter)
    }

    /// ## Summary
    /// Replaces the first parameter of the same kind (and extension name)
    /// with `parameter`, appending when there is none.
    pub fn set_parameter(&mut self, parameter: Parameter) -> Handle {
        if let Some(existing) = self.parameters.find(|p| p.same_slot(&parameter)) {
            self.remove_at(existing);
        }
        self.parameters.push(parameter)
    }

    fn remove_at(&mut self, at: Handle) -> Option<Parameter> {
        if self.cursor == Cursor::At(at, self.cursor.filter()) {
            let filter = self.cursor.filter();
            self.cursor = self
                .parameters
                .prior(at)
                .map_or(Cursor::Start(filter), |prior| Cursor::At(prior, filter));
        }
        self.parameters.remove(at)
    }

    /// Removes the first parameter of `kind`.
    pub fn remove_parameter(&mut self, kind: ParameterKind) -> Option<Parameter> {
        let at = self.parameters.find(|p| p.kind() == kind)?;
        self.remove_at(at)
    }

    /// Removes the first parameter rendered as `name`, ignoring case.
    pub fn remove_parameter_by_name(&mut self, name: &str) -> Option<Parameter> {
        let at = self
            .parameters
            .find(|p| p.name().eq_ignore_ascii_case(name))?;
        self.remove_at(at)
    }

    /// First parameter of `kind`, without moving the cursor.
    #[must_use]
    pub fn parameter(&self, kind: ParameterKind) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.kind() == kind)
    }

    /// ## Summary
    /// Starts a walk over the parameters matching `filter` (`None` for
    /// all) and returns the first.
    pub fn first_parameter(&mut self, filter: Option<ParameterKind>) -> Option<&Parameter> {
        self.cursor = Cursor::Start(filter);
        self.next_parameter(filter)
    }

    /// ## Summary
    /// Continues the walk. A filter different from the one in progress
    /// restarts from the head.
    pub fn next_parameter(&mut self, filter: Option<ParameterKind>) -> Option<&Parameter> {
        let cursor = if self.cursor.filter() == filter {
            self.cursor
        } else {
            Cursor::Start(filter)
        };
        let found = match cursor {
            Cursor::Start(_) => self.parameters.find(|p| passes(filter, p)),
            Cursor::At(at, _) => self.parameters.find_next(at, |p| passes(filter, p)),
            Cursor::Exhausted(_) => None,
        };
        self.cursor = found.map_or(Cursor::Exhausted(filter), |at| Cursor::At(at, filter));
        found.and_then(|at| self.parameters.get(at))
    }

    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn value_mut(&mut self) -> Option<&mut Value> {
        self.value.as_mut()
    }

    /// Replaces the value, dropping the previous one.
    pub fn set_value(&mut self, value: Value) {
        self.value = Some(value);
    }

    pub fn take_value(&mut self) -> Option<Value> {
        self.value.take()
    }

    /// ## Summary
    /// Returns the value kind in force: the `VALUE` parameter when present,
    /// otherwise the property's default.
    #[must_use]
    pub fn declared_value_kind(&self) -> Option<ValueKind> {
        self.parameter(ParameterKind::Value)
            .and_then(|p| ValueKind::from_token(p.value()))
            .or_else(|| self.kind.default_value_kind())
    }

    /// ## Summary
    /// Parses `text` as the declared value kind (TEXT when none is
    /// declared) and stores it.
    ///
    /// ## Errors
    /// Returns a malformed-data error when `text` does not parse.
    pub fn set_value_from_str(&mut self, text: &str) -> RfcResult<()> {
        let kind = self.declared_value_kind().unwrap_or(ValueKind::Text);
        self.value = Some(Value::parse(kind, text)?);
        Ok(())
    }

    fn value_parameter(&self) -> Option<ValueKind> {
        let effective = self
            .parameter(ParameterKind::Value)
            .and_then(|p| ValueKind::from_token(p.value()))
            .or_else(|| self.value.as_ref().map(concrete_kind))?;
        let default = self.kind.default_value_kind();
        (effective != ValueKind::X && Some(effective) != default).then_some(effective)
    }

    /// ## Summary
    /// Renders the folded content line, without a trailing CRLF.
    #[must_use]
    pub fn render(&self) -> String {
        let mut line = String::from(self.name());
        if let Some(kind) = self.value_parameter() {
            line.push_str(";VALUE=");
            line.push_str(kind.as_str());
        }
        for parameter in self.parameters.iter().filter(|p| p.kind() != ParameterKind::Value) {
            line.push(';');
            line.push_str(&parameter.to_string());
        }
        line.push(':');
        match &self.value {
            Some(value) => line.push_str(&value.to_string()),
            None => line.push_str(NO_VALUE_MARKER),
        }
        fold_line(&line)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
#[path = "property_tests.rs"]
mod tests;
