//! iCalendar components (RFC 5545 §3.4-3.6).
//!
//! Only the owner side of the model lives here: a component holds its
//! properties and children by value and renders them between `BEGIN` and
//! `END` lines. There is no component text parser.

use std::fmt;

use almanac_core::constants::EXTENSION_PREFIX;

use super::{ComponentKind, Handle, OrderedList, Property, PropertyKind};
use crate::error::{RfcError, RfcResult};

/// A component with its properties and nested components, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    kind: ComponentKind,
    x_name: Option<String>,
    properties: OrderedList<Property>,
    components: OrderedList<Component>,
}

impl Component {
    #[must_use]
    pub const fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            x_name: None,
            properties: OrderedList::new(),
            components: OrderedList::new(),
        }
    }

    /// ## Summary
    /// Builds an extension component named `name`.
    ///
    /// ## Errors
    /// Returns a bad-argument error unless `name` starts with `X-`.
    pub fn new_x(name: impl Into<String>) -> RfcResult<Self> {
        let name = name.into();
        if !name.starts_with(EXTENSION_PREFIX) {
            return Err(RfcError::BadArg(format!("{name} is not an extension name")).report());
        }
        let mut component = Self::new(ComponentKind::X);
        component.x_name = Some(name);
        Ok(component)
    }

    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// The rendered name: the extension name for `X` components.
    #[must_use]
    pub fn name(&self) -> &str {
        self.x_name.as_deref().unwrap_or(self.kind.as_str())
    }

    /// Attaches `property`, taking ownership of it.
    pub fn add_property(&mut self, mut property: Property) -> Handle {
        property.set_owner(Some(self.kind));
        self.properties.push(property)
    }

    /// Detaches the property at `at` and hands it back to the caller.
    pub fn remove_property(&mut self, at: Handle) -> Option<Property> {
        let mut property = self.properties.remove(at)?;
        property.set_owner(None);
        Some(property)
    }

    #[must_use]
    pub fn first_property(&self, kind: PropertyKind) -> Option<&Property> {
        self.properties.iter().find(|p| p.kind() == kind)
    }

    #[must_use]
    pub const fn properties(&self) -> &OrderedList<Property> {
        &self.properties
    }

    pub fn property_mut(&mut self, at: Handle) -> Option<&mut Property> {
        self.properties.get_mut(at)
    }

    pub fn add_component(&mut self, component: Self) -> Handle {
        self.components.push(component)
    }

    pub fn remove_component(&mut self, at: Handle) -> Option<Self> {
        self.components.remove(at)
    }

    #[must_use]
    pub const fn components(&self) -> &OrderedList<Self> {
        &self.components
    }

    /// ## Summary
    /// Renders the component and its children, each content line followed
    /// by CRLF.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        out.push_str("BEGIN:");
        out.push_str(self.name());
        out.push_str("\r\n");
        for property in &self.properties {
            out.push_str(&property.render());
            out.push_str("\r\n");
        }
        for child in &self.components {
            child.render_into(out);
        }
        out.push_str("END:");
        out.push_str(self.name());
        out.push_str("\r\n");
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::ical::core::{Time, Value};

    fn summary(text: &str) -> Property {
        let mut property = Property::new(PropertyKind::Summary);
        property.set_value(Value::Text(text.into()));
        property
    }

    #[test]
    fn attach_and_detach_track_owner() {
        let mut event = Component::new(ComponentKind::Vevent);
        let at = event.add_property(summary("Standup"));
        assert_eq!(
            event.first_property(PropertyKind::Summary).and_then(Property::owner),
            Some(ComponentKind::Vevent)
        );
        let detached = event.remove_property(at).unwrap();
        assert_eq!(detached.owner(), None);
        assert!(event.properties().is_empty());
        assert!(event.remove_property(at).is_none());
    }

    #[test]
    fn renders_nested_components() {
        let mut calendar = Component::new(ComponentKind::Vcalendar);
        let mut event = Component::new(ComponentKind::Vevent);
        let mut start = Property::new(PropertyKind::Dtstart);
        start.set_value(Value::DateTime(Time::date_time(2024, 1, 1, 9, 0, 0)));
        event.add_property(start);
        event.add_property(summary("Standup"));
        calendar.add_component(event);
        assert_eq!(
            calendar.render(),
            "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nDTSTART:20240101T090000\r\n\
             SUMMARY:Standup\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n"
        );
    }

    #[test]
    fn extension_components_use_their_name() {
        let component = Component::new_x("X-WIDGET").unwrap();
        assert_eq!(component.kind(), ComponentKind::X);
        assert_eq!(component.render(), "BEGIN:X-WIDGET\r\nEND:X-WIDGET\r\n");
        assert!(Component::new_x("WIDGET").is_err());
    }
}
