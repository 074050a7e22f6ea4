//! iCalendar components (RFC 5545 §3.4, §3.6.1).

use super::Property;

/// Component kinds written by the calendar export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// VCALENDAR wrapper component.
    Calendar,
    /// VEVENT component.
    Event,
}

impl ComponentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "VCALENDAR",
            Self::Event => "VEVENT",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An iCalendar component with its properties and nested components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub kind: ComponentKind,
    /// Properties in order of insertion.
    pub properties: Vec<Property>,
    pub children: Vec<Component>,
}

impl Component {
    #[must_use]
    pub const fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a VEVENT component.
    #[must_use]
    pub const fn event() -> Self {
        Self::new(ComponentKind::Event)
    }

    pub fn add_property(&mut self, prop: Property) {
        self.properties.push(prop);
    }

    pub fn add_child(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Returns the first property with the given name.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        let name_upper = name.to_ascii_uppercase();
        self.properties.iter().find(|p| p.name == name_upper)
    }

    /// Returns all properties with the given name.
    #[must_use]
    pub fn get_properties(&self, name: &str) -> Vec<&Property> {
        let name_upper = name.to_ascii_uppercase();
        self.properties
            .iter()
            .filter(|p| p.name == name_upper)
            .collect()
    }

    /// Returns the UID property value if present.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.get_property("UID")?.as_text()
    }

    /// Returns the SUMMARY property value if present.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.get_property("SUMMARY")?.as_text()
    }
}

/// A VCALENDAR document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ICalendar {
    pub root: Component,
}

impl ICalendar {
    /// Creates an empty Gregorian calendar with VERSION 2.0 and the given PRODID.
    #[must_use]
    pub fn new(prodid: &str) -> Self {
        let mut root = Component::new(ComponentKind::Calendar);
        root.add_property(Property::text("PRODID", prodid));
        root.add_property(Property::text("VERSION", "2.0"));
        root.add_property(Property::text("CALSCALE", "GREGORIAN"));
        Self { root }
    }

    pub fn add_event(&mut self, event: Component) {
        self.root.add_child(event);
    }

    /// Returns all VEVENT children in insertion order.
    #[must_use]
    pub fn events(&self) -> Vec<&Component> {
        self.root
            .children
            .iter()
            .filter(|c| c.kind == ComponentKind::Event)
            .collect()
    }

    #[must_use]
    pub fn prodid(&self) -> Option<&str> {
        self.root.get_property("PRODID")?.as_text()
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.root.get_property("VERSION")?.as_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_calendar_headers() {
        let ical = ICalendar::new("-//Test//Test//EN");

        assert_eq!(ical.prodid(), Some("-//Test//Test//EN"));
        assert_eq!(ical.version(), Some("2.0"));
        assert_eq!(
            ical.root.get_property("CALSCALE").and_then(Property::as_text),
            Some("GREGORIAN")
        );
        assert!(ical.events().is_empty());
    }

    #[test]
    fn test_event_accessors() {
        let mut event = Component::event();
        event.add_property(Property::text("UID", "evt-1"));
        event.add_property(Property::text("SUMMARY", "Lecture 01"));
        event.add_property(Property::binary("ATTACH", b"a".to_vec()));
        event.add_property(Property::binary("ATTACH", b"b".to_vec()));

        let mut ical = ICalendar::new("-//Test//Test//EN");
        ical.add_event(event);

        let events = ical.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].uid(), Some("evt-1"));
        assert_eq!(events[0].summary(), Some("Lecture 01"));
        assert_eq!(events[0].get_properties("attach").len(), 2);
    }
}
