//! iCalendar serializer (RFC 5545).
//!
//! Output is deterministic: properties and parameters follow a fixed order
//! and events are sorted by start, then UID.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::escape::{escape_param_value, escape_text};
use super::fold::fold_line;
use crate::rfc::ical::core::{Component, ComponentKind, ICalendar, Parameter, Property, Value};

const CALENDAR_PROPERTY_ORDER: &[&str] = &["PRODID", "VERSION", "CALSCALE", "METHOD"];

const EVENT_PROPERTY_ORDER: &[&str] = &[
    "UID",
    "DTSTAMP",
    "DTSTART",
    "DTEND",
    "SUMMARY",
    "ORGANIZER",
    "DESCRIPTION",
    "LOCATION",
    "RELATED-TO",
    "ATTACH",
];

const PARAM_ORDER: &[&str] = &["VALUE", "ENCODING", "FMTTYPE", "CN", "TZID"];

/// Serializes an iCalendar document to a string.
#[must_use]
pub fn serialize(ical: &ICalendar) -> String {
    serialize_component(&ical.root)
}

/// Serializes a component and its children.
#[must_use]
pub fn serialize_component(component: &Component) -> String {
    let mut out = fold_line(&format!("BEGIN:{}", component.kind));

    for prop in canonical_property_order(&component.properties, component.kind) {
        out.push_str(&serialize_property(prop));
    }

    for child in canonical_component_order(&component.children) {
        out.push_str(&serialize_component(child));
    }

    out.push_str(&fold_line(&format!("END:{}", component.kind)));
    out
}

/// Serializes one property as a folded content line.
#[must_use]
pub fn serialize_property(prop: &Property) -> String {
    let mut line = prop.name.clone();

    for param in canonical_param_order(&prop.params) {
        line.push(';');
        line.push_str(&serialize_parameter(param));
    }

    line.push(':');
    line.push_str(&serialize_value(&prop.value));

    fold_line(&line)
}

fn serialize_parameter(param: &Parameter) -> String {
    let values: Vec<String> = param.values.iter().map(|v| escape_param_value(v)).collect();
    format!("{}={}", param.name, values.join(","))
}

fn serialize_value(value: &Value) -> String {
    match value {
        Value::Text(text) => escape_text(text),
        Value::DateTime(dt) => dt.format("%Y%m%dT%H%M%SZ").to_string(),
        Value::Uri(uri) => uri.clone(),
        Value::Binary(data) => STANDARD.encode(data),
    }
}

/// Known properties first in a fixed order, then the rest as inserted.
fn canonical_property_order(props: &[Property], kind: ComponentKind) -> Vec<&Property> {
    let order = match kind {
        ComponentKind::Calendar => CALENDAR_PROPERTY_ORDER,
        ComponentKind::Event => EVENT_PROPERTY_ORDER,
    };
    ordered_by_name(props, order, |prop| prop.name.as_str())
}

fn canonical_param_order(params: &[Parameter]) -> Vec<&Parameter> {
    ordered_by_name(params, PARAM_ORDER, |param| param.name.as_str())
}

fn ordered_by_name<'a, T>(
    items: &'a [T],
    order: &[&str],
    name: impl Fn(&T) -> &str,
) -> Vec<&'a T> {
    let rank = |item: &T| {
        order
            .iter()
            .position(|known| name(item).eq_ignore_ascii_case(known))
            .unwrap_or(order.len())
    };

    let mut ordered: Vec<&T> = items.iter().collect();
    // Stable, so repeated and unknown names keep insertion order.
    ordered.sort_by_key(|item| rank(item));
    ordered
}

/// Events sorted by DTSTART, then UID. Other children keep insertion order.
fn canonical_component_order(children: &[Component]) -> Vec<&Component> {
    let mut ordered: Vec<&Component> = children.iter().collect();
    ordered.sort_by(|a, b| match (a.kind, b.kind) {
        (ComponentKind::Event, ComponentKind::Event) => {
            let start = |c: &Component| c.get_property("DTSTART").and_then(Property::as_datetime);
            start(a)
                .cmp(&start(b))
                .then_with(|| a.uid().unwrap_or("").cmp(b.uid().unwrap_or("")))
        }
        _ => std::cmp::Ordering::Equal,
    });
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(uid: &str, hour: u32) -> Component {
        let mut event = Component::event();
        event.add_property(Property::text("SUMMARY", format!("Event {uid}")));
        event.add_property(Property::text("UID", uid));
        event.add_property(Property::datetime(
            "DTSTART",
            Utc.with_ymd_and_hms(2024, 3, 4, hour, 0, 0).unwrap(),
        ));
        event
    }

    #[test]
    fn test_serialize_calendar() {
        let mut ical = ICalendar::new("-//Test//Test//EN");
        ical.add_event(event("a", 9));

        let output = serialize(&ical);

        assert!(output.starts_with(
            "BEGIN:VCALENDAR\r\nPRODID:-//Test//Test//EN\r\nVERSION:2.0\r\nCALSCALE:GREGORIAN\r\n"
        ));
        assert!(output.contains("BEGIN:VEVENT\r\nUID:a\r\nDTSTART:20240304T090000Z\r\nSUMMARY:Event a\r\nEND:VEVENT\r\n"));
        assert!(output.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn test_events_sorted_by_start_then_uid() {
        let mut ical = ICalendar::new("-//Test//Test//EN");
        ical.add_event(event("late", 15));
        ical.add_event(event("b", 9));
        ical.add_event(event("a", 9));

        let output = serialize(&ical);
        let a = output.find("UID:a").unwrap();
        let b = output.find("UID:b").unwrap();
        let late = output.find("UID:late").unwrap();
        assert!(a < b && b < late);
    }

    #[test]
    fn test_serialize_property_params_and_binary() {
        let prop = Property::binary("ATTACH", b"hello".to_vec())
            .with_param(Parameter::new("X-APPLE-FILENAME", "episode.xml"))
            .with_param(Parameter::fmt_type("application/xml"));

        assert_eq!(
            serialize_property(&prop),
            "ATTACH;VALUE=BINARY;ENCODING=BASE64;FMTTYPE=application/xml;X-APPLE-FILENAME=episode.xml:aGVsbG8=\r\n"
        );
    }

    #[test]
    fn test_serialize_uri_with_quoted_cn() {
        let prop = Property::uri("ORGANIZER", "mailto:doe@example.org")
            .with_param(Parameter::common_name("Doe, Jane"));

        assert_eq!(
            serialize_property(&prop),
            "ORGANIZER;CN=\"Doe, Jane\":mailto:doe@example.org\r\n"
        );
    }

    #[test]
    fn test_serialize_escapes_and_folds_text() {
        let mut event = Component::event();
        event.add_property(Property::text("DESCRIPTION", format!("a,b\n{}", "x".repeat(90))));

        let output = serialize_component(&event);

        assert!(output.contains("DESCRIPTION:a\\,b\\nxxx"));
        assert!(output.contains("\r\n x"));
        let unfolded = output.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("DESCRIPTION:a\\,b\\n{}\r\n", "x".repeat(90))));
    }
}
