//! Builds the recording calendar published to capture agents.

use chrono::{DateTime, TimeDelta, Utc};

use kairos_core::config::CalendarConfig;
use kairos_rfc::rfc::ical::build::serialize;
use kairos_rfc::rfc::ical::core::{Component, ICalendar, Parameter, Property};

use super::{ScheduledEvent, SeriesCache};

const EPISODE_FILENAME: &str = "episode.xml";
const SERIES_FILENAME: &str = "series.xml";
const AGENT_PROPERTIES_FILENAME: &str = "org.opencast.capture.agent.properties";

/// Accumulates scheduled events into one VCALENDAR.
#[derive(Debug, Clone)]
pub struct CalendarGenerator {
    calendar: ICalendar,
    organizer_domain: String,
    past_event_margin: TimeDelta,
}

impl CalendarGenerator {
    #[must_use]
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            calendar: ICalendar::new(&config.product_id),
            organizer_domain: config.organizer_domain.clone(),
            past_event_margin: TimeDelta::minutes(i64::from(config.past_event_margin_minutes)),
        }
    }

    /// ## Summary
    /// Adds `event` as a VEVENT unless it ended more than the configured margin before `now`.
    ///
    /// The episode metadata, the series metadata (when the series is known)
    /// and the agent properties are attached inline as base64.
    ///
    /// Returns whether the event was added.
    pub fn add_event(
        &mut self,
        event: &ScheduledEvent,
        series: &mut SeriesCache<'_>,
        now: DateTime<Utc>,
    ) -> bool {
        tracing::debug!(event_id = %event.id, "Creating VEVENT for scheduled event");

        if event.period.end + self.past_event_margin < now {
            tracing::debug!(
                event_id = %event.id,
                end = %event.period.end,
                "Event ended before the export margin, skipping"
            );
            return false;
        }

        let mut vevent = Component::event();
        vevent.add_property(Property::text("UID", &event.id));
        vevent.add_property(Property::datetime("DTSTAMP", now));
        vevent.add_property(Property::datetime("DTSTART", event.period.start));
        vevent.add_property(Property::datetime("DTEND", event.period.end));
        vevent.add_property(Property::text("SUMMARY", &event.title));

        if let Some(creator) = non_blank(event.creator.as_deref()) {
            vevent.add_property(
                Property::uri("ORGANIZER", self.organizer_uri(creator))
                    .with_param(Parameter::common_name(creator)),
            );
        }
        if let Some(description) = non_blank(event.description.as_deref()) {
            vevent.add_property(Property::text("DESCRIPTION", description));
        }
        vevent.add_property(Property::text("LOCATION", &event.agent_id));

        let series_id = non_blank(event.series_id.as_deref());
        if let Some(series_id) = series_id {
            vevent.add_property(Property::text("RELATED-TO", series_id));
        }

        vevent.add_property(attachment(
            "application/xml",
            EPISODE_FILENAME,
            &event.episode_catalog,
        ));

        if let Some(series_xml) = series_id.and_then(|id| series.catalog_xml(id)) {
            tracing::debug!(event_id = %event.id, ?series_id, "Attaching series metadata");
            vevent.add_property(attachment("application/xml", SERIES_FILENAME, series_xml));
        } else {
            tracing::debug!(event_id = %event.id, "No series metadata for event");
        }

        vevent.add_property(attachment(
            "application/text",
            AGENT_PROPERTIES_FILENAME,
            &event.agent_properties,
        ));

        self.calendar.add_event(vevent);
        true
    }

    #[must_use]
    pub const fn calendar(&self) -> &ICalendar {
        &self.calendar
    }

    /// Serializes the calendar to iCalendar text.
    #[must_use]
    pub fn to_ics(&self) -> String {
        serialize(&self.calendar)
    }

    fn organizer_uri(&self, creator: &str) -> String {
        format!(
            "mailto:{}@{}",
            urlencoding::encode(creator),
            self.organizer_domain
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn attachment(media_type: &str, filename: &str, content: &str) -> Property {
    Property::binary("ATTACH", content.as_bytes())
        .with_param(Parameter::fmt_type(media_type))
        .with_param(Parameter::new("X-APPLE-FILENAME", filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::series::tests::FakeCatalog;
    use chrono::TimeZone;
    use kairos_core::types::Period;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn scheduled(id: &str, series_id: Option<&str>) -> ScheduledEvent {
        ScheduledEvent {
            id: id.to_string(),
            title: "Physics 101, Lecture 01".to_string(),
            creator: Some("Jane Doe".to_string()),
            description: Some("Room 3".to_string()),
            series_id: series_id.map(str::to_string),
            agent_id: "hall-a".to_string(),
            period: Period::new(utc(2024, 3, 4, 9, 0), utc(2024, 3, 4, 10, 30)).unwrap(),
            episode_catalog: "<episode/>".to_string(),
            agent_properties: "capture.device.names=cam".to_string(),
        }
    }

    fn unfolded(ics: &str) -> String {
        ics.replace("\r\n ", "")
    }

    #[test]
    fn test_add_event_writes_vevent() {
        let catalog = FakeCatalog::with_series("physics", "<series/>");
        let mut cache = SeriesCache::new(&catalog);
        let mut generator = CalendarGenerator::new(&CalendarConfig::default());

        assert!(generator.add_event(
            &scheduled("evt-1", Some("physics")),
            &mut cache,
            utc(2024, 3, 1, 0, 0)
        ));

        let ics = unfolded(&generator.to_ics());
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nPRODID:-//Kairos//Scheduler 0.1//EN\r\n"));
        assert!(ics.contains("UID:evt-1\r\nDTSTAMP:20240301T000000Z\r\n"));
        assert!(ics.contains("DTSTART:20240304T090000Z\r\nDTEND:20240304T103000Z\r\n"));
        assert!(ics.contains("SUMMARY:Physics 101\\, Lecture 01\r\n"));
        assert!(ics.contains("ORGANIZER;CN=Jane Doe:mailto:Jane%20Doe@kairos.local\r\n"));
        assert!(ics.contains("DESCRIPTION:Room 3\r\n"));
        assert!(ics.contains("LOCATION:hall-a\r\n"));
        assert!(ics.contains("RELATED-TO:physics\r\n"));
        assert!(ics.contains(
            "ATTACH;VALUE=BINARY;ENCODING=BASE64;FMTTYPE=application/xml;X-APPLE-FILENAME=episode.xml:PGVwaXNvZGUvPg==\r\n"
        ));
        assert!(ics.contains("X-APPLE-FILENAME=series.xml:PHNlcmllcy8+\r\n"));
        assert!(ics.contains(
            "FMTTYPE=application/text;X-APPLE-FILENAME=org.opencast.capture.agent.properties:"
        ));
    }

    #[test]
    fn test_organizer_escapes_uri_characters() {
        let catalog = FakeCatalog::default();
        let mut cache = SeriesCache::new(&catalog);
        let mut generator = CalendarGenerator::new(&CalendarConfig::default());
        let event = ScheduledEvent {
            creator: Some("Zoë \"Z\" <admin>".to_string()),
            ..scheduled("evt-4", None)
        };

        assert!(generator.add_event(&event, &mut cache, utc(2024, 3, 1, 0, 0)));

        let ics = unfolded(&generator.to_ics());
        assert!(ics.contains(":mailto:Zo%C3%AB%20%22Z%22%20%3Cadmin%3E@kairos.local\r\n"));
    }

    #[test]
    fn test_skips_events_past_margin() {
        let catalog = FakeCatalog::default();
        let mut cache = SeriesCache::new(&catalog);
        let mut generator = CalendarGenerator::new(&CalendarConfig::default());
        let event = scheduled("evt-1", None);

        // Ended 10:30; still inside the one hour margin at 11:29.
        assert!(generator.add_event(&event, &mut cache, utc(2024, 3, 4, 11, 29)));
        assert!(!generator.add_event(&event, &mut cache, utc(2024, 3, 4, 11, 31)));
        assert_eq!(generator.calendar().events().len(), 1);
    }

    #[test]
    fn test_optional_fields_left_out() {
        let catalog = FakeCatalog::default();
        let mut cache = SeriesCache::new(&catalog);
        let mut generator = CalendarGenerator::new(&CalendarConfig::default());
        let event = ScheduledEvent {
            creator: None,
            description: Some("  ".to_string()),
            ..scheduled("evt-2", None)
        };

        assert!(generator.add_event(&event, &mut cache, utc(2024, 3, 1, 0, 0)));

        let ics = generator.to_ics();
        assert!(!ics.contains("ORGANIZER"));
        assert!(!ics.contains("DESCRIPTION"));
        assert!(!ics.contains("RELATED-TO"));
        assert!(!ics.contains("series.xml"));
        assert_eq!(catalog.bulk_calls.get(), 0);
    }

    #[test]
    fn test_unknown_series_has_no_series_attachment() {
        let catalog = FakeCatalog::default();
        let mut cache = SeriesCache::new(&catalog);
        let mut generator = CalendarGenerator::new(&CalendarConfig::default());

        generator.add_event(
            &scheduled("evt-3", Some("gone")),
            &mut cache,
            utc(2024, 3, 1, 0, 0),
        );

        let ics = generator.to_ics();
        assert!(ics.contains("RELATED-TO:gone"));
        assert!(!ics.contains("series.xml"));
    }
}
