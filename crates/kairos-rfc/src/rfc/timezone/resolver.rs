//! Resolution of capture-agent timezone identifiers.
//!
//! Uses ICU4X for Windows timezone ID to IANA mapping and timezone canonicalization.

use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;
use std::collections::HashMap;
use std::str::FromStr;

use super::Zone;

/// Error during timezone resolution or conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Unknown or invalid timezone identifier.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Non-existent time during DST gap.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),
}

/// Resolver for timezone identifiers.
///
/// Caches resolved zones by the identifier the caller supplied, so one
/// resolver can be reused across all schedules of a request.
#[derive(Debug, Default)]
pub struct TimeZoneResolver {
    cache: HashMap<String, Zone>,
}

impl TimeZoneResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Resolves a timezone identifier to a [`Zone`].
    ///
    /// Accepts IANA names, IANA aliases, Windows zone names and
    /// vendor-prefixed identifiers such as `/mozilla.org/Europe/Berlin`.
    ///
    /// ## Errors
    ///
    /// Returns `ConversionError::UnknownTimezone` if the identifier cannot be resolved.
    pub fn resolve(&mut self, tzid: &str) -> Result<Zone, ConversionError> {
        if let Some(zone) = self.cache.get(tzid) {
            return Ok(*zone);
        }

        let normalized = normalize_tzid(tzid.trim());
        let tz = Tz::from_str(&normalized)
            .map_err(|_e| ConversionError::UnknownTimezone(tzid.to_string()))?;
        let zone = Zone::new(tz);

        tracing::trace!(tzid, resolved = zone.name(), "Resolved timezone");
        self.cache.insert(tzid.to_string(), zone);

        Ok(zone)
    }
}

/// Three-letter zone IDs still sent by Java-based agents, mapped as the JDK
/// maps them. EST, MST and HST are real IANA names and stay out of this table.
const LEGACY_SHORT_IDS: &[(&str, &str)] = &[
    ("ACT", "Australia/Darwin"),
    ("AET", "Australia/Sydney"),
    ("AGT", "America/Argentina/Buenos_Aires"),
    ("ART", "Africa/Cairo"),
    ("AST", "America/Anchorage"),
    ("BET", "America/Sao_Paulo"),
    ("BST", "Asia/Dhaka"),
    ("CAT", "Africa/Harare"),
    ("CNT", "America/St_Johns"),
    ("CST", "America/Chicago"),
    ("CTT", "Asia/Shanghai"),
    ("EAT", "Africa/Addis_Ababa"),
    ("ECT", "Europe/Paris"),
    ("IET", "America/Indiana/Indianapolis"),
    ("IST", "Asia/Kolkata"),
    ("JST", "Asia/Tokyo"),
    ("MIT", "Pacific/Apia"),
    ("NET", "Asia/Yerevan"),
    ("NST", "Pacific/Auckland"),
    ("PLT", "Asia/Karachi"),
    ("PNT", "America/Phoenix"),
    ("PRT", "America/Puerto_Rico"),
    ("PST", "America/Los_Angeles"),
    ("SST", "Pacific/Guadalcanal"),
    ("VST", "Asia/Ho_Chi_Minh"),
];

/// Maps vendor-prefixed, Windows, legacy short and aliased identifiers to
/// canonical IANA names.
///
/// Returns the input unchanged (minus known prefixes) when ICU does not
/// recognise it, leaving the final verdict to `chrono-tz`.
fn normalize_tzid(tzid: &str) -> String {
    let stripped = ["/mozilla.org/", "/softwarestudio.org/"]
        .iter()
        .find_map(|prefix| tzid.strip_prefix(prefix))
        .unwrap_or(tzid);

    if let Some((_, iana)) = LEGACY_SHORT_IDS.iter().find(|(short, _)| *short == stripped) {
        return (*iana).to_string();
    }

    let iana_parser = IanaParserExtended::new();

    if let Some(windows_zone) = WindowsParser::new().parse(stripped, None) {
        if let Some(entry) = iana_parser
            .iter()
            .find(|entry| entry.time_zone == windows_zone)
        {
            return entry.canonical.to_string();
        }
    }

    let parsed = iana_parser.parse(stripped);
    if parsed.time_zone == icu::time::TimeZone::UNKNOWN {
        stripped.to_string()
    } else {
        parsed.canonical.to_string()
    }
}
