use serde::{Deserialize, Serialize};

use kairos_core::types::Period;

/// A recording booked on a capture agent, as needed for calendar export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Series the event belongs to, if any.
    #[serde(default)]
    pub series_id: Option<String>,
    pub agent_id: String,
    pub period: Period,
    /// Episode metadata document, attached as `episode.xml`.
    pub episode_catalog: String,
    /// Capture agent properties, attached verbatim.
    pub agent_properties: String,
}
