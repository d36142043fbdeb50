//! Event source: the extracted events file and the built-in sample set
//!
//! The events file is produced by an upstream extraction step and has the
//! shape `{ "extraction_metadata": {...}, "events": [...] }`.

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::Event;
use crate::shared::errors::InfraError;

/// Placeholder for display fields the extraction left blank
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Deserialize)]
struct EventsFile {
    #[serde(default)]
    extraction_metadata: Option<ExtractionMetadata>,
    events: Option<Vec<EventRecord>>,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractionMetadata {
    source_file: Option<String>,
    total_events_found: Option<u64>,
    parser_version: Option<String>,
}

/// One event as written by the extractor. Every text field may be absent
/// or `null`.
#[derive(Debug, Deserialize)]
struct EventRecord {
    id: i64,
    school_number: Option<String>,
    principal: Option<String>,
    date: Option<String>,
    time: Option<String>,
    location: Option<String>,
    address: Option<String>,
    ceremony_type: Option<String>,
    title: Option<String>,
    year: Option<String>,
    raw_text: Option<String>,
    extracted_at: Option<String>,
}

fn or_not_available(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_AVAILABLE.to_string(),
    }
}

impl EventRecord {
    fn into_event(self) -> Result<Event, InfraError> {
        let id = i32::try_from(self.id)
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                InfraError::InvalidEventsFile(format!("event id {} is not a positive integer", self.id))
            })?;

        Ok(Event {
            id,
            school_number: or_not_available(self.school_number),
            principal: or_not_available(self.principal),
            date: or_not_available(self.date),
            time: or_not_available(self.time),
            location: or_not_available(self.location),
            address: self.address.unwrap_or_default(),
            ceremony_type: self.ceremony_type.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            year: self.year.unwrap_or_default(),
            raw_text: self.raw_text.unwrap_or_default(),
            extracted_at: self.extracted_at.unwrap_or_default(),
        })
    }
}

/// Parse an events document already held in memory.
pub fn parse_events(content: &str) -> Result<Vec<Event>, InfraError> {
    let file: EventsFile = serde_json::from_str(content)?;

    if let Some(meta) = &file.extraction_metadata {
        debug!(
            source_file = meta.source_file.as_deref().unwrap_or(""),
            total_events_found = meta.total_events_found,
            parser_version = meta.parser_version.as_deref().unwrap_or(""),
            "Events file metadata"
        );
    }

    let records = file
        .events
        .ok_or_else(|| InfraError::InvalidEventsFile("missing \"events\" array".to_string()))?;

    let mut seen = HashSet::with_capacity(records.len());
    let mut events = Vec::with_capacity(records.len());
    for record in records {
        let event = record.into_event()?;
        if !seen.insert(event.id) {
            return Err(InfraError::InvalidEventsFile(format!(
                "duplicate event id {}",
                event.id
            )));
        }
        events.push(event);
    }
    Ok(events)
}

/// Read and clean the events file at `path`.
pub fn load_events_file(path: impl AsRef<Path>) -> Result<Vec<Event>, InfraError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(InfraError::InvalidEventsFile(format!(
            "events file not found at {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path)?;
    let events = parse_events(&content)?;
    info!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Built-in demo events, used when seeding an empty store without a file.
pub fn sample_events() -> Vec<Event> {
    let extracted_at = Utc::now().to_rfc3339();
    let sample = |id: i32, principal: &str, date: &str, time: &str, location: &str| Event {
        id,
        school_number: id.to_string(),
        principal: principal.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        location: location.to_string(),
        address: String::new(),
        ceremony_type: "Graduation Ceremony".to_string(),
        title: format!("School {} Graduation Ceremony", id),
        year: "2025".to_string(),
        raw_text: String::new(),
        extracted_at: extracted_at.clone(),
    };

    vec![
        sample(
            1,
            "Sarada Dorce",
            "June 18th",
            "5pm",
            "Lehman HS-3000 Tremont Ave.\nBronx, NY  10465",
        ),
        sample(
            2,
            "Olga Steward Nelson",
            "June 20th",
            "6pm",
            "I.S. 61\n98-50th , Corona, NY11368",
        ),
        sample(3, "Sabrina Fleming", "June 18th", "6pm", "142-10 Linden Blvd."),
    ]
}
