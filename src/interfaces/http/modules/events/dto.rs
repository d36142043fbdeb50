//! Event DTOs
//!
//! Stored event fields keep their snake_case names; fields computed on read
//! are camelCase.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{EventSummary, EventWithCount};

#[derive(Debug, Serialize, ToSchema)]
pub struct EventDto {
    pub id: i32,
    pub school_number: String,
    pub principal: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub address: String,
    pub ceremony_type: String,
    pub title: String,
    pub year: String,
    pub raw_text: String,
    pub extracted_at: String,
    #[serde(rename = "registrationCount")]
    pub registration_count: u64,
    #[serde(rename = "isFullyBooked")]
    pub is_fully_booked: bool,
    /// "standard" or "unlimited"
    pub capacity: String,
    /// `location` with line breaks replaced by ", "
    #[serde(rename = "locationSingleLine")]
    pub location_single_line: String,
}

impl From<EventWithCount> for EventDto {
    fn from(e: EventWithCount) -> Self {
        let location_single_line = e.event.location_single_line();
        let ev = e.event;
        Self {
            id: ev.id,
            school_number: ev.school_number,
            principal: ev.principal,
            date: ev.date,
            time: ev.time,
            location: ev.location,
            address: ev.address,
            ceremony_type: ev.ceremony_type,
            title: ev.title,
            year: ev.year,
            raw_text: ev.raw_text,
            extracted_at: ev.extracted_at,
            registration_count: e.registration_count,
            is_fully_booked: e.is_fully_booked,
            capacity: e.capacity.to_string(),
            location_single_line,
        }
    }
}

/// Event fields shown next to a registration.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventSummaryDto {
    pub id: i32,
    pub school_number: String,
    pub principal: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub title: String,
}

impl From<EventSummary> for EventSummaryDto {
    fn from(s: EventSummary) -> Self {
        Self {
            id: s.id,
            school_number: s.school_number,
            principal: s.principal,
            date: s.date,
            time: s.time,
            location: s.location,
            title: s.title,
        }
    }
}
