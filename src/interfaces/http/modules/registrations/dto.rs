//! Registration DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::RegistrationsReport;
use crate::domain::{EventRegistrationGroup, Registration, RegistrationWithEvent, Statistics};
use crate::interfaces::http::modules::events::EventSummaryDto;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDto {
    pub id: i32,
    pub event_id: i32,
    pub email: String,
    pub name: String,
    pub registered_at: DateTime<Utc>,
}

impl From<Registration> for RegistrationDto {
    fn from(r: Registration) -> Self {
        Self {
            id: r.id,
            event_id: r.event_id,
            email: r.email,
            name: r.name,
            registered_at: r.registered_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub registration: RegistrationDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationWithEventDto {
    #[serde(flatten)]
    pub registration: RegistrationDto,
    /// `null` when the event no longer exists
    pub event: Option<EventSummaryDto>,
}

impl From<RegistrationWithEvent> for RegistrationWithEventDto {
    fn from(r: RegistrationWithEvent) -> Self {
        Self {
            registration: r.registration.into(),
            event: r.event.map(EventSummaryDto::from),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsDto {
    pub total_registrations: u64,
    pub total_events: u64,
    pub events_with_registrations: u64,
    pub events_without_registrations: u64,
    /// Two decimals, e.g. "1.50"
    pub average_registrations_per_event: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistrationsDto {
    pub event_id: i32,
    pub event_title: Option<String>,
    pub count: u64,
    pub registrations: Vec<RegistrationDto>,
}

impl From<EventRegistrationGroup> for EventRegistrationsDto {
    fn from(g: EventRegistrationGroup) -> Self {
        Self {
            event_id: g.event_id,
            event_title: g.event_title,
            count: g.count,
            registrations: g.registrations.into_iter().map(RegistrationDto::from).collect(),
        }
    }
}

/// Admin view payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationsReportDto {
    pub registrations: Vec<RegistrationWithEventDto>,
    pub statistics: StatisticsDto,
    /// Sorted by count descending, then event id
    pub registrations_by_event: Vec<EventRegistrationsDto>,
}

impl From<RegistrationsReport> for RegistrationsReportDto {
    fn from(report: RegistrationsReport) -> Self {
        let Statistics {
            total_registrations,
            total_events,
            events_with_registrations,
            events_without_registrations,
            average_registrations_per_event,
            registrations_by_event,
        } = report.statistics;

        Self {
            registrations: report
                .registrations
                .into_iter()
                .map(RegistrationWithEventDto::from)
                .collect(),
            statistics: StatisticsDto {
                total_registrations,
                total_events,
                events_with_registrations,
                events_without_registrations,
                average_registrations_per_event,
            },
            registrations_by_event: registrations_by_event
                .into_iter()
                .map(EventRegistrationsDto::from)
                .collect(),
        }
    }
}
