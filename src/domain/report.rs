//! Read models joining registrations to events
//!
//! Everything here is computed on read from the two stores and never persisted.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::capacity::{CapacityClass, CapacityPolicy};
use super::event::{Event, EventSummary};
use super::registration::Registration;

/// An event together with its live registration count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventWithCount {
    pub event: Event,
    pub registration_count: u64,
    pub is_fully_booked: bool,
    pub capacity: CapacityClass,
}

/// A registration with the display fields of its event, if it still resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationWithEvent {
    pub registration: Registration,
    pub event: Option<EventSummary>,
}

/// Registrations that share one event id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRegistrationGroup {
    pub event_id: i32,
    /// `None` when the id does not resolve to a stored event
    pub event_title: Option<String>,
    pub count: u64,
    /// Newest first
    pub registrations: Vec<Registration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub total_registrations: u64,
    pub total_events: u64,
    pub events_with_registrations: u64,
    pub events_without_registrations: u64,
    /// Two decimals, `"0.00"` when there are no events
    pub average_registrations_per_event: String,
    /// Sorted by count descending, then event id ascending
    pub registrations_by_event: Vec<EventRegistrationGroup>,
}

/// Attach counts to events, ordered by event id ascending.
pub fn events_with_counts(
    mut events: Vec<Event>,
    counts: &BTreeMap<i32, u64>,
    policy: &CapacityPolicy,
) -> Vec<EventWithCount> {
    events.sort_by_key(|e| e.id);
    events
        .into_iter()
        .map(|event| {
            let registration_count = counts.get(&event.id).copied().unwrap_or(0);
            EventWithCount {
                is_fully_booked: policy.is_fully_booked(event.id, registration_count),
                capacity: policy.class_for(event.id),
                registration_count,
                event,
            }
        })
        .collect()
}

/// Newest first; ties on the timestamp fall back to the higher id.
pub fn sort_newest_first(registrations: &mut [Registration]) {
    registrations.sort_by(|a, b| {
        b.registered_at
            .cmp(&a.registered_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Pair each registration with its event summary, newest registration first.
pub fn join_registrations(
    mut registrations: Vec<Registration>,
    events: &[Event],
) -> Vec<RegistrationWithEvent> {
    let by_id: HashMap<i32, &Event> = events.iter().map(|e| (e.id, e)).collect();
    sort_newest_first(&mut registrations);
    registrations
        .into_iter()
        .map(|registration| RegistrationWithEvent {
            event: by_id.get(&registration.event_id).map(|e| e.summary()),
            registration,
        })
        .collect()
}

pub fn format_average(total_registrations: u64, total_events: u64) -> String {
    if total_events == 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", total_registrations as f64 / total_events as f64)
}

pub fn compute_statistics(events: &[Event], registrations: &[Registration]) -> Statistics {
    let titles: HashMap<i32, &str> = events.iter().map(|e| (e.id, e.title.as_str())).collect();

    let mut grouped: BTreeMap<i32, Vec<Registration>> = BTreeMap::new();
    for r in registrations {
        grouped.entry(r.event_id).or_default().push(r.clone());
    }

    let total_registrations = registrations.len() as u64;
    let total_events = titles.len() as u64;
    let events_with_registrations = grouped
        .keys()
        .filter(|id| titles.contains_key(id))
        .collect::<BTreeSet<_>>()
        .len() as u64;

    let mut registrations_by_event: Vec<EventRegistrationGroup> = grouped
        .into_iter()
        .map(|(event_id, mut regs)| {
            sort_newest_first(&mut regs);
            EventRegistrationGroup {
                event_id,
                event_title: titles.get(&event_id).map(|t| t.to_string()),
                count: regs.len() as u64,
                registrations: regs,
            }
        })
        .collect();
    registrations_by_event.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.event_id.cmp(&b.event_id))
    });

    Statistics {
        total_registrations,
        total_events,
        events_with_registrations,
        events_without_registrations: total_events - events_with_registrations,
        average_registrations_per_event: format_average(total_registrations, total_events),
        registrations_by_event,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::domain::event::sample_event;

    fn registration(id: i32, event_id: i32, minutes: i64) -> Registration {
        Registration {
            id,
            event_id,
            email: format!("p{}@schools.nyc.gov", id),
            name: format!("Participant {}", id),
            registered_at: Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
    }

    #[test]
    fn average_is_zero_without_events() {
        let stats = compute_statistics(&[], &[]);
        assert_eq!(stats.average_registrations_per_event, "0.00");
        assert_eq!(stats.total_events, 0);
        assert_eq!(stats.events_without_registrations, 0);
    }

    #[test]
    fn average_has_two_decimals() {
        assert_eq!(format_average(2, 2), "1.00");
        assert_eq!(format_average(1, 3), "0.33");
        assert_eq!(format_average(2, 3), "0.67");
    }

    #[test]
    fn counts_attach_in_id_order() {
        let events = vec![sample_event(3), sample_event(1), sample_event(14)];
        let counts = BTreeMap::from([(1, 2), (14, 9)]);
        let listed = events_with_counts(events, &counts, &CapacityPolicy::default());

        let ids: Vec<_> = listed.iter().map(|e| e.event.id).collect();
        assert_eq!(ids, vec![1, 3, 14]);
        assert_eq!(listed[0].registration_count, 2);
        assert!(listed[0].is_fully_booked);
        assert_eq!(listed[1].registration_count, 0);
        assert!(!listed[1].is_fully_booked);
        assert_eq!(listed[2].capacity, CapacityClass::Unlimited);
        assert!(!listed[2].is_fully_booked);
    }

    #[test]
    fn join_orders_newest_first_and_tolerates_missing_events() {
        let events = vec![sample_event(1)];
        let joined = join_registrations(
            vec![registration(1, 1, 0), registration(2, 99, 10), registration(3, 1, 5)],
            &events,
        );

        let ids: Vec<_> = joined.iter().map(|r| r.registration.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert!(joined[0].event.is_none());
        assert_eq!(joined[1].event.as_ref().map(|e| e.id), Some(1));
    }

    #[test]
    fn equal_timestamps_fall_back_to_id() {
        let mut regs = vec![registration(1, 1, 0), registration(2, 1, 0)];
        sort_newest_first(&mut regs);
        assert_eq!(regs[0].id, 2);
    }

    #[test]
    fn breakdown_sorts_by_count_then_id() {
        let events: Vec<_> = (1..=4).map(sample_event).collect();
        let regs = vec![
            registration(1, 3, 0),
            registration(2, 2, 1),
            registration(3, 2, 2),
            registration(4, 1, 3),
        ];
        let stats = compute_statistics(&events, &regs);

        let order: Vec<_> = stats
            .registrations_by_event
            .iter()
            .map(|g| (g.event_id, g.count))
            .collect();
        assert_eq!(order, vec![(2, 2), (1, 1), (3, 1)]);
        assert_eq!(stats.events_with_registrations, 3);
        assert_eq!(stats.events_without_registrations, 1);
        assert_eq!(stats.average_registrations_per_event, "1.00");
        assert_eq!(stats.registrations_by_event[0].registrations[0].id, 3);
    }

    #[test]
    fn orphaned_registrations_count_but_do_not_skew_event_totals() {
        let events = vec![sample_event(1)];
        let regs = vec![registration(1, 1, 0), registration(2, 42, 1)];
        let stats = compute_statistics(&events, &regs);

        assert_eq!(stats.total_registrations, 2);
        assert_eq!(stats.events_with_registrations, 1);
        assert_eq!(stats.events_without_registrations, 0);
        let orphan = stats
            .registrations_by_event
            .iter()
            .find(|g| g.event_id == 42)
            .unwrap();
        assert!(orphan.event_title.is_none());
    }
}
