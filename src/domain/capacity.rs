//! Capacity rules for event admission

use std::collections::BTreeSet;

/// Default number of registrants a standard event admits.
pub const DEFAULT_STANDARD_CAPACITY: u32 = 2;

/// How many registrations an event accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityClass {
    /// Bounded by the policy's standard capacity
    Standard,
    /// No upper bound
    Unlimited,
}

impl CapacityClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Unlimited => "unlimited",
        }
    }
}

impl std::fmt::Display for CapacityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which events are exempt from the standard limit, and what that limit is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityPolicy {
    standard_capacity: u32,
    unlimited_event_ids: BTreeSet<i32>,
}

impl CapacityPolicy {
    pub fn new(standard_capacity: u32, unlimited_event_ids: impl IntoIterator<Item = i32>) -> Self {
        Self {
            standard_capacity,
            unlimited_event_ids: unlimited_event_ids.into_iter().collect(),
        }
    }

    pub fn standard_capacity(&self) -> u32 {
        self.standard_capacity
    }

    pub fn unlimited_event_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.unlimited_event_ids.iter().copied()
    }

    pub fn class_for(&self, event_id: i32) -> CapacityClass {
        if self.unlimited_event_ids.contains(&event_id) {
            CapacityClass::Unlimited
        } else {
            CapacityClass::Standard
        }
    }

    /// Upper bound for the event, `None` when unlimited.
    pub fn limit_for(&self, event_id: i32) -> Option<u32> {
        match self.class_for(event_id) {
            CapacityClass::Standard => Some(self.standard_capacity),
            CapacityClass::Unlimited => None,
        }
    }

    /// Always `false` for unlimited events.
    pub fn is_fully_booked(&self, event_id: i32, registration_count: u64) -> bool {
        self.limit_for(event_id)
            .is_some_and(|limit| registration_count >= u64::from(limit))
    }
}

impl Default for CapacityPolicy {
    /// Standard events take two registrants; events 14 and 15 are open-ended.
    fn default() -> Self {
        Self::new(DEFAULT_STANDARD_CAPACITY, [14, 15])
    }
}
