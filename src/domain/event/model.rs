//! Event domain entity

/// A graduation ceremony participants can register for.
///
/// Reference data: loaded once by the seed step and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: i32,
    pub school_number: String,
    pub principal: String,
    /// Free text as printed on the invitation, e.g. "June 18th"
    pub date: String,
    /// Free text, e.g. "5pm"
    pub time: String,
    /// Venue; may span several lines
    pub location: String,
    pub address: String,
    pub ceremony_type: String,
    pub title: String,
    pub year: String,
    pub raw_text: String,
    pub extracted_at: String,
}

impl Event {
    /// Location collapsed onto one line (`"\n"` becomes `", "`).
    pub fn location_single_line(&self) -> String {
        self.location.replace("\r\n", "\n").replace('\n', ", ")
    }

    /// Display fields shown next to a registration.
    pub fn summary(&self) -> EventSummary {
        EventSummary {
            id: self.id,
            school_number: self.school_number.clone(),
            principal: self.principal.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            location: self.location.clone(),
            title: self.title.clone(),
        }
    }
}

/// Subset of [`Event`] attached to registration listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSummary {
    pub id: i32,
    pub school_number: String,
    pub principal: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub title: String,
}

#[cfg(test)]
pub(crate) fn sample_event(id: i32) -> Event {
    Event {
        id,
        school_number: id.to_string(),
        principal: format!("Principal {}", id),
        date: "June 18th".to_string(),
        time: "5pm".to_string(),
        location: "Lehman HS-3000 Tremont Ave.\nBronx, NY  10465".to_string(),
        address: String::new(),
        ceremony_type: "Graduation Ceremony".to_string(),
        title: format!("School {} Graduation Ceremony", id),
        year: "2025".to_string(),
        raw_text: String::new(),
        extracted_at: "2025-05-01T00:00:00Z".to_string(),
    }
}
