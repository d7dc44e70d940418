use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub calendar_id: String,
    pub summary: String,
    pub description: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub time_zone: String,
}

impl CalendarEvent {
    /// A timed event for `summary` lasting `duration` from `start`.
    pub fn new(
        calendar_id: &str,
        summary: &str,
        start: DateTime<FixedOffset>,
        duration: Duration,
        time_zone: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            calendar_id: calendar_id.to_string(),
            summary: summary.to_string(),
            description: format!("Задача: {}", summary),
            start,
            end: start + duration,
            time_zone: time_zone.to_string(),
        }
    }
}
