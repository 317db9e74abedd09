// File: ./src/model/event.rs
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use icalendar::{Component, Event};
use uuid::Uuid;

/// One timetable session for the selected instructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub summary: String,
    pub description: String,
    /// Local wall-clock start.
    pub start: NaiveDateTime,
    pub duration_hours: u32,
}

impl EventRecord {
    pub fn new(label: String, start: NaiveDateTime, duration_hours: u32) -> Self {
        Self {
            description: label.clone(),
            summary: label,
            start,
            duration_hours,
        }
    }

    /// ISO 8601 duration as used by the DURATION property.
    pub fn iso_duration(&self) -> String {
        format!("PT{}H", self.duration_hours)
    }

    /// Start converted from the host's zone to UTC. `None` when the wall
    /// clock time does not exist locally (DST gap).
    pub fn start_utc(&self) -> Option<DateTime<Utc>> {
        Local
            .from_local_datetime(&self.start)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn to_event(&self, stamp: DateTime<Utc>) -> Event {
        let mut event = Event::new();
        event.uid(&Uuid::new_v4().to_string());
        event.timestamp(stamp);
        event.summary(&self.summary);
        event.description(&self.description);

        // Floating time when the wall clock start does not exist locally.
        let dtstart = match self.start_utc() {
            Some(utc) => utc.format("%Y%m%dT%H%M%SZ").to_string(),
            None => self.start.format("%Y%m%dT%H%M%S").to_string(),
        };
        event.add_property("DTSTART", &dtstart);
        event.add_property("DURATION", self.iso_duration());
        event
    }
}
