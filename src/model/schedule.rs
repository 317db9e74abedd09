// File: ./src/model/schedule.rs
//! Business rule placing a session of N hours on its day.
//!
//! Short sessions are evening classes that start at a fixed afternoon time.
//! Longer sessions are full-day classes that start in the morning; the booked
//! duration includes the lunch break, which the timetable does not count.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSchedule {
    /// Sessions up to and including this many hours are short sessions.
    pub short_session_max_hours: u32,
    pub short_session_start: NaiveTime,
    pub long_session_start: NaiveTime,
    /// Added to the booked duration of long sessions.
    pub lunch_break_hours: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledSlot {
    pub start: NaiveDateTime,
    pub duration_hours: u32,
}

impl Default for SessionSchedule {
    fn default() -> Self {
        let midnight = NaiveTime::default();
        Self {
            short_session_max_hours: 4,
            short_session_start: midnight + Duration::hours(17),
            long_session_start: midnight + Duration::hours(9),
            lunch_break_hours: 1,
        }
    }
}

impl SessionSchedule {
    pub fn is_short(&self, hours: u32) -> bool {
        hours <= self.short_session_max_hours
    }

    /// Places a session of `hours` taught hours on `date`. Only the time of
    /// day is decided here; the date is kept as is. `None` when the booked
    /// duration does not fit in a `u32`.
    pub fn place(&self, date: NaiveDate, hours: u32) -> Option<ScheduledSlot> {
        if self.is_short(hours) {
            Some(ScheduledSlot {
                start: date.and_time(self.short_session_start),
                duration_hours: hours,
            })
        } else {
            Some(ScheduledSlot {
                start: date.and_time(self.long_session_start),
                duration_hours: hours.checked_add(self.lunch_break_hours)?,
            })
        }
    }
}
