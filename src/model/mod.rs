// File: ./src/model/mod.rs
pub mod event;
pub mod schedule;

pub use event::EventRecord;
pub use schedule::{ScheduledSlot, SessionSchedule};
