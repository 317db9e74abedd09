// Crate root library declaration and module exports.
pub mod calendar;
pub mod cli;
pub mod config;
pub mod context;
pub mod convert;
pub mod extractor;
pub mod grid;
pub mod model;

pub use extractor::extract_events;
