// File: ./src/convert.rs
// Wires the grid loader, the extractor and the calendar writer together.
use crate::calendar::{CalendarWriter, Destination};
use crate::config::Config;
use crate::extractor::{Extractor, LogReporter};
use crate::grid::Grid;
use crate::model::EventRecord;
use anyhow::Result;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionReport {
    pub events: usize,
    pub warnings: usize,
}

pub struct Converter<'a> {
    config: &'a Config,
}

impl<'a> Converter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Extracts the instructor's sessions from an already loaded grid.
    /// Returns the events and the number of rows reported as anomalous.
    pub fn events_from_grid(
        &self,
        grid: &Grid,
        teacher: &str,
    ) -> Result<(Vec<EventRecord>, usize)> {
        let schedule = self.config.session_schedule()?;
        let extractor = Extractor::new(&self.config.extraction, &schedule);
        log::debug!(
            "Scanning {} rows x {} columns",
            grid.row_count(),
            extractor.scan_width(grid)
        );

        let mut reporter = LogReporter::default();
        let events = extractor.extract(grid, teacher, &mut reporter);
        for event in &events {
            log::debug!(
                "{} at {} for {}h",
                event.summary,
                event.start,
                event.duration_hours
            );
        }
        Ok((events, reporter.reported))
    }

    /// Reads `source`, keeps the sessions of `teacher` and writes them to `dest`.
    /// Any I/O failure aborts the whole conversion.
    pub fn convert(
        &self,
        source: &Path,
        dest: &Destination,
        teacher: &str,
    ) -> Result<ConversionReport> {
        log::info!(
            "Processing timetable {}, collecting entries for {}",
            source.display(),
            teacher
        );

        let grid = Grid::load_first_sheet(source)?;
        let (events, warnings) = self.events_from_grid(&grid, teacher)?;

        CalendarWriter::new(&self.config.calendar.name).write(dest, &events)?;
        log::info!(
            "Calendar file generated at {} ({} events)",
            dest,
            events.len()
        );

        Ok(ConversionReport {
            events: events.len(),
            warnings,
        })
    }
}
