// File: ./src/extractor.rs
//! Reconstructs instructor sessions from the timetable grid.
//!
//! A timetable row starts with a date in column 0, followed by any number of
//! blocks shaped roughly like `[group] [course leader] [mentor] [hours]`.
//! The instructor can sit in either name column, so the group name and the
//! duration are searched at a ranked list of offsets around the matching
//! cell instead of at fixed positions.

use crate::grid::{Cell, Grid};
use crate::model::{EventRecord, SessionSchedule};
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_everyone_token() -> String {
    "Mindenki".to_string()
}
fn default_group_prefixes() -> Vec<String> {
    vec!["BH".to_string(), "JSC".to_string()]
}
fn default_placeholder_group() -> String {
    "Egyéb képzés".to_string()
}
fn default_summary_prefix() -> String {
    "BH: ".to_string()
}
fn default_group_name_offsets() -> Vec<isize> {
    vec![-1, -2]
}
fn default_duration_offsets() -> Vec<isize> {
    vec![1, 2]
}
fn default_column_sample_rows() -> usize {
    10
}

/// No single timetable session lasts longer than a day.
pub const MAX_SESSION_HOURS: f64 = 24.0;

/// Tunable parts of the positional heuristic.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ExtractionRules {
    /// Matches every instructor filter.
    #[serde(default = "default_everyone_token")]
    pub everyone_token: String,
    #[serde(default = "default_group_prefixes")]
    pub group_prefixes: Vec<String>,
    /// Used for externally held courses and other rows without a group.
    #[serde(default = "default_placeholder_group")]
    pub placeholder_group: String,
    #[serde(default = "default_summary_prefix")]
    pub summary_prefix: String,
    /// Tried in order, relative to the instructor's column.
    #[serde(default = "default_group_name_offsets")]
    pub group_name_offsets: Vec<isize>,
    #[serde(default = "default_duration_offsets")]
    pub duration_offsets: Vec<isize>,
    /// Rows inspected to decide how many columns to scan.
    #[serde(default = "default_column_sample_rows")]
    pub column_sample_rows: usize,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            everyone_token: default_everyone_token(),
            group_prefixes: default_group_prefixes(),
            placeholder_group: default_placeholder_group(),
            summary_prefix: default_summary_prefix(),
            group_name_offsets: default_group_name_offsets(),
            duration_offsets: default_duration_offsets(),
            column_sample_rows: default_column_sample_rows(),
        }
    }
}

impl ExtractionRules {
    pub fn is_valid_group_name(&self, name: &str) -> bool {
        self.group_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }

    pub fn matches_teacher(&self, cell: &Cell, teacher: &str) -> bool {
        match cell {
            Cell::Text(s) => s == teacher || *s == self.everyone_token,
            Cell::Numeric(_) | Cell::Date(_) | Cell::Empty => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIssue {
    MissingGroupName,
    MissingDuration,
    NonPositiveDuration,
    DurationOutOfRange,
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowIssue::MissingGroupName => write!(
                f,
                "group name not found, probably an externally held course or a miscellaneous event"
            ),
            RowIssue::MissingDuration => {
                write!(f, "lesson duration not found, probably a summary row")
            }
            RowIssue::NonPositiveDuration => write!(f, "lesson duration is not positive"),
            RowIssue::DurationOutOfRange => {
                write!(f, "lesson duration is longer than a day")
            }
        }
    }
}

/// A recoverable anomaly in one timetable row. `row` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWarning {
    pub row: usize,
    pub issue: RowIssue,
}

/// Receives row anomalies found while scanning.
pub trait RowReporter {
    fn report(&mut self, warning: RowWarning);
}

/// Forwards anomalies to the `log` facade.
#[derive(Debug, Default)]
pub struct LogReporter {
    pub reported: usize,
}

impl RowReporter for LogReporter {
    fn report(&mut self, warning: RowWarning) {
        self.reported += 1;
        log::warn!("Row {}: {}", warning.row, warning.issue);
    }
}

impl RowReporter for Vec<RowWarning> {
    fn report(&mut self, warning: RowWarning) {
        self.push(warning);
    }
}

/// A position where the instructor filter matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub row: usize,
    pub col: usize,
}

pub struct Extractor<'a> {
    rules: &'a ExtractionRules,
    schedule: &'a SessionSchedule,
}

impl<'a> Extractor<'a> {
    pub fn new(rules: &'a ExtractionRules, schedule: &'a SessionSchedule) -> Self {
        Self { rules, schedule }
    }

    /// Number of columns scanned in every row.
    pub fn scan_width(&self, grid: &Grid) -> usize {
        grid.sample_width(self.rules.column_sample_rows)
    }

    /// Every cell matching `teacher` (or the everyone token), row-major.
    pub fn candidates(&self, grid: &Grid, teacher: &str) -> Vec<Candidate> {
        let width = self.scan_width(grid);

        let mut found = Vec::new();
        for row in 0..grid.row_count() {
            for col in 0..width {
                if let Some(cell) = grid.cell(row, col)
                    && self.rules.matches_teacher(cell, teacher)
                {
                    found.push(Candidate { row, col });
                }
            }
        }
        found
    }

    pub fn extract(
        &self,
        grid: &Grid,
        teacher: &str,
        reporter: &mut dyn RowReporter,
    ) -> Vec<EventRecord> {
        self.candidates(grid, teacher)
            .into_iter()
            .filter_map(|candidate| self.extract_at(grid, candidate, reporter))
            .collect()
    }

    /// Builds the record for one candidate. Rows without a date in column 0
    /// are not event rows and are skipped without a report.
    pub fn extract_at(
        &self,
        grid: &Grid,
        candidate: Candidate,
        reporter: &mut dyn RowReporter,
    ) -> Option<EventRecord> {
        let date = grid.cell(candidate.row, 0).and_then(Cell::date)?;
        let row_number = candidate.row + 1;

        let group = match self.group_name(grid, candidate) {
            Some(name) => name,
            None => {
                reporter.report(RowWarning {
                    row: row_number,
                    issue: RowIssue::MissingGroupName,
                });
                self.rules.placeholder_group.as_str()
            }
        };

        let Some(raw_hours) = self.duration(grid, candidate) else {
            reporter.report(RowWarning {
                row: row_number,
                issue: RowIssue::MissingDuration,
            });
            return None;
        };

        let hours = raw_hours.trunc();
        let issue = if hours.is_nan() || hours < 1.0 {
            Some(RowIssue::NonPositiveDuration)
        } else if hours > MAX_SESSION_HOURS {
            Some(RowIssue::DurationOutOfRange)
        } else {
            None
        };
        if let Some(issue) = issue {
            reporter.report(RowWarning {
                row: row_number,
                issue,
            });
            return None;
        }

        let Some(slot) = self.schedule.place(date.date(), hours as u32) else {
            reporter.report(RowWarning {
                row: row_number,
                issue: RowIssue::DurationOutOfRange,
            });
            return None;
        };
        let label = format!("{}{}", self.rules.summary_prefix, group);
        Some(EventRecord::new(label, slot.start, slot.duration_hours))
    }

    fn group_name<'g>(&self, grid: &'g Grid, candidate: Candidate) -> Option<&'g str> {
        self.rules.group_name_offsets.iter().find_map(|&offset| {
            grid.cell_at_offset(candidate.row, candidate.col, offset)
                .and_then(Cell::text)
                .filter(|name| self.rules.is_valid_group_name(name))
        })
    }

    fn duration(&self, grid: &Grid, candidate: Candidate) -> Option<f64> {
        self.rules.duration_offsets.iter().find_map(|&offset| {
            grid.cell_at_offset(candidate.row, candidate.col, offset)
                .and_then(Cell::numeric)
        })
    }
}

/// Scans `grid` with the built-in rules, logging row anomalies.
pub fn extract_events(grid: &Grid, teacher: &str) -> Vec<EventRecord> {
    let rules = ExtractionRules::default();
    let schedule = SessionSchedule::default();
    Extractor::new(&rules, &schedule).extract(grid, teacher, &mut LogReporter::default())
}
