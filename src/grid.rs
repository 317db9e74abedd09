// File: ./src/grid.rs
//! In-memory view of the first worksheet of a timetable workbook.
//!
//! Cells are normalised into a closed [`Cell`] variant so every access site
//! has to handle text, numbers, dates and blanks explicitly. Coordinates are
//! absolute: row 0 / column 0 is always cell A1, regardless of where the
//! sheet's used range starts.

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum CellKind {
    Text,
    Numeric,
    Date,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    Text(String),
    Numeric(f64),
    Date(NaiveDateTime),
    #[default]
    Empty,
}

impl Cell {
    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Text(_) => CellKind::Text,
            Cell::Numeric(_) => CellKind::Numeric,
            Cell::Date(_) => CellKind::Date,
            Cell::Empty => CellKind::Empty,
        }
    }

    /// The string value, or `None` when the cell holds anything but text.
    pub fn text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Numeric(_) | Cell::Date(_) | Cell::Empty => None,
        }
    }

    pub fn numeric(&self) -> Option<f64> {
        match self {
            Cell::Numeric(n) => Some(*n),
            Cell::Text(_) | Cell::Date(_) | Cell::Empty => None,
        }
    }

    pub fn date(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::Date(dt) => Some(*dt),
            Cell::Text(_) | Cell::Numeric(_) | Cell::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    fn parse_iso(s: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .map(|d| d.and_time(Default::default()))
            })
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Numeric(*f),
            Data::Int(i) => Cell::Numeric(*i as f64),
            // A date-formatted cell whose serial cannot be turned into a
            // calendar date is still a number.
            Data::DateTime(dt) => dt
                .as_datetime()
                .map(Cell::Date)
                .unwrap_or(Cell::Numeric(dt.as_f64())),
            Data::DateTimeIso(s) => Cell::parse_iso(s)
                .map(Cell::Date)
                .unwrap_or_else(|| Cell::Text(s.clone())),
            Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Bool(_) | Data::Error(_) | Data::Empty => Cell::Empty,
        }
    }
}

/// Row-major grid of cells. Each row keeps only its populated extent, so
/// `row_width` is the row's physical cell count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Builds a grid from literal rows. Trailing blanks are trimmed.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let rows = rows.into_iter().map(Self::trim_row).collect();
        Self { rows }
    }

    /// Re-anchors a calamine range at A1.
    pub fn from_range(range: &Range<Data>) -> Self {
        let Some((first_row, first_col)) = range.start() else {
            return Self::default();
        };

        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); first_row as usize];
        for row in range.rows() {
            let cells = std::iter::repeat_n(Cell::Empty, first_col as usize)
                .chain(row.iter().map(Cell::from))
                .collect();
            rows.push(Self::trim_row(cells));
        }
        Self { rows }
    }

    /// Opens a workbook (xlsx, xlsm, xls or ods) and loads its first sheet.
    pub fn load_first_sheet(path: &Path) -> Result<Self> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open workbook '{}'", path.display()))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Workbook '{}' has no sheets", path.display()))?;

        let range = workbook.worksheet_range(&sheet_name).with_context(|| {
            format!(
                "Failed to read sheet '{}' of '{}'",
                sheet_name,
                path.display()
            )
        })?;

        log::debug!(
            "Loaded sheet '{}' ({} rows x {} columns)",
            sheet_name,
            range.height(),
            range.width()
        );
        Ok(Self::from_range(&range))
    }

    fn trim_row(mut cells: Vec<Cell>) -> Vec<Cell> {
        while cells.last().is_some_and(Cell::is_empty) {
            cells.pop();
        }
        cells
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_width(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    /// Widest row among the first `sample_rows` rows.
    pub fn sample_width(&self, sample_rows: usize) -> usize {
        (0..sample_rows.min(self.rows.len()))
            .map(|r| self.row_width(r))
            .max()
            .unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(col)
    }

    /// Looks up a cell relative to `col`; out-of-sheet positions are absent.
    pub fn cell_at_offset(&self, row: usize, col: usize, offset: isize) -> Option<&Cell> {
        let target = col.checked_add_signed(offset)?;
        self.cell(row, target)
    }
}
