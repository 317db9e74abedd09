// File: ./src/calendar.rs
//! Serialises event records into an iCalendar (RFC 5545) document.

use crate::model::EventRecord;
use anyhow::{Context, Result};
use chrono::Utc;
use icalendar::Calendar;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where the generated calendar goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// `-` means standard output.
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Destination::Stdout
        } else {
            Destination::File(PathBuf::from(arg))
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Stdout => write!(f, "<stdout>"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct CalendarWriter {
    name: String,
}

impl CalendarWriter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn build(&self, events: &[EventRecord]) -> Calendar {
        let stamp = Utc::now();
        let mut calendar = Calendar::new();
        calendar.name(&self.name);
        for record in events {
            calendar.push(record.to_event(stamp));
        }
        calendar
    }

    pub fn to_ics_string(&self, events: &[EventRecord]) -> String {
        self.build(events).to_string()
    }

    pub fn write(&self, dest: &Destination, events: &[EventRecord]) -> Result<()> {
        let ics = self.to_ics_string(events);
        match dest {
            Destination::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(ics.as_bytes())
                    .and_then(|_| out.flush())
                    .context("Failed to write calendar to stdout")
            }
            Destination::File(path) => atomic_write(path, ics)
                .with_context(|| format!("Failed to write calendar file '{}'", path.display())),
        }
    }
}

/// Sibling temp file for `path`: `out.ics` becomes `out.ics.tmp`.
pub fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let mut name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("'{}' does not name a file", path.display()))?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

/// Atomic write: Write to .tmp file then rename
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = temp_path_for(path)?;
    fs::write(&tmp_path, contents)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}
