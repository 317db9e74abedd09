// File: ./src/config.rs
// Handles configuration loading and defaults.
use crate::context::AppContext;
use crate::extractor::ExtractionRules;
use crate::model::SessionSchedule;
use anyhow::{Error, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_short_session_max_hours() -> u32 {
    4
}
fn default_short_session_start() -> String {
    "17:00".to_string()
}
fn default_long_session_start() -> String {
    "09:00".to_string()
}
fn default_lunch_break_hours() -> u32 {
    1
}
fn default_calendar_name() -> String {
    "BH timetable".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ScheduleSettings {
    #[serde(default = "default_short_session_max_hours")]
    pub short_session_max_hours: u32,
    #[serde(default = "default_short_session_start")]
    pub short_session_start: String, // Format "HH:MM"
    #[serde(default = "default_long_session_start")]
    pub long_session_start: String, // Format "HH:MM"
    #[serde(default = "default_lunch_break_hours")]
    pub lunch_break_hours: u32,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            short_session_max_hours: default_short_session_max_hours(),
            short_session_start: default_short_session_start(),
            long_session_start: default_long_session_start(),
            lunch_break_hours: default_lunch_break_hours(),
        }
    }
}

impl ScheduleSettings {
    fn parse_time(key: &str, value: &str) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(value.trim(), "%H:%M")
            .map_err(|e| anyhow::anyhow!("Invalid {} '{}' (expected HH:MM): {}", key, value, e))
    }

    pub fn to_schedule(&self) -> Result<SessionSchedule> {
        Ok(SessionSchedule {
            short_session_max_hours: self.short_session_max_hours,
            short_session_start: Self::parse_time(
                "short_session_start",
                &self.short_session_start,
            )?,
            long_session_start: Self::parse_time("long_session_start", &self.long_session_start)?,
            lunch_break_hours: self.lunch_break_hours,
        })
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct CalendarSettings {
    #[serde(default = "default_calendar_name")]
    pub name: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            name: default_calendar_name(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionRules,
    #[serde(default)]
    pub schedule: ScheduleSettings,
    #[serde(default)]
    pub calendar: CalendarSettings,
}

impl Config {
    /// Load the configuration from the context's config file.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        // Explicitly detect missing file so callers can fall back to defaults.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        config.validate().map_err(|e| {
            anyhow::anyhow!("Invalid config file '{}': {}", path.display(), e)
        })?;
        Ok(config)
    }

    /// Like `load`, but a missing file yields the built-in defaults. So does
    /// a context that cannot name a config directory at all (no home).
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        let path = match ctx.get_config_file_path() {
            Ok(path) => path,
            Err(e) => {
                log::debug!("No config directory ({:#}), using built-in defaults", e);
                return Ok(Self::default());
            }
        };
        match Self::load_from_path(&path) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using built-in defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Helper to detect whether an anyhow::Error indicates that the config file was missing.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
        })
    }

    pub fn validate(&self) -> Result<()> {
        let rules = &self.extraction;
        if rules.everyone_token.is_empty() {
            return Err(anyhow::anyhow!("extraction.everyone_token must not be empty"));
        }
        if rules.group_prefixes.is_empty() || rules.group_prefixes.iter().any(String::is_empty) {
            return Err(anyhow::anyhow!(
                "extraction.group_prefixes must list at least one non-empty prefix"
            ));
        }
        if rules.duration_offsets.contains(&0) || rules.group_name_offsets.contains(&0) {
            return Err(anyhow::anyhow!(
                "extraction offsets are relative to the instructor cell and cannot be 0"
            ));
        }
        if self.schedule.lunch_break_hours >= 24 {
            return Err(anyhow::anyhow!(
                "schedule.lunch_break_hours must be less than 24"
            ));
        }
        self.schedule.to_schedule()?;
        Ok(())
    }

    pub fn session_schedule(&self) -> Result<SessionSchedule> {
        self.schedule.to_schedule()
    }
}
