// Tests for loading settings from config.toml.
use anyhow::Result;
use bhcal::config::{Config, ScheduleSettings};
use bhcal::context::{AppContext, TestContext};
use bhcal::convert::Converter;
use bhcal::grid::{Cell, Grid};
use chrono::{NaiveDate, NaiveTime, Timelike};
use std::fs;
use std::path::PathBuf;

/// A host without a home directory: no config location can be named.
#[derive(Debug)]
struct HomelessContext;

impl AppContext for HomelessContext {
    fn get_config_dir(&self) -> Result<PathBuf> {
        Err(anyhow::anyhow!("No home directory"))
    }
}

fn write_config(ctx: &TestContext, body: &str) {
    let path = ctx.get_config_file_path().unwrap();
    fs::write(path, body).unwrap();
}

#[test]
fn test_defaults_reproduce_built_in_rules() {
    let config = Config::default();
    assert_eq!(config.extraction.everyone_token, "Mindenki");
    assert_eq!(config.extraction.group_prefixes, vec!["BH", "JSC"]);
    assert_eq!(config.extraction.placeholder_group, "Egyéb képzés");
    assert_eq!(config.extraction.summary_prefix, "BH: ");
    assert_eq!(config.extraction.group_name_offsets, vec![-1, -2]);
    assert_eq!(config.extraction.duration_offsets, vec![1, 2]);
    assert_eq!(config.extraction.column_sample_rows, 10);

    let schedule = config.session_schedule().unwrap();
    assert_eq!(schedule.short_session_max_hours, 4);
    assert_eq!(schedule.short_session_start, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
    assert_eq!(schedule.long_session_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    assert_eq!(schedule.lunch_break_hours, 1);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let ctx = TestContext::new();
    let err = Config::load(&ctx).unwrap_err();
    assert!(Config::is_missing_config_error(&err));

    let config = Config::load_or_default(&ctx).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_empty_file_equals_defaults() {
    let ctx = TestContext::new();
    write_config(&ctx, "");
    assert_eq!(Config::load(&ctx).unwrap(), Config::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let ctx = TestContext::new();
    write_config(
        &ctx,
        r#"
[extraction]
group_prefixes = ["BH", "JSC", "PM"]

[schedule]
short_session_start = "16:30"
"#,
    );
    let config = Config::load(&ctx).unwrap();
    assert_eq!(config.extraction.group_prefixes, vec!["BH", "JSC", "PM"]);
    assert_eq!(config.extraction.everyone_token, "Mindenki");

    let schedule = config.session_schedule().unwrap();
    assert_eq!(schedule.short_session_start, NaiveTime::from_hms_opt(16, 30, 0).unwrap());
    assert_eq!(schedule.long_session_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    assert_eq!(config.calendar.name, "BH timetable");
}

#[test]
fn test_invalid_time_is_rejected() {
    let ctx = TestContext::new();
    write_config(&ctx, "[schedule]\nlong_session_start = \"nine\"\n");
    let err = Config::load(&ctx).unwrap_err();
    assert!(!Config::is_missing_config_error(&err));
    assert!(err.to_string().contains("long_session_start"));
    assert!(Config::load_or_default(&ctx).is_err());
}

#[test]
fn test_syntax_error_is_rejected() {
    let ctx = TestContext::new();
    write_config(&ctx, "[extraction\n");
    let err = Config::load(&ctx).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_empty_prefix_list_is_rejected() {
    let ctx = TestContext::new();
    write_config(&ctx, "[extraction]\ngroup_prefixes = []\n");
    assert!(Config::load(&ctx).is_err());
}

#[test]
fn test_zero_offset_is_rejected() {
    let ctx = TestContext::new();
    write_config(&ctx, "[extraction]\nduration_offsets = [0, 1]\n");
    assert!(Config::load(&ctx).is_err());
}

#[test]
fn test_loaded_settings_drive_extraction() {
    let ctx = TestContext::new();
    write_config(
        &ctx,
        r#"
[extraction]
group_prefixes = ["PM"]
summary_prefix = "Óra: "

[schedule]
short_session_max_hours = 2
lunch_break_hours = 0
"#,
    );
    let config = Config::load(&ctx).unwrap();

    let day = NaiveDate::from_ymd_opt(2025, 3, 4)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let grid = Grid::from_rows(vec![vec![
        Cell::Date(day),
        Cell::Text("PM-ALAP".to_string()),
        Cell::Text("Kovács Anna".to_string()),
        Cell::Numeric(3.0),
    ]]);

    let (events, warnings) = Converter::new(&config)
        .events_from_grid(&grid, "Kovács Anna")
        .unwrap();
    assert_eq!(warnings, 0);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].summary, "Óra: PM-ALAP");
    assert_eq!(events[0].start.hour(), 9);
    assert_eq!(events[0].duration_hours, 3);
}

#[test]
fn test_no_home_directory_falls_back_to_defaults() {
    assert!(Config::load(&HomelessContext).is_err());
    let config = Config::load_or_default(&HomelessContext).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_schedule_defaults_match_serde_defaults() {
    let from_toml: ScheduleSettings = toml::from_str("").unwrap();
    assert_eq!(from_toml, ScheduleSettings::default());
}

#[test]
fn test_huge_lunch_break_is_rejected() {
    let ctx = TestContext::new();
    write_config(&ctx, "[schedule]\nlunch_break_hours = 4294967295\n");
    let err = Config::load(&ctx).unwrap_err();
    assert!(err.to_string().contains("lunch_break_hours"));
}
