// Tests for rendering extracted sessions as an iCalendar document.
use bhcal::calendar::{CalendarWriter, Destination, atomic_write, temp_path_for};
use bhcal::context::TestContext;
use bhcal::model::EventRecord;
use chrono::NaiveDate;
use std::fs;

fn record(label: &str, day: u32, hour: u32, hours: u32) -> EventRecord {
    let start = NaiveDate::from_ymd_opt(2025, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap();
    EventRecord::new(label.to_string(), start, hours)
}

#[test]
fn test_empty_calendar_is_still_valid() {
    let ics = CalendarWriter::new("Timetable").to_ics_string(&[]);
    assert!(ics.contains("BEGIN:VCALENDAR"));
    assert!(ics.contains("VERSION:2.0"));
    assert!(ics.contains("END:VCALENDAR"));
    assert!(!ics.contains("BEGIN:VEVENT"));
}

#[test]
fn test_one_vevent_per_record() {
    let events = vec![
        record("BH: BH-JAVA-01", 4, 17, 3),
        record("BH: Egyéb képzés", 8, 9, 7),
    ];
    let ics = CalendarWriter::new("Timetable").to_ics_string(&events);

    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
    assert_eq!(ics.matches("END:VEVENT").count(), 2);
    assert!(ics.contains("SUMMARY:BH: BH-JAVA-01"));
    assert!(ics.contains("DESCRIPTION:BH: BH-JAVA-01"));
    assert!(ics.contains("SUMMARY:BH: Egyéb képzés"));
    assert!(ics.contains("DURATION:PT3H"));
    assert!(ics.contains("DURATION:PT7H"));
    assert_eq!(ics.matches("UID:").count(), 2);
    assert!(ics.contains("X-WR-CALNAME:Timetable"));
    assert!(!ics.contains("RRULE"));
    assert!(!ics.contains("BEGIN:VALARM"));
}

#[test]
fn test_start_is_local_time_expressed_in_utc() {
    let event = record("BH: BH-01", 4, 17, 2);
    let utc = event.start_utc().expect("17:00 exists in every zone");
    let expected = format!("DTSTART:{}", utc.format("%Y%m%dT%H%M%SZ"));

    let ics = CalendarWriter::new("Timetable").to_ics_string(&[event]);
    assert!(ics.contains(&expected), "missing {} in\n{}", expected, ics);
}

#[test]
fn test_iso_duration_format() {
    assert_eq!(record("x", 4, 17, 4).iso_duration(), "PT4H");
    assert_eq!(record("x", 4, 9, 9).iso_duration(), "PT9H");
}

#[test]
fn test_write_to_file_replaces_existing_calendar() {
    let ctx = TestContext::new();
    let path = ctx.root.join("kovacs.ics");
    fs::write(&path, "stale").unwrap();

    let writer = CalendarWriter::new("Timetable");
    writer
        .write(&Destination::File(path.clone()), &[record("BH: BH-01", 4, 17, 2)])
        .unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("BEGIN:VCALENDAR"));
    assert!(written.contains("SUMMARY:BH: BH-01"));
    assert!(!ctx.root.join("kovacs.ics.tmp").exists());
}

#[test]
fn test_write_into_missing_directory_fails() {
    let ctx = TestContext::new();
    let path = ctx.root.join("no_such_dir").join("out.ics");
    let result = CalendarWriter::new("Timetable")
        .write(&Destination::File(path.clone()), &[record("BH: BH-01", 4, 17, 2)]);

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("out.ics"));
    assert!(!path.exists());
}

#[test]
fn test_atomic_write_leaves_no_temp_file() {
    let ctx = TestContext::new();
    let path = ctx.root.join("plain.ics");
    atomic_write(&path, "data").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "data");
    assert!(!ctx.root.join("plain.ics.tmp").exists());
}

#[test]
fn test_destination_parsing() {
    assert_eq!(Destination::parse("-"), Destination::Stdout);
    assert_eq!(
        Destination::parse("out.ics"),
        Destination::File("out.ics".into())
    );
    assert_eq!(Destination::Stdout.to_string(), "<stdout>");
}

#[test]
fn test_atomic_write_keeps_unrelated_tmp_sibling() {
    let ctx = TestContext::new();
    let sibling = ctx.root.join("out.tmp");
    fs::write(&sibling, "keep me").unwrap();

    atomic_write(ctx.root.join("out.ics"), "calendar").unwrap();

    assert_eq!(fs::read_to_string(&sibling).unwrap(), "keep me");
    assert_eq!(fs::read_to_string(ctx.root.join("out.ics")).unwrap(), "calendar");
}

#[test]
fn test_temp_path_appends_to_full_file_name() {
    assert_eq!(
        temp_path_for(std::path::Path::new("/data/out.ics")).unwrap(),
        std::path::PathBuf::from("/data/out.ics.tmp")
    );
    assert_eq!(
        temp_path_for(std::path::Path::new("calendar")).unwrap(),
        std::path::PathBuf::from("calendar.tmp")
    );
}
