// File: ./src/cli.rs
//! Command-line parsing and help text.

use crate::calendar::Destination;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertArgs {
    pub source: PathBuf,
    pub dest: Destination,
    pub teacher: String,
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub log_level: LevelFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Help,
    Version,
    Convert(ConvertArgs),
    /// Arguments did not form a valid invocation; the message says why.
    Usage(String),
}

/// Parses arguments without the program name.
pub fn parse_args<I, S>(args: I) -> CliCommand
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut positionals: Vec<String> = Vec::new();
    let mut root = None;
    let mut config = None;
    let mut log_level = LevelFilter::Info;

    let mut iter = args.into_iter().map(Into::into);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => return CliCommand::Help,
            "-V" | "--version" => return CliCommand::Version,
            "-v" | "--verbose" => log_level = LevelFilter::Debug,
            "-q" | "--quiet" => log_level = LevelFilter::Warn,
            "-r" | "--root" => match iter.next() {
                Some(path) => root = Some(PathBuf::from(path)),
                None => return CliCommand::Usage(format!("{} requires a path", arg)),
            },
            "-c" | "--config" => match iter.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => return CliCommand::Usage(format!("{} requires a path", arg)),
            },
            // A lone dash is the stdout destination, not a flag.
            s if s.starts_with('-') && s != "-" => {
                return CliCommand::Usage(format!("Unknown option: {}", s));
            }
            _ => positionals.push(arg),
        }
    }

    if positionals.len() < 3 {
        return CliCommand::Usage(
            "3 arguments are expected: sourceFilePath, destFilePath, teacherName.".to_string(),
        );
    }
    if positionals.len() > 3 {
        return CliCommand::Usage(format!(
            "Unexpected extra argument: {}",
            positionals[3]
        ));
    }

    let mut positionals = positionals.into_iter();
    let (Some(source), Some(dest), Some(teacher)) =
        (positionals.next(), positionals.next(), positionals.next())
    else {
        return CliCommand::Usage("3 arguments are expected.".to_string());
    };

    if teacher.is_empty() {
        return CliCommand::Usage("teacherName must not be empty.".to_string());
    }

    CliCommand::Convert(ConvertArgs {
        source: PathBuf::from(source),
        dest: Destination::parse(&dest),
        teacher,
        root,
        config,
        log_level,
    })
}

pub fn print_help(binary_name: &str) {
    println!(
        "bhcal v{} - Converts a BH timetable spreadsheet into an iCalendar file",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] <source> <dest> <teacher>", binary_name);
    println!();
    println!("ARGUMENTS:");
    println!("    <source>              Timetable workbook (.xlsx, .xlsm, .xls, .ods). First sheet is read.");
    println!("    <dest>                Calendar file to write, or '-' for standard output.");
    println!("    <teacher>             Instructor name, matched exactly (case-sensitive).");
    println!("                          Cells reading 'Mindenki' match every instructor.");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for configuration.");
    println!("    -c, --config <path>   Read settings from this TOML file.");
    println!("    -v, --verbose         Log every extracted event.");
    println!("    -q, --quiet           Only log warnings and errors.");
    println!("    -V, --version         Print the version.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("EXAMPLES:");
    println!("    {} orarend.xlsx kovacs.ics \"Kovács Anna\"", binary_name);
    println!("    {} orarend.xlsx - \"Kovács Anna\" | grep SUMMARY", binary_name);
}
