use bhcal::cli::{self, CliCommand, ConvertArgs};
use bhcal::config::Config;
use bhcal::context::StandardContext;
use bhcal::convert::Converter;
use anyhow::Result;
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::env;
use std::process::ExitCode;

fn init_logging(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    // Logs go to stderr so `-` can stream the calendar on stdout.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn run(args: &ConvertArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load_or_default(&StandardContext::new(args.root.clone()))?,
    };
    let report = Converter::new(&config).convert(&args.source, &args.dest, &args.teacher)?;
    if report.warnings > 0 {
        log::info!("{} row(s) needed attention, see warnings above", report.warnings);
    }
    Ok(())
}

fn main() -> ExitCode {
    let binary_name = env::args().next().unwrap_or_else(|| "bhcal".to_string());

    match cli::parse_args(env::args().skip(1)) {
        CliCommand::Help => {
            cli::print_help(&binary_name);
            ExitCode::SUCCESS
        }
        CliCommand::Version => {
            println!("bhcal {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        CliCommand::Usage(message) => {
            init_logging(LevelFilter::Warn);
            log::warn!("{}", message);
            eprintln!("Run '{} --help' for usage.", binary_name);
            // A usage mistake is reported but not treated as a failed run.
            ExitCode::SUCCESS
        }
        CliCommand::Convert(args) => {
            init_logging(args.log_level);
            match run(&args) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    log::error!("Conversion failed: {:#}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
