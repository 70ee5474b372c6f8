//! Application startup: parse arguments, load the database, scan, report

use super::cli::args::Args;
use super::cli::display::print_report;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::scanner::api::Scanner;
use clap::CommandFactory;
use std::ffi::OsString;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

const DEFAULT_LOG_LEVEL: &str = "warn";

/// Run with the process arguments and return the exit code
pub fn run() -> i32 {
    run_with_args(std::env::args_os())
}

/// Run with an explicit argument list (first item is the program name)
pub fn run_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut args = match Args::parse_from_list(args) {
        Ok(args) => args,
        Err(e) => {
            // --help and --version land here too, with exit code 0
            let _ = e.print();
            return e.exit_code();
        }
    };

    let config_path = match args.apply_config_file() {
        Ok(path) => path,
        Err(e) => return usage_error(e.details()),
    };

    // Before logging starts, so a bad level or format from the config file is reported
    if let Err(e) = args.validate() {
        return usage_error(e.details());
    }

    let use_color = args.use_color();
    let log_file = args
        .diagnostic_log_file()
        .map(|path| path.to_string_lossy().to_string());
    if let Err(e) = init_logging(
        Some(args.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)),
        args.log_format.as_deref(),
        log_file.as_deref(),
        use_color,
    ) {
        eprintln!("Warning: could not initialise logging: {}", e);
    }

    log::info!(
        "sigscan {} starting",
        crate::core::version::long_version()
    );
    if let Some(path) = config_path {
        log::info!("Using configuration file {}", path.display());
    }

    let inputs = match args.scan_inputs() {
        Ok(inputs) => inputs,
        Err(e) => return usage_error(e.details()),
    };
    let (config, report_format) = match (args.scan_config(), args.report_format()) {
        (Ok(config), Ok(format)) => (config, format),
        (Err(e), _) | (_, Err(e)) => return usage_error(e.details()),
    };

    let mut scanner = Scanner::new(config);
    if let Err(e) = scanner.load_database(&inputs.base) {
        log_error_with_context(&e, "Loading signature database");
        eprintln!(
            "Failed to load signature database from {}: {}",
            inputs.base.display(),
            e
        );
        return EXIT_FAILURE;
    }

    log::info!(
        "Starting scan of {} (match log {})",
        inputs.path.display(),
        inputs.log.display()
    );
    let result = match scanner.scan(&inputs.path, &inputs.log) {
        Ok(result) => result,
        Err(e) => {
            log_error_with_context(&e, "Scanning directory");
            eprintln!("Scan failed: {}", e);
            return EXIT_FAILURE;
        }
    };

    if let Err(e) = print_report(&result, report_format, use_color) {
        eprintln!("Failed to render report: {}", e);
        return EXIT_FAILURE;
    }
    EXIT_SUCCESS
}

fn usage_error(message: &str) -> i32 {
    eprintln!("Error: {}", message);
    eprintln!("{}", Args::command().render_usage());
    eprintln!("For more information, try '--help'.");
    EXIT_USAGE
}
