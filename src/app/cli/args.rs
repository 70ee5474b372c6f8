//! Core CLI arguments structure
//!
//! This module contains the Args struct definition and parsing entry points.
//! Validation and configuration loading are handled by separate modules.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use super::validation::{LOG_FORMATS, LOG_LEVELS};

// Command-line options
//
// Every option except --config-file may also come from the configuration
// file; values given on the command line take precedence.
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "sigscan")]
#[command(about = "Scan a directory tree for files matching known malware signatures")]
#[command(version, long_version = crate::core::version::long_version())]
pub struct Args {
    /// Signature database (one `digest;verdict` record per line)
    #[arg(short = 'b', long = "base", value_name = "FILE")]
    pub base: Option<PathBuf>,

    /// Match log destination (one `path;digest;verdict` line per match)
    #[arg(short = 'm', long = "log", value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Root directory to scan
    #[arg(short = 'p', long = "path", value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Worker threads (defaults to available parallelism)
    #[arg(short = 't', long = "threads", value_name = "COUNT")]
    pub threads: Option<usize>,

    /// Digest algorithm used by the signature database
    #[arg(short = 'd', long = "digest", value_name = "ALGORITHM", value_parser = ["md5", "sha256"])]
    pub digest: Option<String>,

    /// Append to the match log instead of truncating it
    #[arg(short = 'a', long = "append")]
    pub append: bool,

    /// Report output format
    #[arg(short = 'r', long = "report-format", value_name = "FORMAT", value_parser = ["text", "json"])]
    pub report_format: Option<String>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = LOG_LEVELS)]
    pub log_level: Option<String>,

    /// Diagnostic log file path (use 'none' to log to stderr)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = LOG_FORMATS)]
    pub log_format: Option<String>,

    /// Force colored output
    #[arg(short = 'g', long = "color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", conflicts_with = "color")]
    pub no_color: bool,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from an explicit argument list (first item is the program name)
    pub fn parse_from_list<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    /// Resolve whether output should be colored
    ///
    /// Explicit flags win; otherwise color only when stdout is a terminal and
    /// `NO_COLOR` is unset.
    pub fn use_color(&self) -> bool {
        use std::io::IsTerminal;

        if self.no_color {
            false
        } else if self.color {
            true
        } else {
            std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
        }
    }

    /// Diagnostic log file, with the magic values `none` and `-` meaning stderr
    pub fn diagnostic_log_file(&self) -> Option<&std::path::Path> {
        match self.log_file.as_deref() {
            Some(path) => {
                let text = path.to_string_lossy();
                if text.eq_ignore_ascii_case("none") || text == "-" {
                    None
                } else {
                    Some(path)
                }
            }
            None => None,
        }
    }
}
