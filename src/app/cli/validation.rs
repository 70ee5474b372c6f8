//! CLI argument validation utilities
//!
//! Turns merged arguments into the values the scanner needs, reporting
//! missing inputs and out-of-range options as `ValidationError`s.

use crate::core::validation::{validate_thread_count, ValidationError};
use crate::scanner::digest::DigestAlgorithm;
use crate::scanner::types::ScanConfig;
use std::path::PathBuf;
use std::str::FromStr;

use super::args::Args;
use super::display::ReportFormat;

/// Accepted `--log-level` values
pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Accepted `--log-format` values
pub const LOG_FORMATS: [&str; 3] = ["text", "ext", "json"];

/// The three paths every scan needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanInputs {
    pub base: PathBuf,
    pub log: PathBuf,
    pub path: PathBuf,
}

impl Args {
    /// Validate option values for consistency and constraints
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(threads) = self.threads {
            validate_thread_count(threads)?;
        }
        self.digest_algorithm()?;
        self.report_format()?;
        validate_choice("log-level", self.log_level.as_deref(), &LOG_LEVELS)?;
        validate_choice("log-format", self.log_format.as_deref(), &LOG_FORMATS)?;
        Ok(())
    }

    /// Database, match log and scan root, or an error naming what is missing
    pub fn scan_inputs(&self) -> Result<ScanInputs, ValidationError> {
        let missing: Vec<&str> = [
            ("--base", self.base.is_none()),
            ("--log", self.log.is_none()),
            ("--path", self.path.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| *name)
        .collect();

        match (&self.base, &self.log, &self.path) {
            (Some(base), Some(log), Some(path)) => Ok(ScanInputs {
                base: base.clone(),
                log: log.clone(),
                path: path.clone(),
            }),
            _ => Err(ValidationError::new(&format!(
                "Missing required option(s): {}",
                missing.join(", ")
            ))),
        }
    }

    pub fn digest_algorithm(&self) -> Result<DigestAlgorithm, ValidationError> {
        match self.digest.as_deref() {
            None => Ok(DigestAlgorithm::default()),
            Some(name) => DigestAlgorithm::from_str(name).map_err(|_| {
                ValidationError::new(&format!(
                    "Unknown digest algorithm '{}' (expected md5 or sha256)",
                    name
                ))
            }),
        }
    }

    pub fn report_format(&self) -> Result<ReportFormat, ValidationError> {
        match self.report_format.as_deref() {
            None => Ok(ReportFormat::default()),
            Some(name) => ReportFormat::from_str(name).map_err(|_| {
                ValidationError::new(&format!(
                    "Unknown report format '{}' (expected text or json)",
                    name
                ))
            }),
        }
    }

    /// Scanner settings from the validated options
    pub fn scan_config(&self) -> Result<ScanConfig, ValidationError> {
        let workers = match self.threads {
            Some(threads) => Some(validate_thread_count(threads)?),
            None => None,
        };
        Ok(ScanConfig {
            workers,
            algorithm: self.digest_algorithm()?,
            append_log: self.append,
        })
    }
}

/// Check an option value against its accepted names
///
/// Command-line values are already restricted by clap; values from the
/// configuration file are not.
fn validate_choice(
    option: &str,
    value: Option<&str>,
    accepted: &[&str],
) -> Result<(), ValidationError> {
    match value {
        Some(value) if !accepted.contains(&value) => Err(ValidationError::new(&format!(
            "Invalid value '{}' for --{} (expected one of: {})",
            value,
            option,
            accepted.join(", ")
        ))),
        _ => Ok(()),
    }
}
