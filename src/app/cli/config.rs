//! TOML configuration file parsing and loading
//!
//! This module handles loading of the optional TOML configuration file,
//! including default config file discovery, and merging its values under
//! the command-line arguments.

use crate::core::validation::ValidationError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::args::Args;

/// Directory under the platform config dir holding the default config file
pub const CONFIG_DIR_NAME: &str = "Sigscan";
pub const CONFIG_FILE_NAME: &str = "sigscan.toml";

/// Values accepted in the configuration file
///
/// Keys use the long option names (`base`, `log-level`, ...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub base: Option<PathBuf>,
    pub log: Option<PathBuf>,
    pub path: Option<PathBuf>,
    pub threads: Option<usize>,
    pub digest: Option<String>,
    pub append: Option<bool>,
    pub report_format: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub log_format: Option<String>,
    pub color: Option<bool>,
}

impl FileConfig {
    /// Parse configuration text
    pub fn from_toml(contents: &str) -> Result<Self, ValidationError> {
        toml::from_str(contents)
            .map_err(|e| ValidationError::new(&format!("Invalid configuration: {}", e)))
    }
}

/// Default configuration file location, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl Args {
    /// Resolve which configuration file to load
    ///
    /// A file named with `--config-file` must exist; the default location is
    /// used only when present.
    pub fn config_path(&self) -> Result<Option<PathBuf>, ValidationError> {
        match &self.config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(ValidationError::new(&format!(
                        "The specified configuration file does not exist: {}",
                        path.display()
                    )));
                }
                Ok(Some(path.clone()))
            }
            None => Ok(default_config_path().filter(|path| path.is_file())),
        }
    }

    /// Load the configuration file, if any, and merge it under these arguments
    pub fn apply_config_file(&mut self) -> Result<Option<PathBuf>, ValidationError> {
        let Some(path) = self.config_path()? else {
            return Ok(None);
        };
        let config = load_config_file(&path)?;
        self.merge_config(config);
        log::debug!("Applied configuration from {}", path.display());
        Ok(Some(path))
    }

    /// Fill every option not given on the command line from `config`
    pub fn merge_config(&mut self, config: FileConfig) {
        fill(&mut self.base, config.base);
        fill(&mut self.log, config.log);
        fill(&mut self.path, config.path);
        fill(&mut self.threads, config.threads);
        fill(&mut self.digest, config.digest);
        fill(&mut self.report_format, config.report_format);
        fill(&mut self.log_level, config.log_level);
        fill(&mut self.log_file, config.log_file);
        fill(&mut self.log_format, config.log_format);

        if !self.append {
            self.append = config.append.unwrap_or(false);
        }
        // Either explicit flag overrides the file
        if !self.color && !self.no_color {
            match config.color {
                Some(true) => self.color = true,
                Some(false) => self.no_color = true,
                None => {}
            }
        }
    }
}

fn fill<T>(target: &mut Option<T>, value: Option<T>) {
    if target.is_none() {
        *target = value;
    }
}

/// Read and parse a configuration file
pub fn load_config_file(path: &Path) -> Result<FileConfig, ValidationError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ValidationError::new(&format!(
            "Error reading configuration file {}: {}",
            path.display(),
            e
        ))
    })?;
    FileConfig::from_toml(&contents).map_err(|e| {
        ValidationError::new(&format!("{} (in {})", e.details(), path.display()))
    })
}
