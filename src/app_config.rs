use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::AppError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Batch conversion settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Caption output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Settings for converting many files in one run
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BatchConfig {
    /// Maximum number of files converted at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Whether directories given as input are scanned recursively
    #[serde(default = "default_true")]
    pub recursive: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            recursive: true,
        }
    }
}

/// Settings for the generated caption documents
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Spaces per nesting level in ITT output
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent_size: default_indent_size(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the `log` facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_concurrency() -> usize {
    4
}

fn default_indent_size() -> usize {
    crate::itt::DEFAULT_INDENT_SIZE
}

fn default_true() -> bool {
    true
}

const MAX_INDENT_SIZE: usize = 8;

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| AppError::Config(format!("Failed to open config file {:?}: {}", path, e)))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    /// Save the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AppError> {
        let config_json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), config_json)?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.batch.concurrency == 0 {
            return Err(AppError::Config("batch.concurrency must be at least 1".to_string()));
        }

        if self.output.indent_size > MAX_INDENT_SIZE {
            return Err(AppError::Config(format!(
                "output.indent_size must be at most {}, got {}",
                MAX_INDENT_SIZE, self.output.indent_size
            )));
        }

        Ok(())
    }
}
