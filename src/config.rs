//! Configuration management for the moon transit validator
//!
//! Every setting has a default matching the stock report, so running without
//! a config file or environment variables checks the built-in sites against
//! `./target/release/astrotimes`. Overrides come from an optional
//! `moon-transit.toml` and `MOONTRANSIT_`-prefixed environment variables
//! (`MOONTRANSIT_ASTROTIMES__TIMEOUT_SECONDS=8`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ValidatorError;
use crate::models::{Location, validation_sites};

/// Default config file, looked up in the working directory
pub const CONFIG_FILE: &str = "moon-transit.toml";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// External astrotimes executable
    #[serde(default)]
    pub astrotimes: AstrotimesConfig,
    /// USNO one-day API
    #[serde(default)]
    pub usno: UsnoConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Sites to check, in report order
    #[serde(default = "validation_sites")]
    pub locations: Vec<Location>,
}

/// How to invoke astrotimes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstrotimesConfig {
    /// Path to the executable
    #[serde(default = "default_astrotimes_program")]
    pub program: String,
    /// Extra arguments placed before the location flags
    #[serde(default)]
    pub args: Vec<String>,
    /// Wall-clock limit per invocation
    #[serde(default = "default_astrotimes_timeout")]
    pub timeout_seconds: u64,
}

/// USNO API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsnoConfig {
    /// One-day rise/set/transit endpoint
    #[serde(default = "default_usno_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_usno_timeout")]
    pub timeout_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_astrotimes_program() -> String {
    "./target/release/astrotimes".to_string()
}

fn default_astrotimes_timeout() -> u64 {
    5
}

fn default_usno_base_url() -> String {
    "https://aa.usno.navy.mil/api/rstt/oneday".to_string()
}

fn default_usno_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for AstrotimesConfig {
    fn default() -> Self {
        Self {
            program: default_astrotimes_program(),
            args: Vec::new(),
            timeout_seconds: default_astrotimes_timeout(),
        }
    }
}

impl Default for UsnoConfig {
    fn default() -> Self {
        Self {
            base_url: default_usno_base_url(),
            timeout_seconds: default_usno_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            astrotimes: AstrotimesConfig::default(),
            usno: UsnoConfig::default(),
            logging: LoggingConfig::default(),
            locations: validation_sites(),
        }
    }
}

impl UsnoConfig {
    pub fn validate(&self) -> std::result::Result<(), ValidatorError> {
        if !(1..=300).contains(&self.timeout_seconds) {
            return Err(ValidatorError::config(
                "USNO timeout must be between 1 and 300 seconds",
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidatorError::config(
                "USNO base URL must be a valid HTTP or HTTPS URL",
            ));
        }
        Ok(())
    }
}

impl ValidatorConfig {
    /// Load configuration from `moon-transit.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from the specified file (if it exists) and the environment
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        Self::load_with(&config_file, Environment::with_prefix("MOONTRANSIT"))
    }

    fn load_with(config_file: &Path, environment: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            environment
                .prefix_separator("_")
                .separator("__")
                .list_separator(" ")
                .with_list_parse_key("astrotimes.args")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ValidatorConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Replace empty or zero values with their defaults
    pub fn apply_defaults(&mut self) {
        if self.astrotimes.program.is_empty() {
            self.astrotimes.program = default_astrotimes_program();
        }
        if self.astrotimes.timeout_seconds == 0 {
            self.astrotimes.timeout_seconds = default_astrotimes_timeout();
        }
        if self.usno.base_url.is_empty() {
            self.usno.base_url = default_usno_base_url();
        }
        if self.usno.timeout_seconds == 0 {
            self.usno.timeout_seconds = default_usno_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate the settings the report uses.
    ///
    /// The `usno` section is only checked by [`UsnoConfig::validate`] when a
    /// client is built, so a bad USNO value never blocks the report.
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_locations()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if !(1..=300).contains(&self.astrotimes.timeout_seconds) {
            return Err(ValidatorError::config(
                "Astrotimes timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ValidatorError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ValidatorError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }

    fn validate_locations(&self) -> Result<()> {
        if self.locations.is_empty() {
            return Err(ValidatorError::config("At least one location is required").into());
        }
        for location in &self.locations {
            location.validate()?;
        }
        Ok(())
    }
}
