//! Run configuration.
//!
//! Resolution order for the platform: explicit value (flag or `SPECRUN_PLATFORM`, merged by clap), then the
//! compile-time target.

use clap::ValueEnum;
use miette::Diagnostic;
use specrun_core::Platform;
use thiserror::Error;

use crate::harness::RunOptions;

/// Environment variable that overrides the detected platform.
pub const PLATFORM_ENV: &str = "SPECRUN_PLATFORM";

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// pytest-style progress and summary on stderr
    #[default]
    Console,
    /// One JSON object per line on stdout
    Json,
}

/// Invalid run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ConfigError {
    #[error("platform identifier `{0}` is not of the form <arch>-<os>")]
    #[diagnostic(
        code(specrun::config::platform),
        help("use an identifier like `x86_64-linux` or `aarch64-darwin`")
    )]
    MalformedPlatform(String),

    #[error("filter must not be empty")]
    #[diagnostic(code(specrun::config::filter), help("omit -k to run every scenario"))]
    EmptyFilter,
}

/// Run configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Platform override; detected when `None`
    pub platform: Option<String>,
    /// Substring filter on `"<group> <scenario>"`
    pub filter: Option<String>,
    /// One line per scenario instead of progress marks
    pub verbose: bool,
    /// Stop after the first failure
    pub stop_on_fail: bool,
    /// Report format
    pub format: OutputFormat,
}

impl RunConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platform(mut self, platform: Option<String>) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_stop_on_fail(mut self, stop_on_fail: bool) -> Self {
        self.stop_on_fail = stop_on_fail;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Resolve the platform the run executes under.
    ///
    /// ## Errors
    /// - `ConfigError::MalformedPlatform` if an override is not `<arch>-<os>`.
    pub fn platform(&self) -> Result<Platform, ConfigError> {
        match self.platform.as_deref() {
            None => Ok(Platform::detect()),
            Some(id) => {
                let well_formed = id
                    .split_once('-')
                    .is_some_and(|(arch, os)| !arch.is_empty() && !os.is_empty());
                if well_formed {
                    Ok(Platform::new(id))
                } else {
                    Err(ConfigError::MalformedPlatform(id.to_string()))
                }
            }
        }
    }

    /// Registry run options.
    ///
    /// ## Errors
    /// - `ConfigError::EmptyFilter` for `-k ""`.
    pub fn run_options(&self) -> Result<RunOptions, ConfigError> {
        if self.filter.as_deref() == Some("") {
            return Err(ConfigError::EmptyFilter);
        }
        Ok(RunOptions {
            filter: self.filter.clone(),
            stop_on_fail: self.stop_on_fail,
        })
    }
}
