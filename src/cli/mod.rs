//! CLI module for specrun
//!
//! ## Commands
//!
//! - `run` - Run the conformance corpus (pytest-style or JSON lines)
//! - `list` - List scenario descriptions
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod config;

use std::fmt;
use std::process;

use clap::{Parser, Subcommand};

use config::{OutputFormat, PLATFORM_ENV, RunConfig};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create an error with a custom exit code.
    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self::new(message, ExitCode(code))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Behavior-spec runner for the specrun runtime
#[derive(Parser, Debug)]
#[command(name = "specrun")]
#[command(version = VERSION)]
#[command(about = "Run the runtime conformance corpus", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run scenarios (pytest-style)
    Run {
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
        /// Stop on first failure
        #[arg(short = 'x', long = "exitfirst")]
        stop_on_fail: bool,
        /// Filter scenarios by a substring of "<group> <scenario>"
        #[arg(short = 'k', value_name = "EXPR")]
        filter: Option<String>,
        /// Platform identifier to evaluate guards against (e.g. x86_64-windows)
        #[arg(long, value_name = "ID", env = PLATFORM_ENV)]
        platform: Option<String>,
        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
        format: OutputFormat,
    },

    /// List scenario descriptions
    List {
        /// Filter scenarios by a substring of "<group> <scenario>"
        #[arg(short = 'k', value_name = "EXPR")]
        filter: Option<String>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Run {
            verbose,
            stop_on_fail,
            filter,
            platform,
            format,
        } => {
            let config = RunConfig::new()
                .with_platform(platform)
                .with_filter(filter)
                .with_verbose(verbose)
                .with_stop_on_fail(stop_on_fail)
                .with_format(format);
            commands::run_specs(&config)
        }
        Command::List { filter } => commands::list_specs(filter.as_deref()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::try_parse_from(["specrun", "run", "-v", "-x", "-k", "frozen"]).unwrap();
        if let Command::Run {
            verbose,
            stop_on_fail,
            filter,
            format,
            ..
        } = cli.command
        {
            assert!(verbose);
            assert!(stop_on_fail);
            assert_eq!(filter.as_deref(), Some("frozen"));
            assert_eq!(format, OutputFormat::Console);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_platform_and_format() {
        let cli = Cli::try_parse_from([
            "specrun",
            "run",
            "--platform",
            "x86_64-windows",
            "--format",
            "json",
        ])
        .unwrap();
        if let Command::Run { platform, format, .. } = cli.command {
            assert_eq!(platform.as_deref(), Some("x86_64-windows"));
            assert_eq!(format, OutputFormat::Json);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_list() {
        let cli = Cli::try_parse_from(["specrun", "list", "-k", "Etc"]).unwrap();
        assert!(matches!(cli.command, Command::List { filter: Some(_) }));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["specrun", "run", "--format", "tap"]).is_err());
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["specrun"]).is_err());
    }
}
