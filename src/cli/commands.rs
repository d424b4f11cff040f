//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::{self, Write};

use miette::Report;
use tracing::info_span;

use crate::harness::{ConsoleReporter, JsonReporter, Registry, Reporter, drive};
use crate::specs;

use super::config::{ConfigError, OutputFormat, RunConfig};
use super::{CliError, CliResult, ExitCode};

fn config_error(err: ConfigError) -> CliError {
    CliError::with_code(format!("{:?}", Report::new(err)), 2)
}

/// Run the corpus.
///
/// Exit code is 0 when nothing failed or errored, 1 otherwise.
pub fn run_specs(config: &RunConfig) -> CliResult<ExitCode> {
    run_registry(specs::all(), config)
}

/// Run `registry` under `config`. Split out so callers can run their own registries.
pub fn run_registry(registry: Registry, config: &RunConfig) -> CliResult<ExitCode> {
    let platform = config.platform().map_err(config_error)?;
    let options = config.run_options().map_err(config_error)?;
    let _span = info_span!("run", platform = %platform).entered();

    let mut reporter: Box<dyn Reporter> = match config.format {
        OutputFormat::Console => Box::new(ConsoleReporter::stderr(config.verbose)),
        OutputFormat::Json => Box::new(JsonReporter::stdout()),
    };
    let tally = drive(registry.run_with(platform, options), reporter.as_mut())
        .map_err(|e| CliError::failure(format!("Error writing report: {e}")))?;

    if tally.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Print every scenario description, with its guard, one per line.
pub fn list_specs(filter: Option<&str>) -> CliResult<ExitCode> {
    let mut out = io::stdout().lock();
    write_listing(&specs::all(), filter, &mut out)
        .map_err(|e| CliError::failure(format!("Error writing listing: {e}")))?;
    Ok(ExitCode::SUCCESS)
}

pub(crate) fn write_listing(registry: &Registry, filter: Option<&str>, out: &mut dyn Write) -> io::Result<()> {
    for group in registry.groups() {
        for scenario in group.scenarios() {
            let description = format!("{} {}", group.name(), scenario.name());
            if filter.is_some_and(|f| !description.contains(f)) {
                continue;
            }
            match group.guard() {
                Some(guard) => writeln!(out, "{description} [{guard}]")?,
                None => writeln!(out, "{description}")?,
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn listing_marks_guarded_scenarios() {
        let mut out = Vec::new();
        write_listing(&specs::all(), Some("returns nil"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Hash#default_proc returns nil if no block was passed to proc\n\
             Hash#default_proc= returns nil if passed nil\n\
             Etc.getgrgid returns nil [platform_is windows]\n"
        );
    }

    #[test]
    fn malformed_platform_exits_with_usage_code() {
        let config = RunConfig::new().with_platform(Some("windows".to_string()));
        let err = run_specs(&config).unwrap_err();
        assert_eq!(err.exit_code, ExitCode(2));
        assert!(err.message.contains("<arch>-<os>"));
    }

    #[test]
    fn hash_corpus_passes_on_any_platform() {
        let config = RunConfig::new()
            .with_platform(Some("x86_64-windows".to_string()))
            .with_filter(Some("Hash#".to_string()))
            .with_format(OutputFormat::Json);
        assert_eq!(run_specs(&config).unwrap(), ExitCode::SUCCESS);
    }
}
