//! Platform override through the environment.
//!
//! Kept in its own test binary with a single test: the process environment is shared by every test in a binary.

use clap::Parser;
use specrun::cli::config::PLATFORM_ENV;
use specrun::cli::{Cli, Command};

fn parsed_platform(args: &[&str]) -> Option<String> {
    match Cli::try_parse_from(args).map(|cli| cli.command) {
        Ok(Command::Run { platform, .. }) => platform,
        other => panic!("expected Run command, got {other:?}"),
    }
}

#[test]
fn env_fills_platform_and_flag_wins() {
    // SAFETY: this is the only test in the binary, so no other thread reads the environment concurrently.
    unsafe { std::env::set_var(PLATFORM_ENV, "aarch64-windows") };

    assert_eq!(parsed_platform(&["specrun", "run"]).as_deref(), Some("aarch64-windows"));
    assert_eq!(
        parsed_platform(&["specrun", "run", "--platform", "x86_64-linux"]).as_deref(),
        Some("x86_64-linux")
    );

    // SAFETY: as above.
    unsafe { std::env::remove_var(PLATFORM_ENV) };
    assert_eq!(parsed_platform(&["specrun", "run"]), None);
}
