//! fanfetch CLI
//!
//! Main entry point for the `fanfetch` binary.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use fanfetch_cli::{Cli, CliError};
use fanfetch_common_async::{build_runtime, RuntimeConfig};
use fanfetch_common_config::{vars, Environment};
use fanfetch_common_log::{LogConfig, LogLevel};

/// Application exit codes
#[repr(u8)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

fn main() -> ExitCode {
    // .env must be loaded before clap reads FANFETCH_BASE_URL
    let env = Environment::init();

    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli) {
        eprintln!("{e}");
        return e.exit_code();
    }
    if let Err(e) = env {
        let e = CliError::from(e);
        error!("{e}");
        return e.exit_code();
    }

    let runtime = match build_runtime(RuntimeConfig::default()) {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {e}");
            return Exit::GeneralError.into();
        }
    };

    match runtime.block_on(cli.execute()) {
        Ok(()) => Exit::Success.into(),
        Err(e) => {
            error!("{e}");
            if let Some(hint) = e.hint() {
                eprintln!("hint: {hint}");
            }
            e.exit_code()
        }
    }
}

fn init_tracing(cli: &Cli) -> Result<(), CliError> {
    let mut config = LogConfig::from_env();

    // -v and -q pin the level; otherwise RUST_LOG may refine it.
    config = match cli.verbose {
        0 if cli.quiet => config.with_explicit_level(LogLevel::Error),
        0 if Environment::get(vars::FANFETCH_LOG_LEVEL).is_some() => config,
        0 => LogConfig {
            level: LogLevel::Warn,
            ..config
        },
        1 => config.with_explicit_level(LogLevel::Info),
        2 => config.with_explicit_level(LogLevel::Debug),
        _ => config.with_explicit_level(LogLevel::Trace),
    };

    fanfetch_common_log::init(config)?;
    Ok(())
}
