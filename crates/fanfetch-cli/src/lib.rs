//! fanfetch CLI library
//!
//! Argument parsing, commands and output for the `fanfetch` binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use error::CliError;
