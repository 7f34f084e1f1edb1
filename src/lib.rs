//! Core library for the `pagewright` CLI.
//!
//! Pulls issue data from a tracker, renders it into storage-format tables,
//! substitutes the result into a wiki template page, and publishes the
//! generated page. Three external boundaries (content service, issue
//! tracker, build server) are modeled as ports with live HTTP adapters.

pub mod adapters;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod ports;
pub mod report;
pub mod template;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution
/// fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command).map_err(|err| err.to_string())
}
