//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `pagewright`.
#[derive(Debug, Parser)]
#[command(name = "pagewright", version, about = "Generate and publish status-report pages")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Credential and options files for the two authenticated services.
#[derive(Debug, Args)]
pub struct AuthArgs {
    /// Tracker credentials file (`{"oauth": {...}, "keyCertFile": "..."}`).
    #[arg(long, default_value = "./trackerAuth.json")]
    pub tracker_auth: PathBuf,
    /// Tracker options file (`{"options": {"server": ..., "verify": ...}}`).
    #[arg(long, default_value = "./trackerOptions.json")]
    pub tracker_options: PathBuf,
    /// Wiki credentials file, same shape as the tracker one.
    #[arg(long, default_value = "./wikiAuth.json")]
    pub wiki_auth: PathBuf,
    /// Wiki options file (`{"options": {"server": ..., "spacekey": ...}}`).
    #[arg(long, default_value = "./wikiOptions.json")]
    pub wiki_options: PathBuf,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a design review page for a release.
    DesignReview {
        /// Run-input JSON file with page ids and template variables.
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        auth: AuthArgs,
    },
    /// Create a sprint velocity dashboard page.
    Velocity {
        /// Run-input JSON file with page ids and template variables.
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        auth: AuthArgs,
    },
    /// Write a starter run-input JSON file.
    MakeInput {
        /// Where to write the file.
        #[arg(long, default_value = "./run-input.json")]
        output: PathBuf,
    },
    /// Print build status from the build server.
    BuildStatus {
        /// Build server base URL.
        #[arg(long)]
        server: String,
        /// Show the latest build of this build configuration.
        #[arg(long)]
        build_type: Option<String>,
        /// Show the latest builds of every configuration in this project.
        #[arg(long)]
        project: Option<String>,
    },
}
