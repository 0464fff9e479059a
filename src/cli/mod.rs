//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{BreakpointCommand, ListCommand, LogsCommand, OpenCommand, ShellCommand, ShowCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Inspect Jenkins X pipeline activities
#[derive(Debug, Parser, Clone)]
#[command(name = "activity")]
#[command(version)]
#[command(about = "Inspect pipeline activities, their pods and breakpoints", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print effects instead of executing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// List activities
    List(ListCommand),

    /// Show what can be done with an activity
    Show(ShowCommand),

    /// View the logs of a pipeline step
    Logs(LogsCommand),

    /// Open a shell in a pipeline step
    Shell(ShellCommand),

    /// Open the repository or a link of an activity
    Open(OpenCommand),

    /// Manage breakpoints
    #[command(subcommand)]
    Breakpoint(BreakpointCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
