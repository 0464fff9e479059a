//! CLI command definitions

use crate::core::summary::SortBy;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Exported resources the commands read
#[derive(Debug, Args, Clone)]
pub struct ResourceArgs {
    /// Activities exported with `kubectl get pipelineactivities -o yaml`
    #[arg(short, long)]
    pub activities: PathBuf,

    /// Pods exported with `kubectl get pods -o yaml`
    #[arg(short, long)]
    pub pods: Option<PathBuf>,
}

/// Selects one activity by name
#[derive(Debug, Args, Clone)]
pub struct ActivityArgs {
    /// Activity name
    pub name: String,

    #[command(flatten)]
    pub resources: ResourceArgs,
}

/// List activities
#[derive(Debug, Args, Clone)]
pub struct ListCommand {
    #[command(flatten)]
    pub resources: ResourceArgs,

    /// Column to sort by
    #[arg(short, long, value_enum)]
    pub sort: Option<SortByArg>,

    /// Only show activities matching this text
    #[arg(short = 'q', long)]
    pub search: Option<String>,
}

/// Show the menu of an activity
#[derive(Debug, Args, Clone)]
pub struct ShowCommand {
    #[command(flatten)]
    pub activity: ActivityArgs,
}

/// View logs of a step container
#[derive(Debug, Args, Clone)]
pub struct LogsCommand {
    #[command(flatten)]
    pub activity: ActivityArgs,

    /// Container to view, defaults to the latest step
    #[arg(long)]
    pub container: Option<String>,
}

/// Open a shell in the activity pod
#[derive(Debug, Args, Clone)]
pub struct ShellCommand {
    #[command(flatten)]
    pub activity: ActivityArgs,

    /// Container to attach to, defaults to the running step
    #[arg(long)]
    pub container: Option<String>,
}

/// Open the repository or one of the action links
#[derive(Debug, Args, Clone)]
pub struct OpenCommand {
    #[command(flatten)]
    pub activity: ActivityArgs,

    /// Index of the link as listed by `show`; the repository when omitted
    #[arg(short, long)]
    pub link: Option<usize>,
}

/// Breakpoint subcommands
#[derive(Debug, Subcommand, Clone)]
pub enum BreakpointCommand {
    /// Show the breakpoint matching an activity
    Status(ActivityArgs),

    /// Add a breakpoint for an activity's pipeline
    Add(ActivityArgs),

    /// Remove the breakpoint matching an activity
    Remove(ActivityArgs),
}

/// Sort column argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortByArg {
    Owner,
    Repository,
    Branch,
    Status,
    Age,
}

impl From<SortByArg> for SortBy {
    fn from(arg: SortByArg) -> Self {
        match arg {
            SortByArg::Owner => SortBy::Owner,
            SortByArg::Repository => SortBy::Repository,
            SortByArg::Branch => SortBy::Branch,
            SortByArg::Status => SortBy::Status,
            SortByArg::Age => SortBy::Age,
        }
    }
}
