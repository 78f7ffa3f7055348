use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{build_command, clean_command, launch_command, run_command};

#[derive(Parser, Debug)]
#[command(name = "xcrunner")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Xcrunner {
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand. Anything left unset here is resolved
/// interactively, with prior answers remembered per workspace.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Workspace root to search (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Path to the .xcworkspace or .xcodeproj to build
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// Scheme to build
    #[arg(short, long)]
    pub scheme: Option<String>,

    /// Build configuration (e.g. Debug, Release)
    #[arg(short, long)]
    pub configuration: Option<String>,

    /// Destination id or name to run on
    #[arg(short, long)]
    pub destination: Option<String>,

    /// SDK to build against, passed through to xcodebuild
    #[arg(long)]
    pub sdk: Option<String>,

    /// Build with optimization off
    #[arg(long)]
    pub debug: bool,

    /// Extra xcodebuild arguments after `--`
    #[arg(last = true)]
    pub extra: Vec<String>,
}

/// Flags for the launched process, shared by `run` and `launch`.
#[derive(Args, Debug, Clone, Default)]
pub struct LaunchArgs {
    /// Arguments for the launched app (comma separated or a JSON array)
    #[arg(long)]
    pub args: Option<String>,

    /// Environment for the launched app (KEY=VALUE,... or a JSON object)
    #[arg(long)]
    pub env: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the scheme for the resolved destination
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        args: CommonArgs,

        /// Clean before building
        #[arg(long)]
        clean: bool,
    },
    /// Build, then install and launch on the resolved destination
    #[command(visible_alias = "r")]
    Run {
        #[command(flatten)]
        args: CommonArgs,

        #[command(flatten)]
        launch: LaunchArgs,
    },
    /// Remove build products for the scheme
    Clean {
        #[command(flatten)]
        args: CommonArgs,
    },
    /// Launch the already-installed app without rebuilding
    Launch {
        #[command(flatten)]
        args: CommonArgs,

        #[command(flatten)]
        launch: LaunchArgs,
    },
}

impl Commands {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::Build { args, clean } => build_command(&args, clean),
            Commands::Run { args, launch } => run_command(&args, &launch),
            Commands::Clean { args } => clean_command(&args),
            Commands::Launch { args, launch } => launch_command(&args, &launch),
        }
    }
}
