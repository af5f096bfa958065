use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "boostkit",
    version,
    about = "Install and clean up the Boost agent integration layer"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Project root containing composer.json and boost.json"
    )]
    pub project_dir: PathBuf,
    #[arg(long, global = true, help = "Settings file (default: <project>/boostkit.toml)")]
    pub config: Option<PathBuf>,
    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Script {
        #[command(subcommand)]
        command: ScriptCommands,
    },
    /// Package-manager uninstall hook: strips the injected command, never fails the host.
    Uninstall {
        #[arg(long)]
        package: Option<String>,
    },
    /// Install the selection, then remove artifacts the previous run left behind.
    Sync {
        #[command(flatten)]
        selection: Selection,
    },
    /// Show what `sync` would remove for this selection.
    Stale {
        #[command(flatten)]
        selection: Selection,
    },
    Targets,
}

#[derive(Subcommand, Debug)]
pub enum ScriptCommands {
    Prune {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        hook: Option<String>,
    },
    Add {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        hook: Option<String>,
        #[arg(long)]
        command: Option<String>,
    },
    Check {
        command: String,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct Selection {
    #[arg(long = "agent", value_enum)]
    pub agents: Vec<AgentTarget>,
    #[arg(long = "skill")]
    pub skills: Vec<String>,
    #[arg(long = "package")]
    pub packages: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AgentTarget {
    Claude,
    Codex,
    Cursor,
    Gemini,
}
