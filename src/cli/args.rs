//! Command line argument parsing.
//!
//! Directory flags override the config file, which overrides the built-in
//! defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Turn websites into desktop applications
#[derive(Parser, Debug)]
#[command(
    name = "appnera",
    version,
    about = "Turn websites into desktop applications",
    long_about = "Wraps a URL in a self-contained desktop application: a private Python runtime, \
a launcher script and a desktop entry registered with the user's desktop.

Usage:
  appnera create --url https://notion.so --name Notion --icon ./notion.png
  appnera list
  appnera show Notion
  appnera uninstall Notion

Exit code 0 = the command succeeded; 1 = it failed and nothing was left half-built."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (default: ~/.config/appnera/config.toml)
    #[arg(long, global = true, value_name = "PATH", env = "APPNERA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding one subdirectory per installed app
    #[arg(long, global = true, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Shared desktop entry directory
    #[arg(long, global = true, value_name = "DIR")]
    pub applications_dir: Option<PathBuf>,

    /// Shared icon directory
    #[arg(long, global = true, value_name = "DIR")]
    pub icons_dir: Option<PathBuf>,

    /// Directory containing app.py and uninstall.sh
    #[arg(long, global = true, value_name = "DIR", env = "APPNERA_TEMPLATE_DIR")]
    pub template_dir: Option<PathBuf>,

    /// Directory for per-app lock files
    #[arg(long, global = true, value_name = "DIR")]
    pub lock_dir: Option<PathBuf>,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print extra detail
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a new app wrapper
    Create {
        /// Address the app opens (http:// or https://)
        #[arg(short, long)]
        url: String,

        /// Display name; also the app directory name
        #[arg(short, long)]
        name: String,

        /// Icon image copied into the app
        #[arg(short, long, value_name = "PATH")]
        icon: PathBuf,
    },

    /// List installed apps
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show details of one installed app
    Show {
        /// Display name of the app
        name: String,
    },

    /// Remove an app, its desktop entry and its icon
    Uninstall {
        /// Display name of the app
        name: String,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}
