//! CLI parse: clap types for assetgraph. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// assetgraph CLI - generate install assets from their dependency graph
#[derive(Parser)]
#[command(name = "assetgraph")]
#[command(about = "Generate install assets from their dependency graph")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Working directory; holds assetgraph.toml and, by default, the output
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a target and write its files to the output dir
    Create {
        /// Target name (install-config, manifests)
        target: String,
    },
    /// Show the dependency tree of a target
    Graph {
        /// Target name (install-config, manifests)
        target: String,
    },
    /// Compare recorded files with what is on disk
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
