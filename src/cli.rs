use clap::{Parser, Subcommand};
use splitkit_core::{ParseMode, ProgramId};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "splitkit")]
#[command(author, version, about = "Speedrun split file detection and normalization")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect and decode a split file
    Parse {
        /// Split file to parse
        #[arg(required = true)]
        file: PathBuf,

        /// Decode depth: fast, full, or convert (defaults to the config value)
        #[arg(short, long)]
        mode: Option<ParseMode>,

        /// Only try this program's format instead of detecting
        #[arg(short, long)]
        program: Option<ProgramId>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the detected program for each file
    Detect {
        /// Files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List supported programs in detection order
    Programs,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },
}
