mod types_observation;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use obsmon::monitor::ArtifactKind;

pub use types_observation::{CommentCommands, UnitArgs};

#[derive(Parser)]
#[command(name = "obsmon")]
#[command(about = "Processing status of a multi-stage reduction pipeline, per observing night")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to $OBSMON_CONFIG, then the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Debug-level logging unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Status rows for one night, or one unit of it
    Status {
        #[command(flatten)]
        unit: UnitArgs,

        /// Print rows as JSON
        #[arg(long)]
        json: bool,

        /// Rebuild even if a fresh cache entry exists
        #[arg(long)]
        no_cache: bool,
    },

    /// Show resolved artifact paths for one unit
    Paths {
        #[command(flatten)]
        unit: UnitArgs,
    },

    /// Print one artifact of a unit
    Show {
        #[command(flatten)]
        unit: UnitArgs,

        /// Artifact to print
        #[arg(short, long, value_enum, default_value_t = ArtifactKind::Log)]
        kind: ArtifactKind,
    },

    /// List image files produced for one unit
    Images {
        #[command(flatten)]
        unit: UnitArgs,
    },

    /// Read or append unit comments
    Comment {
        #[command(subcommand)]
        command: CommentCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
