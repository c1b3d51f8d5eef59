//! Unit selection and comment CLI types

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use obsmon::commands::UnitSelector;
use obsmon::validation::clap_segment_validator;

#[derive(Args, Debug, Clone)]
pub struct UnitArgs {
    /// Observing night (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: NaiveDate,

    /// Use the masterframe (calibration) layout
    #[arg(short, long)]
    pub masterframe: bool,

    /// Target object (science layout)
    #[arg(short, long, value_parser = clap_segment_validator)]
    pub object: Option<String>,

    /// Filter name (science layout)
    #[arg(short, long, value_parser = clap_segment_validator)]
    pub filter: Option<String>,

    /// Telescope unit (masterframe layout)
    #[arg(short, long, value_parser = clap_segment_validator)]
    pub unit: Option<String>,
}

impl From<UnitArgs> for UnitSelector {
    fn from(args: UnitArgs) -> Self {
        UnitSelector {
            date: args.date,
            masterframe: args.masterframe,
            object: args.object,
            filter: args.filter,
            unit: args.unit,
        }
    }
}

#[derive(Subcommand)]
pub enum CommentCommands {
    /// Append a comment to a unit's comment log
    Add {
        #[command(flatten)]
        unit: UnitArgs,

        /// Comment author
        #[arg(short, long)]
        author: String,

        /// Comment text
        #[arg(short, long)]
        text: String,
    },

    /// List a unit's comments in the order they were written
    List {
        #[command(flatten)]
        unit: UnitArgs,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
}
