//! FamilyTree command-line editor
//!
//! Thin front end over `familytree-core`: every subcommand opens a session on
//! the file-backed store, performs one operation and closes the session.
//!
//! # Usage
//!
//! ```bash
//! familytree sample
//! familytree show
//! familytree add <PARENT_ID> --name "Ada" --birth 1815 --gender female
//! familytree update <ID> death 1852
//! familytree layout --json
//! familytree export --output family.json
//! ```
//!
//! # Data Directory
//!
//! Uses `--data-dir`, else `FAMILYTREE_DATA_DIR`, else `~/.familytree/data`.

mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use familytree_core::{Gender, PersonField, SpacingProfile};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

const DEFAULT_LOG_FILTER: &str = "familytree=info,familytree_core=info";
const VERBOSE_LOG_FILTER: &str = "familytree=debug,familytree_core=debug";

#[derive(Parser, Debug)]
#[command(
    name = "familytree",
    version,
    about = "Edit a family tree stored on disk",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Data directory (default: $FAMILYTREE_DATA_DIR or ~/.familytree/data).
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Debug logging.
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the tree.
    Show {
        /// Print the stored JSON instead of the outline.
        #[arg(long)]
        json: bool,
    },

    /// Add a child under a parent.
    Add(AddArgs),

    /// Add several children (by name) under a parent in one write.
    AddMany {
        parent_id: String,
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Set one field of a person.
    Update {
        id: String,
        /// name, birth, death, gender, image, notes or relationship
        field: PersonField,
        value: String,
    },

    /// Delete a person and everything below them (the root resets the tree).
    #[command(alias = "rm")]
    Delete {
        id: String,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },

    /// Find people by name, date or notes.
    Search { query: String },

    /// Show tree statistics.
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Compute card positions for the current spacing profile.
    Layout {
        #[arg(long)]
        json: bool,
    },

    /// Write the tree as pretty-printed JSON.
    Export {
        /// Output file (default: family_tree_<date>.json).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace the tree with the contents of a JSON file.
    Import { path: PathBuf },

    /// Replace the tree with a single default root.
    Reset {
        #[arg(long)]
        yes: bool,
    },

    /// Add an example family under the root.
    Sample,

    /// Show or set the spacing profile.
    Profile { profile: Option<SpacingProfile> },

    /// Show or set the background style.
    Background { value: Option<String> },
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    pub parent_id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub birth: Option<String>,

    #[arg(long)]
    pub death: Option<String>,

    /// male or female
    #[arg(long)]
    pub gender: Option<Gender>,

    #[arg(long)]
    pub image: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long)]
    pub relationship: Option<String>,
}

fn init_logging(verbose: u8) {
    let default_filter = if verbose > 0 {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::resolve(cli.data_dir)?;
    tracing::debug!("Using data directory {}", config.data_dir.display());

    commands::run(&config, cli.command)
}
