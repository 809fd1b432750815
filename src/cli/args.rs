//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Question-tree content transformer: render flat question trees as hierarchies
#[derive(Parser, Debug)]
#[command(name = "qtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Content directory with <id>.json documents (overrides config)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub content_dir: Option<PathBuf>,

    /// Additional config file
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a question tree
    Show {
        /// Content id (file stem in the content directory)
        id: String,
        /// Include intent, expected signal and metadata
        #[arg(long)]
        details: bool,
    },

    /// Print a question tree as JSON
    Json {
        /// Content id (file stem in the content directory)
        id: String,
        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// List content ids
    List,

    /// Transform every document and report problems
    Check {
        /// Also list dropped items of documents that transform
        #[arg(short, long)]
        verbose: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show global config file location
    Path,
}
