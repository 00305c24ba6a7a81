use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use log::LevelFilter;

use crate::features::Feature;

/// Command line interface definition for tree-patch.
#[derive(Parser, Debug)]
#[command(name = "tree-patch")]
#[command(about = "Apply a unified diff to a working tree, checking every hunk against the files")]
#[command(version)]
pub struct Cli {
    /// Patch file to apply, or `-` to read it from stdin
    #[arg(value_name = "PATCH")]
    pub patch: PathBuf,

    /// Working tree to apply the patch in
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub directory: PathBuf,

    /// Check that the patch applies without writing anything
    #[arg(long)]
    pub check: bool,

    /// Apply the patch in reverse (undo it)
    #[arg(short = 'R', long)]
    pub reverse: bool,

    /// Format of the patch input
    #[arg(long, value_enum, default_value = "diff")]
    pub input: InputFormat,

    /// Print the touched paths as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable optional features (comma-separated)
    /// Examples: rename-hunks, copy-hunks
    #[arg(long, value_enum, value_delimiter = ',')]
    pub features: Option<Vec<Feature>>,

    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long = "verbose", action = ArgAction::Count)]
    pub verbosity: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Log level selected by `-v`/`-q`.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else {
            match self.verbosity {
                0 => LevelFilter::Info,
                1 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        }
    }

    /// True when the patch is read from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.patch.as_os_str() == "-"
    }
}

/// How the patch input is encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Unified diff text, as produced by `git diff`
    Diff,
    /// A serialized patch document
    Json,
}
