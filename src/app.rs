//! Wiring between the command line and the apply engine.

use std::io;
use std::path::PathBuf;

use log::{debug, error, info};

use crate::apply::{ApplyError, ApplyOptions, PatchApplier};
use crate::cancel;
use crate::cli::{Cli, InputFormat};
use crate::features::Features;
use crate::models::{ApplyResult, PatchDocument};
use crate::patch::{self, ParseError};
use crate::utils::{display_path, format_hunk};
use crate::worktree::{DryRun, FsWorkTree, WorkTree};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Invalid patch document: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Apply(#[from] ApplyError),
    #[error("{0}")]
    User(String),
}

/// Applies documents to one working tree.
pub struct App<W: WorkTree> {
    tree: W,
    options: ApplyOptions,
    interrupt: fn() -> bool,
}

impl<W: WorkTree> App<W> {
    pub fn new(tree: W, options: ApplyOptions) -> Self {
        Self {
            tree,
            options,
            interrupt: cancel::is_cancelled,
        }
    }

    pub fn with_interrupt(mut self, check: fn() -> bool) -> Self {
        self.interrupt = check;
        self
    }

    pub fn tree(&self) -> &W {
        &self.tree
    }

    pub fn into_tree(self) -> W {
        self.tree
    }

    pub fn run(&mut self, document: &PatchDocument) -> Result<ApplyResult, AppError> {
        if document.is_empty() {
            info!("Patch contains no file changes");
            return Ok(ApplyResult::default());
        }

        let result = PatchApplier::new(&mut self.tree)
            .with_options(self.options)
            .with_interrupt(self.interrupt)
            .apply(document);

        match result {
            Ok(result) => Ok(result),
            Err(err) => {
                if let Some(hunk) = err.hunk() {
                    debug!("Failing hunk:\n{}", format_hunk(hunk));
                }
                Err(err.into())
            }
        }
    }
}

/// Read the patch named on the command line, or stdin for `-`.
pub fn read_patch(cli: &Cli) -> Result<String, AppError> {
    if cli.reads_stdin() {
        return io::read_to_string(io::stdin()).map_err(|source| AppError::Read {
            path: cli.patch.clone(),
            source,
        });
    }
    std::fs::read_to_string(&cli.patch).map_err(|source| AppError::Read {
        path: cli.patch.clone(),
        source,
    })
}

/// Decode the patch text, inverting it when `reverse` is set.
pub fn load_document(
    text: &str,
    format: InputFormat,
    reverse: bool,
) -> Result<PatchDocument, AppError> {
    let document = match format {
        InputFormat::Diff => patch::parse(text)?,
        InputFormat::Json => serde_json::from_str(text)?,
    };
    debug!("Loaded {} file change(s)", document.len());

    Ok(if reverse {
        document.reversed()
    } else {
        document
    })
}

/// Touched paths, one per line, or as a JSON object.
pub fn render_result(result: &ApplyResult, json: bool) -> Result<String, AppError> {
    if json {
        return Ok(serde_json::to_string_pretty(result)?);
    }
    Ok(result
        .touched_paths()
        .iter()
        .map(|path| display_path(path))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Run one invocation end to end and return what should be printed.
pub fn run(cli: &Cli, features: &Features) -> Result<String, AppError> {
    if !cli.directory.is_dir() {
        return Err(AppError::User(format!(
            "{} is not a directory",
            cli.directory.display()
        )));
    }

    let text = read_patch(cli)?;
    let document = load_document(&text, cli.input, cli.reverse)?;
    let options = ApplyOptions::from(features);
    debug!(
        "Enabled features: {:?}",
        features.enabled_features().collect::<Vec<_>>()
    );
    let tree = FsWorkTree::new(&cli.directory);

    let result = if cli.check {
        let mut app = App::new(DryRun::new(tree), options);
        let result = app.run(&document)?;
        info!(
            "Patch applies cleanly ({} path(s) would change)",
            result.len()
        );
        result
    } else {
        let mut app = App::new(tree, options);
        let result = app.run(&document).inspect_err(|err| {
            if let AppError::Apply(err) = err {
                if err.change_index > 0 {
                    error!(
                        "{} earlier file change(s) were applied before the failure",
                        err.change_index
                    );
                }
            }
        })?;
        info!("Patched {} path(s)", result.len());
        result
    };

    render_result(&result, cli.json)
}
