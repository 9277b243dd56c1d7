//! Library entry points: fold a tree, a source string, a file, or a
//! directory of `.java` files.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::Config;
use crate::driver::{Driver, RunReport, DEFAULT_MAX_SWEEPS};
use crate::error::{Error, RewriteError};
use crate::passes::PassKind;
use crate::syntax::format::format_file;
use crate::tree::{lower, raise, Tree};

/// What `fold_source` and friends write out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Emit {
    /// Reformatted Java source.
    #[default]
    Source,
    /// An S-expression dump of the folded tree.
    Tree,
}

/// Options controlling a fold: which passes run, in which order, and the
/// sweep bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoldOptions {
    pub passes: Vec<PassKind>,
    pub max_sweeps: usize,
    pub emit: Emit,
}

impl Default for FoldOptions {
    fn default() -> Self {
        Self {
            passes: PassKind::ALL.to_vec(),
            max_sweeps: DEFAULT_MAX_SWEEPS,
            emit: Emit::Source,
        }
    }
}

impl FoldOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            passes: config.passes.enabled.clone(),
            max_sweeps: config.driver.max_sweeps,
            emit: Emit::Source,
        }
    }

    fn driver(&self) -> Driver {
        Driver::with_kinds(&self.passes, self.max_sweeps)
    }
}

/// The result of folding one source text.
#[derive(Clone, Debug)]
pub struct FoldOutput {
    pub text: String,
    pub report: RunReport,
}

/// Run the configured passes on `tree` to a fixed point.
pub fn fold_tree(tree: &mut Tree, options: &FoldOptions) -> Result<RunReport, RewriteError> {
    options.driver().run(tree)
}

/// Parse, fold and print a Java source string, keeping its comments.
pub fn fold_source(source: &str, filename: &str, options: &FoldOptions) -> Result<FoldOutput, Error> {
    let (file, comments) =
        crate::parse_with_comments(source).map_err(|diagnostics| Error::Parse {
            path: filename.to_string(),
            source_text: source.to_string(),
            diagnostics,
        })?;

    let mut tree = lower(&file);
    let report = fold_tree(&mut tree, options)?;
    let text = match options.emit {
        Emit::Source => format_file(&raise(&tree)?, &comments),
        Emit::Tree => format!("{}\n", tree.dump(tree.root())),
    };
    debug!(
        "{}: {} sweeps, {} nodes after folding",
        filename,
        report.sweeps,
        tree.len()
    );
    Ok(FoldOutput { text, report })
}

/// Fold the file at `input` and write the result to `output`.
pub fn fold_file(input: &Path, output: &Path, options: &FoldOptions) -> Result<RunReport, Error> {
    let source = std::fs::read_to_string(input).map_err(|e| Error::io(input, e))?;
    let filename = input.to_string_lossy().to_string();
    let folded = fold_source(&source, &filename, options)?;
    std::fs::write(output, &folded.text).map_err(|e| Error::io(output, e))?;
    info!("folded {} -> {}", input.display(), output.display());
    Ok(folded.report)
}

/// Fold every `.java` file under `input` into the same relative path
/// under `output`, in parallel. Returns the reports sorted by input path.
pub fn fold_dir(
    input: &Path,
    output: &Path,
    options: &FoldOptions,
) -> Result<Vec<(PathBuf, RunReport)>, Error> {
    let files = java_files(input)?;
    info!("folding {} files from {}", files.len(), input.display());

    files
        .par_iter()
        .map(|file| {
            let relative = file.strip_prefix(input).unwrap_or(file);
            let target = output.join(relative);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            let report = fold_file(file, &target, options)?;
            Ok((file.clone(), report))
        })
        .collect()
}

/// All `.java` files under `dir`, recursively, sorted. Symlinked
/// directories are not entered.
pub fn java_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(&dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;
            if file_type.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "java") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}
