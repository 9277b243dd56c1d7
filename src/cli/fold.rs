use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use astfold::{Config, Emit, Error, FoldOptions, PassKind};

#[derive(Args)]
pub struct FoldArgs {
    /// Input .java file, or a directory of them
    pub input: PathBuf,
    /// Output file, or output directory for a directory input
    pub output: PathBuf,
    /// Pass to run; repeat to run several, in order (default: all)
    #[arg(long = "pass", value_enum, value_name = "NAME")]
    pub passes: Vec<PassKind>,
    /// Sweeps allowed before giving up on a fixed point
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_sweeps: Option<u32>,
    /// Configuration file (default: astfold.toml next to the input or above)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = Emit::Source)]
    pub emit: Emit,
}

pub fn cmd_fold(args: FoldArgs) -> Result<(), Error> {
    let options = resolve_options(&args)?;
    info!(
        "passes: {:?}, max sweeps: {}",
        options.passes, options.max_sweeps
    );

    if args.input.is_dir() {
        let reports = astfold::fold_dir(&args.input, &args.output, &options)?;
        let changed = reports.iter().filter(|(_, r)| r.changed()).count();
        info!("{} files folded, {} changed", reports.len(), changed);
    } else {
        let report = astfold::fold_file(&args.input, &args.output, &options)?;
        info!("{} sweeps, changes: {:?}", report.sweeps, report.changes);
    }
    Ok(())
}

/// Configuration file values, overridden by flags.
fn resolve_options(args: &FoldArgs) -> Result<FoldOptions, Error> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(config_dir(&args.input))?,
    };

    let mut options = FoldOptions::from_config(&config);
    if !args.passes.is_empty() {
        options.passes = args.passes.clone();
    }
    if let Some(n) = args.max_sweeps {
        options.max_sweeps = n as usize;
    }
    options.emit = args.emit;
    Ok(options)
}

/// Where configuration discovery starts for `input`.
fn config_dir(input: &Path) -> &Path {
    if input.is_dir() {
        return input;
    }
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
