use std::process;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use tracing::error;

mod cli;

use cli::fold::{cmd_fold, FoldArgs};

#[derive(Parser)]
#[command(
    name = "astfold",
    version,
    about = "Fold nested blocks and propagate constants in Java sources"
)]
struct Cli {
    #[command(flatten)]
    fold: FoldArgs,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // A failed write to stdout/stderr leaves nothing better to report.
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => process::exit(0),
                _ => {
                    // -v was not parsed; log at the default level.
                    cli::init_logging(0);
                    error!("invalid arguments, see `astfold --help`");
                    process::exit(1);
                }
            }
        }
    };

    cli::init_logging(cli.verbose);

    if let Err(e) = cmd_fold(cli.fold) {
        e.render();
        error!("{}", e);
        process::exit(1);
    }
}
