pub mod fold;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter such as `astfold=debug`.
pub const LOG_ENV: &str = "ASTFOLD_LOG";

/// Install the stderr log subscriber. `ASTFOLD_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    // Only fails if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
