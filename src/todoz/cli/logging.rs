use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Level from the command line flags; `RUST_LOG` wins when set.
pub fn log_level(verbose: bool, debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else if verbose {
        Level::INFO
    } else {
        Level::WARN
    }
}

/// Logs go to stderr so stdout stays clean for command output.
pub fn init(verbose: bool, debug: bool) {
    let level = log_level(verbose, debug);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("todoz={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
