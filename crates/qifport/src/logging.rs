//! Log subscriber setup for the binaries.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `--verbose` nor `RUST_LOG` is given.
const DEFAULT_FILTER: &str = "warn";

/// Install the stderr log subscriber.
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` is honored and the level
/// defaults to `warn`. A second call is a no-op.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
