//! Logging initialization for the crawler binary.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Filter precedence: `RUST_LOG` when set, otherwise the configured level,
/// with `--verbose` forcing debug output for this crate on top of it.
pub fn init_logging(level: &str, verbose: bool) {
    let directives = if verbose {
        format!("{level},emploi_crawler=debug")
    } else {
        level.to_string()
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    // try_init so repeated calls (e.g. from tests) stay harmless.
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
