use std::io;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "AROMATICITY_LOG";

/// Installs the stderr subscriber. `AROMATICITY_LOG` wins over `--log-level`;
/// an unparsable filter falls back to `warn`.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
