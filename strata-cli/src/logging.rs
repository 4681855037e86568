//! Logging setup.
//!
//! Progress lines go to stdout through the report sink; tracing carries
//! diagnostics on stderr. The default filter stays at `warn` so normal
//! runs print only the sink output.

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the verbosity flags.
pub const ENV_FILTER: &str = "STRATA_LOG";

/// Installs the global tracing subscriber. `-v` maps to `debug`,
/// `-vv` to `trace`; `STRATA_LOG` takes precedence over both.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env(ENV_FILTER).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
