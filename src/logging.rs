//! Diagnostic logging.
//!
//! Engine code logs through `tracing` macros; this module installs the
//! subscriber. Output goes to stderr so stdout stays clean for command
//! results (including `--json`).

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a filter directive, e.g. `agentwire=debug`.
pub const LOG_ENV: &str = "AGENTWIRE_LOG";

/// Filter used when `AGENTWIRE_LOG` is unset.
///
/// No flag only shows warnings; `-v` adds info and `-vv` debug output from
/// this crate; `-vvv` and beyond trace everything.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,agentwire=info",
        2 => "warn,agentwire=debug",
        _ => "trace",
    }
}

fn build_env_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(verbosity: u8) {
    let _ = tracing_subscriber::registry()
        .with(build_env_filter(verbosity))
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
