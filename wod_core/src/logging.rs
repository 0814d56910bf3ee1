//! Tracing setup for the `wod` binary.
//!
//! The parsing engine only emits `debug`/`trace` events (descriptor
//! detection, decoded lines, dictionary fallbacks). They stay hidden unless
//! the binary runs with `--verbose` or `RUST_LOG` asks for them. Everything
//! goes to stderr; stdout carries parse output only.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when nothing else is asked for
pub const QUIET_FILTER: &str = "warn";

/// Filter for `--verbose`: engine diagnostics, other crates stay quiet
pub const VERBOSE_FILTER: &str = "warn,wod_core=debug,wod=debug";

/// Install the stderr subscriber
///
/// `RUST_LOG` wins over `verbose` when set. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let default_filter = if verbose { VERBOSE_FILTER } else { QUIET_FILTER };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Route engine diagnostics into the test harness output
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("wod_core=trace"))
        .try_init();
}
