//! Tracing subscriber setup.
//!
//! Everything is written to stderr; stdout belongs to the timer display.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the subscriber at `info`. `RUST_LOG` wins when set.
pub fn init() {
    init_with_level("info")
}

/// Install the subscriber with `default_level` as the filter used when
/// `RUST_LOG` is unset. Panics if a global subscriber is already installed.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Route debug output through the test harness. Safe to call per test.
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
