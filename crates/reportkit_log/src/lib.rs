//! `reportkit_log` v1:
//! `tracing` subscriber bootstrap for binaries and test suites.
//!
//! The render kernels only emit events; installing a subscriber is left to
//! whoever embeds them.
use tracing_subscriber::EnvFilter;

/// Directive used when neither `RUST_LOG` nor the caller provides one.
pub const C_DIRECTIVE_DEFAULT: &str = "info";

/// Build the filter: `RUST_LOG` wins over `default_directive`.
pub fn derive_env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install a global `fmt` subscriber.
///
/// Returns `false` when a global subscriber was already set; later calls are
/// no-ops.
pub fn init_tracing(default_directive: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(derive_env_filter(default_directive))
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Subscriber for tests: captured by the test harness, debug level.
pub fn init_test_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(derive_env_filter("debug"))
        .with_test_writer()
        .try_init()
        .is_ok()
}
