//! Diagnostic logging setup.
//!
//! Library code only emits `tracing` events. Binaries embedding the crate call
//! [`init`] once at startup to route those events to stderr.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Builds the filter, preferring `RUST_LOG` over `fallback`.
#[must_use]
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Installs a compact stderr subscriber.
///
/// Returns `false` when a global subscriber was already installed, which
/// happens when tests or embedding applications initialise logging first.
#[must_use]
pub fn init(fallback: &str) -> bool {
    tracing_subscriber::registry()
        .with(env_filter(fallback))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init()
        .is_ok()
}
