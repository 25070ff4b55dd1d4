//! Structured logging setup. Installed once at process startup.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a `tracing-subscriber` `fmt` layer driven by `RUST_LOG`,
/// defaulting to `info` when unset.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}
