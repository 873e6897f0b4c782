//! Diagnostic log setup.

use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber so stdout stays clean for tables and charts.
///
/// `RUST_LOG` overrides the default `info` level. Calling this twice is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
