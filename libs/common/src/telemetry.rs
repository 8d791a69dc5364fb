//! Tracing initialisation shared by the client binaries

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// The filter comes from `RUST_LOG`, falling back to `default_directive`.
/// Output goes to stderr so command output on stdout stays parseable.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
