use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Pick the filter directive: `--debug` wins, then `RUST_LOG`, then `warn`.
fn build_filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initialize diagnostic logging on stderr.
///
/// Stdout is reserved for the transcript, so the fmt layer never writes there.
pub fn init_tracing(debug: bool) {
    let filter = build_filter(debug);

    // A second init (e.g. from tests) must not abort the process.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
