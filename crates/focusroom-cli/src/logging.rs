use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter, e.g. `FOCUSROOM_LOG=debug`.
pub const LOG_ENV: &str = "FOCUSROOM_LOG";

/// Initialise the global `tracing` subscriber.
///
/// Logs go to stderr so stdout stays machine-readable. Defaults to `warn`
/// when the variable is unset or unparsable.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter).with(layer).init();
}
