use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `TODOMAN_LOG=debug`.
pub const LOG_ENV: &str = "TODOMAN_LOG";

/// Logs go to stderr so stdout stays clean for `--json` consumers.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
