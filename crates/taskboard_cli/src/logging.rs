use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "TASKBOARD_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

/// Quiet by default; `TASKBOARD_LOG=debug` (or any env-filter directive)
/// turns on the command and controller traces. Logs go to stderr so they
/// never mix with the board output.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .try_init();
}
