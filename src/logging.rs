use tracing_subscriber::{fmt, EnvFilter};

/// Initializes compact log output honoring `RUST_LOG`. Safe to call from
/// every test; repeated initialization in one process is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
