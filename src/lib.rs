pub mod case;
pub mod config;
pub mod review;
pub mod session;

use tracing_subscriber::EnvFilter;

/// Initialize tracing from the environment, falling back to the default filter.
///
/// Call once from the host process (the UI shell or a test harness); the
/// library itself only emits events and never installs a subscriber.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Radscore core v{}", config::APP_VERSION);
}
