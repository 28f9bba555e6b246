use tracing_subscriber::EnvFilter;

use crate::config;

/// Install the global fmt subscriber. `RUST_LOG` wins over the built-in
/// filter. Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            "{} engine v{} logging initialized",
            config::ENGINE_NAME,
            config::ENGINE_VERSION
        );
    }
}
