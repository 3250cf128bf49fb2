use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logging goes to stderr; stdout carries only the plugin line.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("check_freenas=warn,freenas_api=warn")),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
