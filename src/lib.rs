pub mod api;
pub mod config;
pub mod datasets;
pub mod engine;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;

/// Installs the global tracing subscriber, honouring `RUST_LOG` when set
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}
