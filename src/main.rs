use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reach_predictor_service::{AppConfig, ModelRegistry, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(
        model_path = %config.model_path.display(),
        load_on_startup = config.load_on_startup,
        "loading model artifact"
    );

    let registry = Arc::new(ModelRegistry::initialize(&config).await);
    let router = build_router(registry);

    let listener = TcpListener::bind(config.listen_addr).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "REST server ready");

    axum::serve(listener, router).await?;

    Ok(())
}

/// Development posture: request traces and this crate's own events default to
/// `debug`; `RUST_LOG` overrides the whole filter.
fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let default_directives = format!(
        "info,{}=debug,tower_http=debug,hyper=warn",
        env!("CARGO_CRATE_NAME")
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).compact())
        .init();
}
