use lottery_core::AuthorityTierResolver;
use lottery_server::{
    router, AppState, LotteryConfig, LotteryService, NonceStore, Store, TracingExecutor,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::var("LOTTERY_CONFIG").unwrap_or_else(|_| "lottery.toml".to_string());
    let mut config = LotteryConfig::load(&config_path)?;
    config.apply_env();

    let store = Store::open(&config.storage).await?;
    let start_nonce = store.load_nonce().await?;
    let rng = config.rng.build(start_nonce);
    let service = LotteryService::new(
        store,
        config.rules(),
        Arc::new(AuthorityTierResolver::new(config.authority())),
        Arc::new(TracingExecutor),
        rng,
        config.storage.timeout(),
    );

    let state = Arc::new(AppState {
        service,
        api_key: std::env::var("API_KEY").unwrap_or_else(|_| "dev-key".into()),
    });
    let app = router(state.clone());

    let addr = std::env::var("BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.service.store().close().await;
    info!("storage closed");
    Ok(())
}
