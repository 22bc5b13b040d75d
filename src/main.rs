use dailys::{load_catalog_state, router, AppState, CompletionStore, Config, FileStore, Session};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();

    let catalog = load_catalog_state(&config.catalog).await;
    let storage = FileStore::new(&config.data_dir);
    info!("completion records in {}", storage.dir().display());
    let completion = CompletionStore::load(storage).await;
    let session = Session::new(completion, config.start_collapsed);
    let state = AppState::new(catalog, config.strategy, session);

    info!("listening on http://{}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
