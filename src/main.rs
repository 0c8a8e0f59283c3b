use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_rec_api::{
    config::Config,
    create_router,
    db::{Catalog, SessionStore},
    services::{http::RetryingClient, providers::TmdbProvider, MetadataFetcher},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_rec_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = Catalog::load(&config.data_dir)
        .with_context(|| format!("Failed to load catalog from {}", config.data_dir.display()))?;

    let client = RetryingClient::new(
        config.retry_policy(),
        config.connect_timeout(),
        config.request_timeout(),
    )?;
    let provider = TmdbProvider::new(
        client,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_url.clone(),
    );

    let state = Arc::new(AppState::with_sessions(
        catalog,
        MetadataFetcher::new(Arc::new(provider)),
        SessionStore::with_idle_ttl(config.session_idle_ttl()),
    ));
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
