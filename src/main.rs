use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use mood_rec_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, Cache, Corpus},
    services::{MoodPolicy, RecommendationEngine, TmdbEnricher, Vectorizer},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mood_rec_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let corpus = Corpus::load(&config.corpus_path).context("Failed to load movie corpus")?;
    let engine = RecommendationEngine::build(
        corpus,
        &Vectorizer::new(config.max_features),
        MoodPolicy::default(),
        config.candidate_pool,
    )?;

    let (cache, cache_handle) = match &config.redis_url {
        Some(url) => {
            tracing::info!("Mirroring details cache to Redis");
            Cache::with_redis(
                create_redis_client(url)?,
                Duration::from_secs(config.enrich_timeout_secs),
            )
            .await
        }
        None => Cache::in_memory(),
    };

    let enricher = TmdbEnricher::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.poster_base_url.clone(),
        Duration::from_secs(config.enrich_timeout_secs),
    )?;

    let state = AppState::new(engine, Arc::new(enricher));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_handle.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
