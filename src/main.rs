use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use wardrobe_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_pool, create_redis_client, Cache},
    knowledge::KnowledgeBase,
    services::{
        providers::OpenWeatherProvider, recommendations::RecommendationService,
        wardrobe::PgWardrobeStore,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wardrobe_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let knowledge = Arc::new(KnowledgeBase::load(config.knowledge_base_dir.as_deref())?);

    let db_pool = create_pool(&config.database_url).await?;
    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    let weather = OpenWeatherProvider::new(
        cache,
        config.weather_api_key.clone(),
        config.weather_api_url.clone(),
    );

    let recommendations = RecommendationService::new(
        knowledge,
        Arc::new(PgWardrobeStore::new(db_pool)),
        Arc::new(weather),
        config.image_base_url.clone(),
        config.worker_pool_size,
    );

    let app = create_router(AppState::new(recommendations));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Shutdown signal received"),
                Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
            }
        })
        .await?;

    cache_writer.shutdown().await;

    Ok(())
}
