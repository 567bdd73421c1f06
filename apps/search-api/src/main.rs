//! Search API - AI-powered catalog search server

use std::sync::Arc;
use std::time::Duration;

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_analysis::{AnalysisService, HttpModelGateway};
use domain_catalog::QdrantCatalogRepository;
use domain_catalog::retrieval::RetrievalEngine;
use domain_search::SearchService;
use tracing::info;

mod api;
mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to Qdrant at {}", config.qdrant.url);

    let repository = Arc::new(QdrantCatalogRepository::new(config.qdrant.clone())?);
    repository
        .ensure_collection(config.retrieval.dimension)
        .await?;

    info!(
        "Product collection '{}' ready (dimension {})",
        config.qdrant.collection, config.retrieval.dimension
    );

    let gateway = Arc::new(HttpModelGateway::new(config.model.clone())?);

    let engine = RetrievalEngine::new(Arc::clone(&repository), config.retrieval.clone());
    let search_service = Arc::new(SearchService::new(Arc::clone(&gateway), engine));
    let analysis_service = Arc::new(AnalysisService::new(
        gateway,
        config.retrieval.dimension,
    ));

    let api_routes = api::routes(search_service, analysis_service);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router.merge(health_router(config.app.clone()));

    info!(
        "Starting Search API on port {} (model service at {})",
        config.server.port, config.model.base_url
    );

    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        info!("Shutting down: search API cleanup complete");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Search API shutdown complete");
    Ok(())
}
