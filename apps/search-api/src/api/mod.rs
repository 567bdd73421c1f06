//! API routes module

use std::sync::Arc;

use axum::Router;
use domain_analysis::{AnalysisService, ModelGateway};
use domain_catalog::CatalogSearchRepository;
use domain_search::SearchService;

/// Create all API routes
pub fn routes<G, R>(
    search: Arc<SearchService<G, R>>,
    analysis: Arc<AnalysisService<G>>,
) -> Router
where
    G: ModelGateway + 'static,
    R: CatalogSearchRepository + 'static,
{
    Router::new()
        .merge(domain_search::handlers::router(search))
        .merge(domain_analysis::handlers::router(analysis))
}
