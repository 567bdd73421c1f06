//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Search API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Search API",
        version = "0.1.0",
        description = "AI-powered product catalog search with image analysis",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    nest(
        (path = "/api", api = domain_search::handlers::ApiDoc),
        (path = "/api", api = domain_analysis::handlers::ApiDoc)
    ),
    tags(
        (name = "Search", description = "AI-powered product search"),
        (name = "Analysis", description = "Image analysis and text generation endpoints")
    )
)]
pub struct ApiDoc;
