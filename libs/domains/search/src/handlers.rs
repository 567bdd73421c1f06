//! HTTP handler for the unified search endpoint

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};
use axum_helpers::{AppError, ErrorResponse};
use domain_analysis::ModelGateway;
use domain_catalog::{CatalogSearchRepository, SanitizedProduct, SearchFilters};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::SearchError;
use crate::models::{DEFAULT_LIMIT, SearchRequest, SearchResponse};
use crate::service::SearchService;

/// OpenAPI documentation for the search endpoint
#[derive(OpenApi)]
#[openapi(
    paths(search),
    components(schemas(SearchResponse, SanitizedProduct, ErrorResponse)),
    tags(
        (name = "Search", description = "AI-powered product search")
    )
)]
pub struct ApiDoc;

/// Create the search router
pub fn router<G, R>(service: Arc<SearchService<G, R>>) -> Router
where
    G: ModelGateway + 'static,
    R: CatalogSearchRepository + 'static,
{
    Router::new()
        .route("/search", post(search))
        .with_state(service)
}

/// Unified AI product search
///
/// Multipart form: `query` (required), `image` (optional file),
/// `limit` (default 10), `min_price`, `max_price`, `exclude_ids` and
/// `exclude_categories` (comma-separated lists).
#[utoipa::path(
    post,
    path = "/search",
    tag = "Search",
    responses(
        (status = 200, description = "Search results (possibly empty)", body = SearchResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 502, description = "Model service failure", body = ErrorResponse),
        (status = 503, description = "Model service unreachable", body = ErrorResponse)
    )
)]
async fn search<G, R>(
    State(service): State<Arc<SearchService<G, R>>>,
    multipart: Multipart,
) -> Result<Json<SearchResponse>, AppError>
where
    G: ModelGateway + 'static,
    R: CatalogSearchRepository + 'static,
{
    let request = parse_request(multipart).await?;
    let response = service.search(request).await?;
    Ok(Json(response))
}

async fn parse_request(mut multipart: Multipart) -> Result<SearchRequest, AppError> {
    let mut query: Option<String> = None;
    let mut image: Option<Vec<u8>> = None;
    let mut limit = DEFAULT_LIMIT;
    let mut filters = SearchFilters::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidMultipart(format!("Invalid multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "query" => query = Some(text_field(field, &name).await?),
            "image" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| SearchError::BadImage(e.to_string()))?;
                if !bytes.is_empty() {
                    image = Some(bytes.to_vec());
                }
            }
            "limit" => limit = parse_field(&text_field(field, &name).await?, "limit")?,
            "min_price" => {
                filters.min_price = Some(parse_field(&text_field(field, &name).await?, "min_price")?)
            }
            "max_price" => {
                filters.max_price = Some(parse_field(&text_field(field, &name).await?, "max_price")?)
            }
            "exclude_ids" => {
                filters.exclude_ids = parse_csv(&text_field(field, &name).await?, "exclude_ids")?
            }
            "exclude_categories" => {
                filters.exclude_categories = text_field(field, &name)
                    .await?
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            _ => {}
        }
    }

    let query = query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing required 'query' field".to_string()))?;

    Ok(SearchRequest {
        query,
        image,
        limit,
        filters,
    })
}

async fn text_field(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidMultipart(format!("Failed to read field '{}': {}", name, e)))
}

fn parse_field<T>(raw: &str, name: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
{
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid value for '{}': {}", name, raw)))
}

fn parse_csv(raw: &str, name: &str) -> Result<Vec<i64>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_field(s, name))
        .collect()
}
