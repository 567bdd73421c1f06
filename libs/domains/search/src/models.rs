use domain_analysis::SearchPath;
use domain_catalog::{SanitizedProduct, SearchFilters};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default number of results when the caller does not ask for one.
pub const DEFAULT_LIMIT: usize = 10;

/// A fully parsed search request, ready for the orchestrator.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    /// Raw uploaded image bytes, if the caller attached one.
    pub image: Option<Vec<u8>>,
    pub limit: usize,
    pub filters: SearchFilters,
}

impl SearchRequest {
    pub fn new(query: String) -> Self {
        Self {
            query,
            image: None,
            limit: DEFAULT_LIMIT,
            filters: SearchFilters::default(),
        }
    }
}

/// Search response envelope.
///
/// `status` is always `"SUCCESS"` when this struct is returned at all;
/// an empty product list is a valid success, failures travel as error
/// statuses instead.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub status: String,
    /// Human-readable explanation of the result, from the model service
    pub reason: String,
    pub products: Vec<SanitizedProduct>,
    pub search_path: SearchPath,
}
