use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::models::{ScoredItem, SearchFilters};

/// Repository trait for nearest-neighbor catalog lookups.
///
/// Implementations own the structural eligibility filters: returned
/// items must satisfy `deleted_at IS NULL AND is_active AND embedding
/// IS NOT NULL` in addition to the caller's predicates. The relevance
/// threshold is NOT applied here; the retrieval engine owns that gate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSearchRepository: Send + Sync {
    /// Fetch up to `limit` eligible items ordered by ascending distance
    /// from `vector`, with each item's distance attached.
    ///
    /// Infrastructure failures must surface as errors, never as an
    /// empty result (an empty Ok means "nothing matched").
    async fn nearest(
        &self,
        vector: &[f32],
        filters: &SearchFilters,
        limit: u64,
    ) -> CatalogResult<Vec<ScoredItem>>;
}
