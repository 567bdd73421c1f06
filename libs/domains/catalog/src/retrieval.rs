//! Threshold-gated vector retrieval.
//!
//! A plain nearest-neighbor scan always returns *something*, even when
//! nothing in the catalog is related to the query. The engine therefore
//! applies a hard relevance cutoff on distance before the result cap,
//! so an irrelevant catalog yields an empty list rather than misleading
//! matches.

use std::sync::Arc;

use tracing::instrument;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{ScoredItem, SearchFilters};
use crate::repository::CatalogSearchRepository;

/// Tuning for the retrieval engine.
///
/// Both values are coupled to the deployed embedding model: the
/// dimension must match its output size and the threshold is calibrated
/// against its distance distribution (L2 over 768-d vectors here).
/// Swapping the embedding model invalidates both; treat them as
/// deployment configuration, not universal constants.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Embedding vector dimension (`EMBEDDING_DIMENSION`, default 768)
    pub dimension: usize,
    /// Maximum L2 distance for an item to count as relevant
    /// (`DISTANCE_THRESHOLD`, default 1.2)
    pub threshold: f32,
}

impl RetrievalConfig {
    pub fn new(dimension: usize, threshold: f32) -> CatalogResult<Self> {
        if dimension == 0 {
            return Err(CatalogError::Config(
                "embedding dimension must be positive".to_string(),
            ));
        }
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(CatalogError::Config(format!(
                "distance threshold must be a positive finite number, got {}",
                threshold
            )));
        }
        Ok(Self {
            dimension,
            threshold,
        })
    }

    pub fn from_env() -> CatalogResult<Self> {
        let dimension = core_config::env_parse_or("EMBEDDING_DIMENSION", 768)
            .map_err(|e| CatalogError::Config(e.to_string()))?;
        let threshold = core_config::env_parse_or("DISTANCE_THRESHOLD", 1.2)
            .map_err(|e| CatalogError::Config(e.to_string()))?;
        Self::new(dimension, threshold)
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            dimension: 768,
            threshold: 1.2,
        }
    }
}

/// Vector retrieval engine over a [`CatalogSearchRepository`].
///
/// Pure read path: eligibility and predicate filters run in the store,
/// then the engine enforces the relevance gate, ascending-distance
/// order and the result cap, in that order. The cap is applied last so
/// relevance filtering never operates on a pre-truncated list.
pub struct RetrievalEngine<R: CatalogSearchRepository> {
    repository: Arc<R>,
    config: RetrievalConfig,
}

impl<R: CatalogSearchRepository> RetrievalEngine<R> {
    pub fn new(repository: Arc<R>, config: RetrievalConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Search the catalog for items relevant to `vector`.
    ///
    /// Returns at most `limit` items with `distance < threshold`,
    /// closest first. Storage failures propagate as
    /// [`CatalogError::Storage`].
    #[instrument(skip(self, vector), fields(threshold = self.config.threshold))]
    pub async fn search(
        &self,
        vector: &[f32],
        limit: usize,
        filters: &SearchFilters,
    ) -> CatalogResult<Vec<ScoredItem>> {
        if vector.len() != self.config.dimension {
            return Err(CatalogError::Validation(format!(
                "query vector has dimension {}, expected {}",
                vector.len(),
                self.config.dimension
            )));
        }

        let mut candidates = self
            .repository
            .nearest(vector, filters, limit as u64)
            .await?;

        let threshold = self.config.threshold;
        candidates.retain(|c| c.distance.is_finite() && c.distance < threshold);
        candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        candidates.truncate(limit);

        tracing::debug!(results = candidates.len(), "vector retrieval complete");
        Ok(candidates)
    }
}

impl<R: CatalogSearchRepository> Clone for RetrievalEngine<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            config: self.config.clone(),
        }
    }
}
