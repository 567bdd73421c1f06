//! Catalog read path: vector retrieval over the product store plus
//! defensive sanitization of what comes back.
//!
//! The crate exposes three seams: [`CatalogSearchRepository`] (storage
//! trait, qdrant-backed in production), [`RetrievalEngine`] (relevance
//! threshold, ordering, result cap) and [`sanitize`] (stored row to
//! public product shape).

pub mod error;
pub mod models;
pub mod qdrant;
pub mod repository;
pub mod retrieval;
pub mod sanitize;

pub use error::{CatalogError, CatalogResult};
pub use models::{CatalogItem, ProductCategory, SanitizedProduct, ScoredItem, SearchFilters};
pub use qdrant::{QdrantCatalogRepository, QdrantConfig};
pub use repository::CatalogSearchRepository;
pub use retrieval::{RetrievalConfig, RetrievalEngine};
pub use sanitize::{sanitize_item, sanitize_results};
