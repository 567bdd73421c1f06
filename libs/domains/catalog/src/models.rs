use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

/// Canonical product categories.
///
/// The stored category is an open string (the model collaborator may
/// emit anything); this enum covers the values the catalog UI and the
/// vision prompt know about.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, ToSchema,
)]
pub enum ProductCategory {
    Fashion,
    Food,
    Electronics,
    Automobile,
    Etc,
    #[default]
    Uncategorized,
}

/// A persisted product record as read back from the catalog store.
///
/// Descriptive fields are nullable on purpose: catalog writes happen in
/// other services and historical rows can be incomplete. The read path
/// never trusts them; see [`crate::sanitize`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogItem {
    /// Opaque numeric identity, unique and immutable
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Non-negative, currency-agnostic units
    pub price: Option<i64>,
    pub stock_quantity: Option<i64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; a set value excludes the row from retrieval
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// 768-d embedding; rows without one are unsearchable by vector
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

/// A catalog item paired with its distance from the query vector.
#[derive(Debug, Clone)]
pub struct ScoredItem {
    pub item: CatalogItem,
    /// L2 distance in embedding space, lower is closer
    pub distance: f32,
}

/// Optional conjunctive predicates for vector search.
///
/// An unset field means "no constraint", never "match nothing".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub exclude_ids: Vec<i64>,
    pub exclude_categories: Vec<String>,
}

impl SearchFilters {
    pub fn is_unconstrained(&self) -> bool {
        self.min_price.is_none()
            && self.max_price.is_none()
            && self.exclude_ids.is_empty()
            && self.exclude_categories.is_empty()
    }
}

/// Public projection of a [`CatalogItem`].
///
/// Every instance that leaves the service satisfies the validator
/// rules below; items that cannot be coerced into this shape are
/// dropped during sanitization, never surfaced as partial records.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SanitizedProduct {
    pub id: i64,
    #[validate(length(min = 2))]
    pub name: String,
    pub description: String,
    #[validate(range(min = 0))]
    pub price: i64,
    #[validate(range(min = 0))]
    pub stock_quantity: i64,
    #[validate(length(min = 1))]
    pub category: String,
    pub image_url: Option<String>,
    pub embedding: Option<Vec<f32>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
