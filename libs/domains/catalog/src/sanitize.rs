//! Defensive conversion of stored rows into the public product shape.
//!
//! The catalog accumulates incomplete rows (writers in other services,
//! historical imports), and one bad row must never take down a whole
//! search response. Each row is coerced into [`SanitizedProduct`] with
//! neutral defaults, validated, and dropped with a warning if it still
//! fails. The output preserves input order and never grows.

use tracing::warn;
use validator::Validate;

use crate::models::{CatalogItem, SanitizedProduct, ScoredItem};

/// Substitute name for rows whose stored name is missing or too short.
pub const FALLBACK_NAME: &str = "이름 미정 상품";

/// Category assigned when the stored row carries none.
pub const FALLBACK_CATEGORY: &str = "Etc";

/// Sanitize a batch of retrieval results.
///
/// Infallible: per-row failures are logged and skipped, never
/// propagated. An all-bad batch yields an empty vector.
pub fn sanitize_results(results: &[ScoredItem]) -> Vec<SanitizedProduct> {
    results
        .iter()
        .filter_map(|scored| sanitize_item(&scored.item))
        .collect()
}

/// Coerce a single stored row into the public shape, or drop it.
pub fn sanitize_item(item: &CatalogItem) -> Option<SanitizedProduct> {
    let name = match &item.name {
        Some(n) if n.trim().chars().count() >= 2 => n.clone(),
        _ => FALLBACK_NAME.to_string(),
    };

    let product = SanitizedProduct {
        id: item.id,
        name,
        description: item.description.clone().unwrap_or_default(),
        price: item.price.unwrap_or(0),
        stock_quantity: item.stock_quantity.unwrap_or(0),
        category: item
            .category
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| FALLBACK_CATEGORY.to_string()),
        image_url: item.image_url.clone(),
        embedding: item.embedding.clone(),
        is_active: item.is_active,
        created_at: item.created_at,
        updated_at: item.updated_at,
    };

    match product.validate() {
        Ok(()) => Some(product),
        Err(err) => {
            warn!(product_id = item.id, %err, "skipping invalid product");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(id: i64) -> CatalogItem {
        let now = Utc::now();
        CatalogItem {
            id,
            name: Some("청바지".to_string()),
            description: Some("데님 팬츠".to_string()),
            price: Some(39_000),
            stock_quantity: Some(10),
            category: Some("Fashion".to_string()),
            image_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            embedding: None,
        }
    }

    fn scored(item: CatalogItem) -> ScoredItem {
        ScoredItem {
            item,
            distance: 0.5,
        }
    }

    #[test]
    fn complete_row_passes_through_unchanged() {
        let product = sanitize_item(&item(1)).unwrap();
        assert_eq!(product.name, "청바지");
        assert_eq!(product.price, 39_000);
        assert_eq!(product.category, "Fashion");
    }

    #[test]
    fn missing_name_gets_the_fallback() {
        let mut row = item(1);
        row.name = None;
        assert_eq!(sanitize_item(&row).unwrap().name, FALLBACK_NAME);
    }

    #[test]
    fn short_or_whitespace_name_gets_the_fallback() {
        let mut row = item(1);
        row.name = Some("a".to_string());
        assert_eq!(sanitize_item(&row).unwrap().name, FALLBACK_NAME);

        row.name = Some("   ".to_string());
        assert_eq!(sanitize_item(&row).unwrap().name, FALLBACK_NAME);

        // Two non-ASCII characters count as a valid name.
        row.name = Some("신발".to_string());
        assert_eq!(sanitize_item(&row).unwrap().name, "신발");
    }

    #[test]
    fn nullable_fields_coalesce_to_neutral_defaults() {
        let mut row = item(1);
        row.description = None;
        row.price = None;
        row.stock_quantity = None;
        row.category = None;

        let product = sanitize_item(&row).unwrap();
        assert_eq!(product.description, "");
        assert_eq!(product.price, 0);
        assert_eq!(product.stock_quantity, 0);
        assert_eq!(product.category, FALLBACK_CATEGORY);
    }

    #[test]
    fn irrecoverable_row_is_dropped_not_propagated() {
        let mut bad = item(2);
        bad.price = Some(-100);

        let batch = vec![scored(item(1)), scored(bad), scored(item(3))];
        let products = sanitize_results(&batch);

        let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn output_preserves_input_order() {
        let batch = vec![scored(item(5)), scored(item(2)), scored(item(9))];
        let ids: Vec<i64> = sanitize_results(&batch).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn all_bad_batch_yields_empty_output() {
        let mut bad = item(1);
        bad.stock_quantity = Some(-1);
        assert!(sanitize_results(&[scored(bad)]).is_empty());
    }
}
