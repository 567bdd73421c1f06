use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    self, Condition, CreateCollectionBuilder, Distance, Filter, PointId, Range,
    SearchPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use tracing::info;

use super::QdrantConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{CatalogItem, ScoredItem, SearchFilters};
use crate::repository::CatalogSearchRepository;

/// Qdrant-backed implementation of [`CatalogSearchRepository`].
///
/// Product records live as point payloads in a single collection keyed
/// by numeric product id, with the 768-d embedding as the point vector.
/// The collection uses Euclid distance, so the score qdrant returns IS
/// the L2 distance (lower is closer) and results arrive pre-sorted
/// ascending.
pub struct QdrantCatalogRepository {
    client: Qdrant,
    collection: String,
}

impl QdrantCatalogRepository {
    pub fn new(config: QdrantConfig) -> CatalogResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = config.api_key {
            builder = builder.api_key(api_key);
        }

        builder = builder.timeout(Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| CatalogError::Storage(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            collection: config.collection,
        })
    }

    pub fn from_client(client: Qdrant, collection: String) -> Self {
        Self { client, collection }
    }

    /// Create the product collection if it does not exist yet.
    ///
    /// An existing collection must store vectors of the configured
    /// dimension; a mismatch fails startup instead of surfacing as an
    /// opaque search error on the first query. Euclid distance is
    /// load-bearing here: the retrieval threshold is calibrated against
    /// raw L2 distances, not cosine similarity.
    pub async fn ensure_collection(&self, dimension: usize) -> CatalogResult<()> {
        if self.client.collection_exists(&self.collection).await? {
            let info = self.client.collection_info(&self.collection).await?;
            return match info.result.as_ref().and_then(collection_dimension) {
                Some(size) if size == dimension as u64 => Ok(()),
                Some(size) => Err(CatalogError::Config(format!(
                    "Collection '{}' stores {}-d vectors, configured dimension is {}",
                    self.collection, size, dimension
                ))),
                None => Err(CatalogError::Config(format!(
                    "Collection '{}' has no readable vector params",
                    self.collection
                ))),
            };
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection).vectors_config(
                    VectorParamsBuilder::new(dimension as u64, Distance::Euclid),
                ),
            )
            .await?;

        info!(collection = %self.collection, dimension, "created product collection");
        Ok(())
    }

    /// Eligibility plus caller predicates as a single conjunctive filter.
    ///
    /// Rows without an embedding have no point at all, so that leg of
    /// eligibility is structural and needs no condition.
    fn build_filter(filters: &SearchFilters) -> Filter {
        let mut must: Vec<Condition> = vec![
            Condition::matches("is_active", true),
            Condition::is_empty("deleted_at"),
        ];

        if filters.min_price.is_some() || filters.max_price.is_some() {
            must.push(Condition::range(
                "price",
                Range {
                    gte: filters.min_price.map(|p| p as f64),
                    lte: filters.max_price.map(|p| p as f64),
                    ..Default::default()
                },
            ));
        }

        let mut must_not: Vec<Condition> = Vec::new();
        if !filters.exclude_ids.is_empty() {
            must_not.push(Condition::matches("id", filters.exclude_ids.clone()));
        }
        if !filters.exclude_categories.is_empty() {
            must_not.push(Condition::matches(
                "category",
                filters.exclude_categories.clone(),
            ));
        }

        Filter {
            must,
            must_not,
            ..Default::default()
        }
    }

    fn point_to_item(point: qdrant::ScoredPoint) -> CatalogResult<ScoredItem> {
        let id = point
            .id
            .as_ref()
            .and_then(point_id_to_i64)
            .ok_or_else(|| CatalogError::Internal("Missing numeric point ID".to_string()))?;

        let distance = point.score;
        let vector = extract_vector_from_output(&point.vectors);

        let mut map = match payload_to_json(point.payload) {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        map.insert("id".to_string(), serde_json::Value::from(id));
        if let Some(values) = vector {
            map.insert(
                "embedding".to_string(),
                serde_json::to_value(values).unwrap_or(serde_json::Value::Null),
            );
        }

        let item: CatalogItem = serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| CatalogError::Internal(format!("Malformed payload for id {}: {}", id, e)))?;

        Ok(ScoredItem { item, distance })
    }
}

#[async_trait]
impl CatalogSearchRepository for QdrantCatalogRepository {
    async fn nearest(
        &self,
        vector: &[f32],
        filters: &SearchFilters,
        limit: u64,
    ) -> CatalogResult<Vec<ScoredItem>> {
        let builder = SearchPointsBuilder::new(&self.collection, vector.to_vec(), limit)
            .filter(Self::build_filter(filters))
            .with_payload(true)
            .with_vectors(true);

        let results = self.client.search_points(builder).await?;

        results
            .result
            .into_iter()
            .map(Self::point_to_item)
            .collect()
    }
}

/// Vector size of an existing collection, whichever config shape
/// (single or named vectors) it was created with.
fn collection_dimension(info: &qdrant::CollectionInfo) -> Option<u64> {
    use qdrant::vectors_config::Config;

    let vectors = info
        .config
        .as_ref()?
        .params
        .as_ref()?
        .vectors_config
        .as_ref()?;

    match vectors.config.as_ref()? {
        Config::Params(params) => Some(params.size),
        Config::ParamsMap(map) => map.map.values().next().map(|p| p.size),
    }
}

fn point_id_to_i64(point_id: &PointId) -> Option<i64> {
    match &point_id.point_id_options {
        Some(qdrant::point_id::PointIdOptions::Num(num)) => Some(*num as i64),
        _ => None,
    }
}

fn payload_to_json(payload: HashMap<String, QdrantValue>) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (key, val) in payload {
        if let Some(json_val) = qdrant_value_to_json(val) {
            map.insert(key, json_val);
        }
    }
    serde_json::Value::Object(map)
}

fn qdrant_value_to_json(val: QdrantValue) -> Option<serde_json::Value> {
    use qdrant::value::Kind;

    match val.kind {
        Some(Kind::NullValue(_)) => Some(serde_json::Value::Null),
        Some(Kind::BoolValue(b)) => Some(serde_json::Value::Bool(b)),
        Some(Kind::IntegerValue(i)) => Some(serde_json::Value::Number(i.into())),
        Some(Kind::DoubleValue(f)) => {
            serde_json::Number::from_f64(f).map(serde_json::Value::Number)
        }
        Some(Kind::StringValue(s)) => Some(serde_json::Value::String(s)),
        Some(Kind::ListValue(list)) => Some(serde_json::Value::Array(
            list.values
                .into_iter()
                .filter_map(qdrant_value_to_json)
                .collect(),
        )),
        _ => None,
    }
}

/// Extract vector values from VectorsOutput
/// Note: Uses deprecated data field for now until migration to 1.18+
#[allow(deprecated)]
fn extract_vector_from_output(vectors: &Option<qdrant::VectorsOutput>) -> Option<Vec<f32>> {
    match vectors {
        Some(qdrant::VectorsOutput {
            vectors_options: Some(opts),
        }) => match opts {
            qdrant::vectors_output::VectorsOptions::Vector(v) => Some(v.data.clone()),
            qdrant::vectors_output::VectorsOptions::Vectors(map) => {
                map.vectors.values().next().map(|v| v.data.clone())
            }
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_always_includes_eligibility_conditions() {
        let filter = QdrantCatalogRepository::build_filter(&SearchFilters::default());
        assert_eq!(filter.must.len(), 2);
        assert!(filter.must_not.is_empty());
    }

    #[test]
    fn price_bounds_become_a_single_range_condition() {
        let filter = QdrantCatalogRepository::build_filter(&SearchFilters {
            min_price: Some(1000),
            max_price: Some(50_000),
            ..Default::default()
        });
        assert_eq!(filter.must.len(), 3);
    }

    #[test]
    fn exclusions_land_in_must_not() {
        let filter = QdrantCatalogRepository::build_filter(&SearchFilters {
            exclude_ids: vec![1, 2],
            exclude_categories: vec!["Food".to_string()],
            ..Default::default()
        });
        assert_eq!(filter.must_not.len(), 2);
    }

    fn info_with_size(size: u64) -> qdrant::CollectionInfo {
        qdrant::CollectionInfo {
            config: Some(qdrant::CollectionConfig {
                params: Some(qdrant::CollectionParams {
                    vectors_config: Some(qdrant::VectorsConfig {
                        config: Some(qdrant::vectors_config::Config::Params(
                            qdrant::VectorParams {
                                size,
                                ..Default::default()
                            },
                        )),
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn collection_dimension_reads_the_vector_params() {
        assert_eq!(collection_dimension(&info_with_size(768)), Some(768));
        assert_eq!(collection_dimension(&info_with_size(384)), Some(384));
    }

    #[test]
    fn collection_dimension_is_none_without_vector_config() {
        let info = qdrant::CollectionInfo::default();
        assert_eq!(collection_dimension(&info), None);
    }

    #[test]
    fn collection_dimension_reads_named_vector_params() {
        let mut map = std::collections::HashMap::new();
        map.insert(
            "default".to_string(),
            qdrant::VectorParams {
                size: 512,
                ..Default::default()
            },
        );
        let mut info = info_with_size(0);
        info.config.as_mut().unwrap().params.as_mut().unwrap().vectors_config =
            Some(qdrant::VectorsConfig {
                config: Some(qdrant::vectors_config::Config::ParamsMap(
                    qdrant::VectorParamsMap { map },
                )),
            });
        assert_eq!(collection_dimension(&info), Some(512));
    }

    #[test]
    fn numeric_point_ids_convert() {
        let id = PointId::from(42u64);
        assert_eq!(point_id_to_i64(&id), Some(42));

        let uuid_id = PointId::from("not-a-number".to_string());
        assert_eq!(point_id_to_i64(&uuid_id), None);
    }
}
