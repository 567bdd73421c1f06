use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use domain_analysis::{ModelGateway, SearchPath};
use domain_catalog::retrieval::RetrievalEngine;
use domain_catalog::{CatalogError, CatalogSearchRepository, sanitize_results};
use tracing::{info, instrument, warn};

use crate::error::{SearchError, SearchResult};
use crate::models::{SearchRequest, SearchResponse};

/// Reason used when the model service returns none.
const DEFAULT_REASON: &str = "AI 검색 결과입니다.";

/// Orchestrates a search request across the model service and the
/// catalog: path resolution, query embedding, vector retrieval and
/// sanitization.
pub struct SearchService<G, R>
where
    G: ModelGateway,
    R: CatalogSearchRepository,
{
    gateway: Arc<G>,
    engine: RetrievalEngine<R>,
}

impl<G, R> SearchService<G, R>
where
    G: ModelGateway,
    R: CatalogSearchRepository,
{
    pub fn new(gateway: Arc<G>, engine: RetrievalEngine<R>) -> Self {
        Self { gateway, engine }
    }

    /// Run the full search pipeline.
    ///
    /// Path resolution is best-effort (failure keeps the internal
    /// default); everything after it fails the request with the
    /// matching [`SearchError`] category. An empty product list is a
    /// success, not an error.
    #[instrument(skip(self, request), fields(query = %request.query, has_image = request.image.is_some()))]
    pub async fn search(&self, request: SearchRequest) -> SearchResult<SearchResponse> {
        let image_b64 = request.image.as_deref().map(|bytes| BASE64.encode(bytes));

        let path = match self.gateway.determine_path(&request.query).await {
            Ok(path) => path,
            Err(err) => {
                warn!(%err, "path resolution failed, defaulting to internal");
                SearchPath::Internal
            }
        };

        let analysis = self
            .gateway
            .process_query(path, &request.query, image_b64.as_deref())
            .await
            .map_err(SearchError::from)?;

        if analysis.vector.is_empty() {
            return Err(SearchError::EmptyEmbedding);
        }

        let reason = if analysis.reason.trim().is_empty() {
            DEFAULT_REASON.to_string()
        } else {
            analysis.reason
        };

        // A rejected query vector is the model's fault, not the store's.
        let scored = self
            .engine
            .search(&analysis.vector, request.limit, &request.filters)
            .await
            .map_err(|err| match err {
                CatalogError::Validation(msg) => SearchError::Analysis(msg),
                other => SearchError::Storage(other.to_string()),
            })?;

        let products = sanitize_results(&scored);
        info!(
            path = %path,
            retrieved = scored.len(),
            returned = products.len(),
            "search complete"
        );

        Ok(SearchResponse {
            status: "SUCCESS".to_string(),
            reason,
            products,
            search_path: path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use domain_analysis::{AnalysisError, AnalysisResult, QueryAnalysis};
    use domain_catalog::retrieval::RetrievalConfig;
    use domain_catalog::{CatalogItem, CatalogResult, ScoredItem, SearchFilters};

    /// Scripted stand-in for the model service.
    struct FakeGateway {
        path: AnalysisResult<SearchPath>,
        analysis: AnalysisResult<QueryAnalysis>,
    }

    impl FakeGateway {
        fn healthy(vector: Vec<f32>) -> Self {
            Self {
                path: Ok(SearchPath::Internal),
                analysis: Ok(QueryAnalysis {
                    vector,
                    reason: "'청바지' 검색 결과입니다.".to_string(),
                }),
            }
        }
    }

    fn clone_analysis_result<T: Clone>(r: &AnalysisResult<T>) -> AnalysisResult<T> {
        match r {
            Ok(v) => Ok(v.clone()),
            Err(AnalysisError::Connection(m)) => Err(AnalysisError::Connection(m.clone())),
            Err(AnalysisError::Upstream(m)) => Err(AnalysisError::Upstream(m.clone())),
            Err(AnalysisError::Config(m)) => Err(AnalysisError::Config(m.clone())),
            Err(AnalysisError::Internal(m)) => Err(AnalysisError::Internal(m.clone())),
        }
    }

    #[async_trait]
    impl ModelGateway for FakeGateway {
        async fn embed(&self, _text: &str) -> AnalysisResult<Vec<f32>> {
            unimplemented!("not used by the orchestrator")
        }

        async fn generate_from_image(
            &self,
            _prompt: &str,
            _image_b64: &str,
        ) -> AnalysisResult<String> {
            unimplemented!("not used by the orchestrator")
        }

        async fn generate_text(&self, _prompt: &str) -> AnalysisResult<String> {
            unimplemented!("not used by the orchestrator")
        }

        async fn determine_path(&self, _query: &str) -> AnalysisResult<SearchPath> {
            clone_analysis_result(&self.path)
        }

        async fn process_query<'a>(
            &self,
            _path: SearchPath,
            _query: &str,
            _image_b64: Option<&'a str>,
        ) -> AnalysisResult<QueryAnalysis> {
            clone_analysis_result(&self.analysis)
        }
    }

    struct FakeRepo {
        result: CatalogResult<Vec<ScoredItem>>,
    }

    #[async_trait]
    impl CatalogSearchRepository for FakeRepo {
        async fn nearest(
            &self,
            _vector: &[f32],
            _filters: &SearchFilters,
            _limit: u64,
        ) -> CatalogResult<Vec<ScoredItem>> {
            match &self.result {
                Ok(items) => Ok(items.clone()),
                Err(CatalogError::Storage(m)) => Err(CatalogError::Storage(m.clone())),
                Err(e) => Err(CatalogError::Internal(e.to_string())),
            }
        }
    }

    fn item(id: i64, name: &str) -> CatalogItem {
        let now = Utc::now();
        CatalogItem {
            id,
            name: Some(name.to_string()),
            description: Some("설명".to_string()),
            price: Some(39_000),
            stock_quantity: Some(3),
            category: Some("Fashion".to_string()),
            image_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            embedding: None,
        }
    }

    fn scored(id: i64, name: &str, distance: f32) -> ScoredItem {
        ScoredItem {
            item: item(id, name),
            distance,
        }
    }

    fn service(
        gateway: FakeGateway,
        repo: FakeRepo,
    ) -> SearchService<FakeGateway, FakeRepo> {
        let engine = RetrievalEngine::new(
            Arc::new(repo),
            RetrievalConfig::new(768, 1.2).unwrap(),
        );
        SearchService::new(Arc::new(gateway), engine)
    }

    #[tokio::test]
    async fn text_search_returns_only_items_under_the_threshold() {
        let gateway = FakeGateway::healthy(vec![0.1; 768]);
        let repo = FakeRepo {
            result: Ok(vec![
                scored(1, "빈티지 청바지", 0.4),
                scored(2, "세라믹 머그컵", 1.5),
            ]),
        };

        let response = service(gateway, repo)
            .search(SearchRequest::new("청바지".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status, "SUCCESS");
        assert_eq!(response.search_path, SearchPath::Internal);
        assert_eq!(response.products.len(), 1);
        assert_eq!(response.products[0].name, "빈티지 청바지");
    }

    #[tokio::test]
    async fn empty_result_set_is_still_a_success() {
        let gateway = FakeGateway::healthy(vec![0.1; 768]);
        let repo = FakeRepo { result: Ok(vec![]) };

        let response = service(gateway, repo)
            .search(SearchRequest::new("우주선".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status, "SUCCESS");
        assert!(response.products.is_empty());
    }

    #[tokio::test]
    async fn unreachable_model_service_maps_to_model_unavailable() {
        let gateway = FakeGateway {
            path: Ok(SearchPath::Internal),
            analysis: Err(AnalysisError::Connection("connection refused".to_string())),
        };
        let repo = FakeRepo { result: Ok(vec![]) };

        let err = service(gateway, repo)
            .search(SearchRequest::new("청바지".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::ModelUnavailable(_)));
    }

    #[tokio::test]
    async fn model_service_failure_maps_to_analysis_error() {
        let gateway = FakeGateway {
            path: Ok(SearchPath::Internal),
            analysis: Err(AnalysisError::Upstream("500 internal".to_string())),
        };
        let repo = FakeRepo { result: Ok(vec![]) };

        let err = service(gateway, repo)
            .search(SearchRequest::new("청바지".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Analysis(_)));
    }

    #[tokio::test]
    async fn failed_path_resolution_defaults_to_internal() {
        let gateway = FakeGateway {
            path: Err(AnalysisError::Connection("refused".to_string())),
            analysis: Ok(QueryAnalysis {
                vector: vec![0.1; 768],
                reason: String::new(),
            }),
        };
        let repo = FakeRepo { result: Ok(vec![]) };

        let response = service(gateway, repo)
            .search(SearchRequest::new("청바지".to_string()))
            .await
            .unwrap();

        assert_eq!(response.search_path, SearchPath::Internal);
        assert_eq!(response.reason, DEFAULT_REASON);
    }

    #[tokio::test]
    async fn empty_embedding_is_its_own_failure_category() {
        let gateway = FakeGateway {
            path: Ok(SearchPath::Internal),
            analysis: Ok(QueryAnalysis {
                vector: vec![],
                reason: "검색 결과".to_string(),
            }),
        };
        let repo = FakeRepo { result: Ok(vec![]) };

        let err = service(gateway, repo)
            .search(SearchRequest::new("청바지".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::EmptyEmbedding));
    }

    #[tokio::test]
    async fn wrong_dimension_embedding_is_an_analysis_failure_not_storage() {
        let gateway = FakeGateway::healthy(vec![0.1; 3]);
        let repo = FakeRepo { result: Ok(vec![]) };

        let err = service(gateway, repo)
            .search(SearchRequest::new("청바지".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Analysis(_)));
    }

    #[tokio::test]
    async fn storage_failure_maps_to_storage_error() {
        let gateway = FakeGateway::healthy(vec![0.1; 768]);
        let repo = FakeRepo {
            result: Err(CatalogError::Storage("qdrant unreachable".to_string())),
        };

        let err = service(gateway, repo)
            .search(SearchRequest::new("청바지".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Storage(_)));
    }

    #[tokio::test]
    async fn malformed_stored_row_is_dropped_from_the_response() {
        let gateway = FakeGateway::healthy(vec![0.1; 768]);
        let mut bad = item(2, "가방");
        bad.price = Some(-1);
        let repo = FakeRepo {
            result: Ok(vec![
                scored(1, "빈티지 청바지", 0.3),
                ScoredItem {
                    item: bad,
                    distance: 0.5,
                },
            ]),
        };

        let response = service(gateway, repo)
            .search(SearchRequest::new("청바지".to_string()))
            .await
            .unwrap();

        let ids: Vec<i64> = response.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn nameless_row_surfaces_with_the_placeholder_name() {
        let gateway = FakeGateway::healthy(vec![0.1; 768]);
        let mut nameless = item(1, "x");
        nameless.name = None;
        let repo = FakeRepo {
            result: Ok(vec![ScoredItem {
                item: nameless,
                distance: 0.3,
            }]),
        };

        let response = service(gateway, repo)
            .search(SearchRequest::new("청바지".to_string()))
            .await
            .unwrap();

        assert_eq!(response.products[0].name, "이름 미정 상품");
    }
}
