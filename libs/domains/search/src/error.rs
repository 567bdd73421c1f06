use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_analysis::AnalysisError;
use thiserror::Error;

/// Failure categories for the search pipeline.
///
/// The split between [`SearchError::ModelUnavailable`] and
/// [`SearchError::Analysis`] is deliberate: a 503 tells operators the
/// model service is unreachable, a 502 that it is up but failing.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The model service could not be reached (503).
    #[error("AI 서비스 연결 실패")]
    ModelUnavailable(String),

    /// The model service responded with a failure (502).
    #[error("AI 분석 서비스 오류")]
    Analysis(String),

    /// The model produced no embedding for the query (500, distinct
    /// message so it is never mistaken for a storage failure).
    #[error("AI 벡터 생성 실패 (Empty Vector)")]
    EmptyEmbedding,

    /// Vector store failure during retrieval (500).
    #[error("데이터베이스 벡터 검색 오류")]
    Storage(String),

    /// The uploaded image could not be read (400).
    #[error("이미지 파일을 읽을 수 없습니다.")]
    BadImage(String),
}

pub type SearchResult<T> = Result<T, SearchError>;

impl From<AnalysisError> for SearchError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Connection(msg) => SearchError::ModelUnavailable(msg),
            AnalysisError::Upstream(msg) => SearchError::Analysis(msg),
            AnalysisError::Config(msg) | AnalysisError::Internal(msg) => {
                SearchError::Analysis(msg)
            }
        }
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        let message = err.to_string();
        match err {
            SearchError::ModelUnavailable(detail) => {
                tracing::error!(%detail, "model service unreachable");
                AppError::ServiceUnavailable(message)
            }
            SearchError::Analysis(detail) => {
                tracing::error!(%detail, "model service error");
                AppError::BadGateway(message)
            }
            SearchError::EmptyEmbedding => AppError::InternalServerError(message),
            SearchError::Storage(detail) => {
                tracing::error!(%detail, "vector search failed");
                AppError::InternalServerError(message)
            }
            SearchError::BadImage(detail) => {
                tracing::warn!(%detail, "unreadable image upload");
                AppError::InvalidMultipart(message)
            }
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
