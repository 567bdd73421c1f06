use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The model service could not be reached at all (connect, timeout,
    /// broken transport). Distinct from [`AnalysisError::Upstream`] so
    /// callers can answer 503 instead of 502.
    #[error("Model service connection failed: {0}")]
    Connection(String),

    /// The model service answered with a non-success status.
    #[error("Model service error: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        // Any error reqwest itself raises means the exchange never
        // completed; a delivered non-2xx response is handled separately.
        AnalysisError::Connection(err.to_string())
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Connection(msg) => {
                AppError::ServiceUnavailable(format!("AI 서비스 연결 실패: {}", msg))
            }
            AnalysisError::Upstream(msg) => {
                AppError::BadGateway(format!("AI 분석 서비스 오류: {}", msg))
            }
            AnalysisError::Config(msg) => {
                AppError::InternalServerError(format!("Config error: {}", msg))
            }
            AnalysisError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
